// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregations over in-memory transactions. Nothing here touches the
//! database; callers fetch through [`crate::store::LedgerStore`] first.
//!
//! Sums use plain `Decimal` addition. Inputs are expected to be bounded by
//! [`crate::models::MAX_AMOUNT`], which the store enforces on write and read.

pub mod balance;
pub mod category;
pub mod goals;
pub mod period;
pub mod summary;
pub mod trend;

pub use balance::{AccountBalance, account_balances, derived_balance, settlement_delta};
pub use category::{CategoryAggregate, CategoryBreakdown, aggregate_by_category};
pub use goals::{GoalProgress, goal_progress};
pub use period::{DateRange, PeriodPreset};
pub use summary::{PeriodSummary, monthly_comparison, summarize};
pub use trend::{Bucket, Interval, bucketize, peak};
