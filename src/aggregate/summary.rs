// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionType};

use super::period::{DateRange, first_of_month, last_of_month};
use super::trend::{Bucket, Interval, bucketize};

pub const DEFAULT_COMPARISON_MONTHS: u32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Income, expense and net over `range`; transfers are left out.
pub fn summarize(transactions: &[Transaction], range: DateRange) -> PeriodSummary {
    let mut s = PeriodSummary::default();
    for tx in transactions.iter().filter(|t| range.contains(t.date)) {
        match tx.r#type {
            TransactionType::Income => s.income += tx.amount,
            TransactionType::Expense => s.expense += tx.amount,
            TransactionType::Transfer => {}
        }
    }
    s.net = s.income - s.expense;
    s
}

/// Range spanning the `months` calendar months that end with the month of
/// `reference`. Zero months is treated as one; a count reaching past the
/// earliest representable date is an error.
pub fn comparison_range(reference: NaiveDate, months: u32) -> Result<DateRange> {
    let back = months.max(1) - 1;
    let start = first_of_month(reference)
        .checked_sub_months(Months::new(back))
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "{} months before {} is out of the supported date range",
                months, reference
            ))
        })?;
    DateRange::new(start, last_of_month(reference))
}

/// One month bucket per month in [`comparison_range`].
pub fn monthly_comparison(
    transactions: &[Transaction],
    reference: NaiveDate,
    months: u32,
) -> Result<Vec<Bucket>> {
    Ok(bucketize(
        transactions,
        comparison_range(reference, months)?,
        Interval::Month,
    ))
}
