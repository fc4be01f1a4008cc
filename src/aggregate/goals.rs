// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Goal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub percentage: Decimal,
    pub remaining: Decimal,
    /// Negative once the end date has passed.
    pub days_left: i64,
    pub reached: bool,
}

pub fn goal_progress(goal: &Goal, today: NaiveDate) -> GoalProgress {
    let percentage = if goal.target_amount > Decimal::ZERO {
        goal.current_amount / goal.target_amount * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    let remaining = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);
    GoalProgress {
        percentage,
        remaining,
        days_left: (goal.end_date - today).num_days(),
        reached: goal.current_amount >= goal.target_amount,
    }
}
