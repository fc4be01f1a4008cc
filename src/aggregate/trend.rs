// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period bucketing for trend charts.
//!
//! A range is split into one bucket per interval unit (calendar day, ISO
//! week starting Monday, or calendar month). Transactions are mapped to their
//! bucket by computing the offset from the first anchor, so the cost is
//! linear in the number of transactions plus buckets.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Error;
use crate::models::{Transaction, TransactionType};

use super::period::{DateRange, first_of_month, week_start};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Week,
    Month,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Start of the interval unit containing `date`.
    pub fn anchor(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => week_start(date),
            Self::Month => first_of_month(date),
        }
    }

    /// Anchor of the unit following the one anchored at `anchor`.
    fn next_anchor(&self, anchor: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => anchor.succ_opt(),
            Self::Week => anchor.checked_add_days(Days::new(7)),
            Self::Month => anchor.checked_add_months(Months::new(1)),
        }
    }

    /// Number of whole units between the unit anchored at `first` and the
    /// unit containing `date`. `date` must not precede `first`.
    fn offset(&self, first: NaiveDate, date: NaiveDate) -> usize {
        let units = match self {
            Self::Day => (date - first).num_days(),
            Self::Week => (week_start(date) - first).num_days() / 7,
            Self::Month => {
                let months = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
                months(date) - months(first)
            }
        };
        usize::try_from(units).unwrap_or(0)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            other => Err(Error::InvalidData(format!(
                "Unknown interval '{}' (valid: day, week, month)",
                other
            ))),
        }
    }
}

/// Income and expense totals for one interval unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Interval-aligned anchor (the day, the Monday, or the first of the month).
    pub period_start: NaiveDate,
    /// First day of the requested range covered by this bucket.
    pub start: NaiveDate,
    /// Last day of the requested range covered by this bucket.
    pub end: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl Bucket {
    fn empty(period_start: NaiveDate, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            period_start,
            start,
            end,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }
}

/// Empty buckets, in chronological order, exactly covering `range`.
pub fn buckets_for(range: DateRange, interval: Interval) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut anchor = interval.anchor(range.start());
    while anchor <= range.end() {
        let next = interval.next_anchor(anchor);
        let start = anchor.max(range.start());
        let end = next
            .and_then(|n| n.pred_opt())
            .map_or(range.end(), |last| last.min(range.end()));
        buckets.push(Bucket::empty(anchor, start, end));
        match next {
            Some(n) => anchor = n,
            None => break,
        }
    }
    buckets
}

/// Sum income and expense per interval unit over `range`.
///
/// Transactions dated outside the range are ignored, as are transfers. Every
/// unit in the range gets a bucket even when nothing falls into it.
pub fn bucketize(transactions: &[Transaction], range: DateRange, interval: Interval) -> Vec<Bucket> {
    let mut buckets = buckets_for(range, interval);
    let Some(first) = buckets.first().map(|b| b.period_start) else {
        return buckets;
    };

    for tx in transactions {
        if !range.contains(tx.date) {
            continue;
        }
        let Some(bucket) = buckets.get_mut(interval.offset(first, tx.date)) else {
            continue;
        };
        match tx.r#type {
            TransactionType::Income => bucket.income += tx.amount,
            TransactionType::Expense => bucket.expense += tx.amount,
            TransactionType::Transfer => {}
        }
    }

    for bucket in &mut buckets {
        bucket.balance = bucket.income - bucket.expense;
    }
    buckets
}

/// Largest of income, expense and absolute balance across `buckets`.
///
/// Zero means there is nothing to scale against.
pub fn peak(buckets: &[Bucket]) -> Decimal {
    buckets
        .iter()
        .flat_map(|b| [b.income, b.expense, b.balance.abs()])
        .max()
        .unwrap_or(Decimal::ZERO)
}
