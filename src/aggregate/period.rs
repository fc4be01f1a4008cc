// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Date ranges and the period presets offered by reports.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};

use super::trend::Interval;

/// Inclusive calendar-date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// First through last day of the month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let start = first_of_month(date);
        Self {
            start,
            end: last_of_month(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPreset {
    Day,
    Week,
    Month,
    Year,
    Custom,
}

impl PeriodPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::Custom => "custom",
        }
    }

    /// Concrete range for this preset relative to `today`.
    pub fn resolve(&self, today: NaiveDate, custom: Option<DateRange>) -> Result<DateRange> {
        match self {
            Self::Day => Ok(DateRange::single_day(today)),
            Self::Week => {
                let start = week_start(today);
                let end = start + Days::new(6);
                DateRange::new(start, end)
            }
            Self::Month => Ok(DateRange::month_of(today)),
            Self::Year => {
                let year = today.year();
                let start = NaiveDate::from_ymd_opt(year, 1, 1);
                let end = NaiveDate::from_ymd_opt(year, 12, 31);
                match (start, end) {
                    (Some(s), Some(e)) => DateRange::new(s, e),
                    _ => Err(Error::InvalidData(format!("Year {} out of range", year))),
                }
            }
            Self::Custom => custom.ok_or_else(|| {
                Error::InvalidData("Custom period requires --from and --to".to_string())
            }),
        }
    }

    /// Trend granularity shown by default for this preset.
    pub fn trend_interval(&self) -> Interval {
        match self {
            Self::Year => Interval::Month,
            Self::Month => Interval::Week,
            Self::Day | Self::Week | Self::Custom => Interval::Day,
        }
    }
}

impl FromStr for PeriodPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "today" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "custom" => Ok(Self::Custom),
            other => Err(Error::InvalidData(format!(
                "Unknown period '{}' (valid: day, week, month, year, custom)",
                other
            ))),
        }
    }
}
