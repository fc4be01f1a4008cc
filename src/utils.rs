// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::aggregate::{DateRange, Interval, PeriodPreset};

pub const DEFAULT_CURRENCY: &str = "USD";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn fmt_pct(d: &Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Text bar scaled against `peak`; empty when there is nothing to scale.
pub fn bar(value: Decimal, peak: Decimal, width: usize) -> String {
    if peak <= Decimal::ZERO || value <= Decimal::ZERO {
        return String::new();
    }
    let ratio = (value / peak).min(Decimal::ONE);
    let cells = (ratio * Decimal::from(width)).round();
    let n = cells.to_usize().unwrap_or(0);
    "█".repeat(n.max(1))
}

/// Resolve `--period`, `--from` and `--to` into a date range.
///
/// Passing `--from`/`--to` implies a custom period; a missing `--to`
/// defaults to today.
pub fn resolve_range(sub: &clap::ArgMatches) -> Result<(PeriodPreset, DateRange)> {
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let preset = match sub.get_one::<String>("period") {
        Some(p) => p.parse::<PeriodPreset>()?,
        None if from.is_some() || to.is_some() => PeriodPreset::Custom,
        None => PeriodPreset::Month,
    };
    let custom = match (from, to) {
        (Some(f), t) => Some(DateRange::new(f, t.unwrap_or_else(today))?),
        (None, Some(t)) => Some(DateRange::single_day(t)),
        (None, None) => None,
    };
    let range = preset.resolve(today(), custom)?;
    Ok((preset, range))
}

/// Explicit `--interval`, otherwise the preset's default.
pub fn resolve_interval(sub: &clap::ArgMatches, preset: PeriodPreset) -> Result<Interval> {
    match sub.get_one::<String>("interval") {
        Some(s) => Ok(s.parse::<Interval>()?),
        None => Ok(preset.trend_interval()),
    }
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='currency'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn set_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
