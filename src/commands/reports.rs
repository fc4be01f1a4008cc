// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    DateRange, PeriodSummary, account_balances, aggregate_by_category, balance::total_balance,
    bucketize, monthly_comparison, peak, summarize, summary::DEFAULT_COMPARISON_MONTHS,
};
use crate::models::TransactionType;
use crate::store::{LedgerStore, SqliteStore, TransactionQuery};
use crate::utils::{
    bar, fmt_money, fmt_pct, get_currency, maybe_print_json, parse_date, pretty_table,
    resolve_interval, resolve_range, today,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

const BAR_WIDTH: usize = 24;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub range: DateRange,
    pub totals: PeriodSummary,
    pub total_balance: Decimal,
    pub accounts: usize,
}

/// Period totals plus the derived balance across all accounts.
pub fn dashboard(store: &impl LedgerStore, range: DateRange) -> Result<Dashboard> {
    let in_range = store
        .transactions(&TransactionQuery::in_range(range))
        .context("Fetch transactions for summary")?;
    let accounts = store.accounts()?;
    let ledger = store.transactions(&TransactionQuery::default())?;
    let balances = account_balances(&accounts, &ledger);
    Ok(Dashboard {
        range,
        totals: summarize(&in_range, range),
        total_balance: total_balance(&balances),
        accounts: accounts.len(),
    })
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    let (preset, range) = resolve_range(sub)?;
    tracing::debug!(period = preset.as_str(), %range, "summary report");
    let d = dashboard(&store, range)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &d)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let net_label = if d.totals.net >= Decimal::ZERO {
        "positive"
    } else {
        "negative"
    };
    let rows = vec![
        vec!["Period".into(), d.range.to_string()],
        vec![
            "Total balance".into(),
            format!("{} ({} accounts)", fmt_money(&d.total_balance, &ccy), d.accounts),
        ],
        vec!["Income".into(), fmt_money(&d.totals.income, &ccy)],
        vec!["Expense".into(), fmt_money(&d.totals.expense, &ccy)],
        vec![
            "Net".into(),
            format!("{} ({})", fmt_money(&d.totals.net, &ccy), net_label),
        ],
    ];
    println!("{}", pretty_table(&["Summary", ""], rows));

    let recent = store.transactions(&TransactionQuery::default().newest_first().limit(5))?;
    if !recent.is_empty() {
        let rows = recent
            .into_iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.description,
                    t.r#type.to_string(),
                    fmt_money(&t.amount, &ccy),
                    t.category.map(|c| c.name).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Recent", "Type", "Amount", "Category"], rows)
        );
    }
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    let (preset, range) = resolve_range(sub)?;
    let interval = resolve_interval(sub, preset)?;
    let txs = store
        .transactions(&TransactionQuery::in_range(range))
        .context("Fetch transactions for trend")?;
    let buckets = bucketize(&txs, range, interval);
    tracing::debug!(%range, %interval, buckets = buckets.len(), "trend report");
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &buckets)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let top = peak(&buckets);
    let rows = buckets
        .iter()
        .map(|b| {
            vec![
                b.period_start.to_string(),
                fmt_money(&b.income, &ccy),
                fmt_money(&b.expense, &ccy),
                fmt_money(&b.balance, &ccy),
                bar(b.income, top, BAR_WIDTH),
                bar(b.expense, top, BAR_WIDTH),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Period", "Income", "Expense", "Balance", "Income bar", "Expense bar"],
            rows
        )
    );
    if top.is_zero() {
        println!("No transactions in {}", range);
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    let (_, range) = resolve_range(sub)?;
    let kind = sub.get_one::<String>("type").unwrap().parse::<TransactionType>()?;
    let txs = store
        .transactions(&TransactionQuery::in_range(range).of_type(kind))
        .context("Fetch transactions for category breakdown")?;
    let breakdown = aggregate_by_category(&txs, kind);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &breakdown)? {
        return Ok(());
    }
    if breakdown.is_empty() {
        println!("No categorized {} transactions in {}", kind, range);
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let rows = breakdown
        .items
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.color.clone(),
                fmt_money(&c.amount, &ccy),
                fmt_pct(&c.percentage),
                bar(c.percentage, Decimal::ONE_HUNDRED, BAR_WIDTH),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Color", "Amount", "Share", ""], rows)
    );
    println!("Total: {}", fmt_money(&breakdown.total, &ccy));
    Ok(())
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    let months = sub
        .get_one::<u32>("months")
        .copied()
        .unwrap_or(DEFAULT_COMPARISON_MONTHS);
    let reference = match sub.get_one::<String>("as-of") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let range = crate::aggregate::summary::comparison_range(reference, months)?;
    let txs = store.transactions(&TransactionQuery::in_range(range))?;
    let buckets = monthly_comparison(&txs, reference, months)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &buckets)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let top = peak(&buckets);
    let rows = buckets
        .iter()
        .map(|b| {
            vec![
                b.period_start.format("%Y-%m").to_string(),
                fmt_money(&b.income, &ccy),
                bar(b.income, top, BAR_WIDTH),
                fmt_money(&b.expense, &ccy),
                bar(b.expense, top, BAR_WIDTH),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "", "Expense", ""], rows)
    );
    Ok(())
}
