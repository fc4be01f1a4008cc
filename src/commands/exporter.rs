// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::bucketize;
use crate::store::{LedgerStore, SqliteStore, TransactionQuery};
use crate::utils::{resolve_interval, resolve_range};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("trend", sub)) => export_trend(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let store = SqliteStore::new(conn);

    let has_range = ["period", "from", "to"]
        .iter()
        .any(|k| sub.get_one::<String>(k).is_some());
    let query = if has_range {
        TransactionQuery::in_range(resolve_range(sub)?.1)
    } else {
        TransactionQuery::default()
    };
    let accounts = store.accounts()?;
    let account_name = |id: i64| {
        accounts
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.name.clone())
            .unwrap_or_default()
    };
    let txs = store.transactions(&query)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "date",
                "account",
                "description",
                "type",
                "amount",
                "category",
                "paid",
                "notes",
            ])?;
            for t in &txs {
                wtr.write_record([
                    t.date.to_string(),
                    account_name(t.account_id),
                    t.description.clone(),
                    t.r#type.to_string(),
                    t.amount.to_string(),
                    t.category.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                    t.is_paid.to_string(),
                    t.notes.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date.to_string(),
                        "account": account_name(t.account_id),
                        "description": t.description,
                        "type": t.r#type,
                        "amount": t.amount.to_string(),
                        "category": t.category.as_ref().map(|c| c.name.clone()),
                        "paid": t.is_paid,
                        "notes": t.notes,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    tracing::info!(count = txs.len(), out = out.as_str(), "transactions exported");
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}

fn export_trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let store = SqliteStore::new(conn);

    let (preset, range) = resolve_range(sub)?;
    let interval = resolve_interval(sub, preset)?;
    let txs = store.transactions(&TransactionQuery::in_range(range))?;
    let buckets = bucketize(&txs, range, interval);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out))?;
            wtr.write_record(["period_start", "start", "end", "income", "expense", "balance"])?;
            for b in &buckets {
                wtr.write_record([
                    b.period_start.to_string(),
                    b.start.to_string(),
                    b.end.to_string(),
                    b.income.to_string(),
                    b.expense.to_string(),
                    b.balance.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&buckets)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} {} buckets to {}", buckets.len(), interval, out);
    Ok(())
}
