// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{account_balances, balance::total_balance};
use crate::models::AccountType;
use crate::store::{LedgerStore, SqliteStore, TransactionQuery};
use crate::utils::{fmt_money, get_currency, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = sub.get_one::<String>("type").unwrap().parse::<AccountType>()?;
            let opening = parse_decimal(sub.get_one::<String>("opening").unwrap())?;
            let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
            let color = sub.get_one::<String>("color").map(|s| s.as_str());
            store.add_account(name, kind, opening, color, limit)?;
            println!("Added account '{}' ({}, opening {})", name, kind, opening);
        }
        Some(("list", sub)) => list(conn, &store, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            store.remove_account(name)?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, store: &SqliteStore<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = store.accounts()?;
    let ledger = store.transactions(&TransactionQuery::default())?;
    let balances = account_balances(&accounts, &ledger);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &balances)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let mut data: Vec<Vec<String>> = balances
        .iter()
        .map(|b| {
            vec![
                b.name.clone(),
                b.r#type.clone(),
                fmt_money(&b.balance, &ccy),
                b.available_credit
                    .map(|c| fmt_money(&c, &ccy))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    data.push(vec![
        format!("Total ({} accounts)", balances.len()),
        String::new(),
        fmt_money(&total_balance(&balances), &ccy),
        String::new(),
    ]);
    println!(
        "{}",
        pretty_table(&["Name", "Type", "Balance", "Available credit"], data)
    );
    Ok(())
}
