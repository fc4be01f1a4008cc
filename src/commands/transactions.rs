// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewTransaction, TransactionType};
use crate::store::{LedgerStore, SqliteStore, TransactionQuery};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, resolve_range, today};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => add(&store, sub)?,
        Some(("list", sub)) => list(&store, sub)?,
        Some(("settle", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let paid = !sub.get_flag("undo");
            store.set_paid(id, paid)?;
            println!(
                "Transaction #{} marked {}",
                id,
                if paid { "paid" } else { "unpaid" }
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store.delete_transaction(id)?;
            println!("Removed transaction #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &SqliteStore<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let account_name = sub.get_one::<String>("account").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind = sub.get_one::<String>("type").unwrap().parse::<TransactionType>()?;
    let description = sub.get_one::<String>("description").unwrap();
    let notes = sub.get_one::<String>("notes").map(|s| s.to_string());

    let account = store.account_by_name(account_name)?;
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => Some(store.category_by_name(name, Some(kind))?.id),
        None => None,
    };

    let id = store.record_transaction(&NewTransaction {
        date,
        account_id: account.id,
        amount,
        r#type: kind,
        category_id,
        description: description.to_string(),
        is_paid: !sub.get_flag("unpaid"),
        notes,
    })?;
    println!(
        "Recorded #{} {} {} on {} '{}' (acct: {})",
        id, kind, amount, date, description, account_name
    );
    Ok(())
}

fn list(store: &SqliteStore<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.account.clone(),
                    r.description.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    if r.paid { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Account", "Description", "Type", "Amount", "Category", "Paid"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub account: String,
    pub description: String,
    pub r#type: String,
    pub amount: String,
    pub category: String,
    pub paid: bool,
    pub notes: String,
}

/// Newest-first rows for `tx list`. No range flags means the whole ledger.
pub fn query_rows(store: &SqliteStore<'_>, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let has_range = ["period", "from", "to"]
        .iter()
        .any(|k| sub.get_one::<String>(k).is_some());
    let base = if has_range {
        TransactionQuery::in_range(resolve_range(sub)?.1)
    } else {
        TransactionQuery::default()
    };
    let mut query = base.newest_first();

    if let Some(kind) = sub.get_one::<String>("type") {
        query = query.of_type(kind.parse::<TransactionType>()?);
    }
    if let Some(name) = sub.get_one::<String>("account") {
        query = query.account(store.account_by_name(name)?.id);
    }
    if let Some(name) = sub.get_one::<String>("category") {
        let kind = query.r#type;
        query = query.category(store.category_by_name(name, kind)?.id);
    }
    if let Some(text) = sub.get_one::<String>("search") {
        query = query.search(text);
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        query = query.limit(*limit);
    }

    let accounts = store.accounts()?;
    let data = store
        .transactions(&query)?
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            account: accounts
                .iter()
                .find(|a| a.id == t.account_id)
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            description: t.description,
            r#type: t.r#type.to_string(),
            amount: t.amount.to_string(),
            category: t.category.map(|c| c.name).unwrap_or_default(),
            paid: t.is_paid,
            notes: t.notes.unwrap_or_default(),
        })
        .collect();
    Ok(data)
}
