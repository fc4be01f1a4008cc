// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::account_balances;
use crate::models::TransactionType;
use crate::store::{LedgerStore, SqliteStore, TransactionQuery};
use crate::utils::{pretty_table, today};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = diagnose(conn, today())?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Ledger consistency issues as `[kind, detail]` rows.
pub fn diagnose(conn: &Connection, today: NaiveDate) -> Result<Vec<Vec<String>>> {
    let store = SqliteStore::new(conn);
    let mut rows = Vec::new();
    let ledger = store.transactions(&TransactionQuery::default())?;

    // 1) Transfers carry no category; otherwise the types must agree
    for t in &ledger {
        if let Some(cat) = &t.category {
            if t.r#type == TransactionType::Transfer {
                rows.push(vec![
                    "categorized_transfer".into(),
                    format!("#{} transfer '{}' in category '{}'", t.id, t.description, cat.name),
                ]);
            } else if cat.r#type != t.r#type {
                rows.push(vec![
                    "category_type_mismatch".into(),
                    format!("#{} {} in {} category '{}'", t.id, t.r#type, cat.r#type, cat.name),
                ]);
            }
        }
    }

    // 2) Unsettled transactions dated in the past
    for t in ledger.iter().filter(|t| !t.is_paid && t.date < today) {
        rows.push(vec![
            "overdue_unpaid".into(),
            format!("#{} {} '{}' {}", t.id, t.date, t.description, t.amount),
        ]);
    }

    // 3) Credit cards past their limit
    let accounts = store.accounts()?;
    for b in account_balances(&accounts, &ledger) {
        if let Some(avail) = b.available_credit {
            if avail < Decimal::ZERO {
                rows.push(vec![
                    "credit_limit_exceeded".into(),
                    format!("{} over by {}", b.name, -avail),
                ]);
            }
        }
    }

    tracing::debug!(issues = rows.len(), "doctor finished");
    Ok(rows)
}
