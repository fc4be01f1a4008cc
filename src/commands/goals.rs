// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{GoalProgress, goal_progress};
use crate::models::Goal;
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{
    fmt_money, fmt_pct, get_currency, maybe_print_json, parse_date, parse_decimal, pretty_table,
    today,
};
use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
            let end = parse_date(sub.get_one::<String>("end").unwrap())?;
            store.add_goal(name, target, end)?;
            println!("Added goal '{}' ({} by {})", name, target, end);
        }
        Some(("list", sub)) => list(conn, &store, sub)?,
        Some(("contribute", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            if amount <= Decimal::ZERO {
                bail!("Contribution must be positive (got {})", amount);
            }
            let total = store.contribute_to_goal(name, amount)?;
            println!("Goal '{}' now at {}", name, total);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct GoalRow {
    #[serde(flatten)]
    goal: Goal,
    #[serde(flatten)]
    progress: GoalProgress,
}

fn list(conn: &Connection, store: &SqliteStore<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let now = today();
    let rows: Vec<GoalRow> = store
        .goals()?
        .into_iter()
        .map(|goal| {
            let progress = goal_progress(&goal, now);
            GoalRow { goal, progress }
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let data = rows
        .iter()
        .map(|r| {
            let due = match r.progress.days_left {
                d if d < 0 => format!("{} days overdue", -d),
                0 => "due today".to_string(),
                d => format!("{} days left", d),
            };
            vec![
                r.goal.name.clone(),
                format!(
                    "{} / {}",
                    fmt_money(&r.goal.current_amount, &ccy),
                    fmt_money(&r.goal.target_amount, &ccy)
                ),
                fmt_pct(&r.progress.percentage),
                r.goal.end_date.to_string(),
                if r.progress.reached {
                    "reached".to_string()
                } else {
                    due
                },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Goal", "Saved", "Progress", "End", "Status"], data)
    );
    Ok(())
}
