// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionType;
use crate::store::{LedgerStore, SqliteStore};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

fn type_filter(sub: &clap::ArgMatches) -> Result<Option<TransactionType>> {
    Ok(sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>())
        .transpose()?)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = sub.get_one::<String>("type").unwrap().parse::<TransactionType>()?;
            let color = sub.get_one::<String>("color").map(|s| s.as_str());
            store.add_category(name, kind, color)?;
            println!("Added {} category '{}'", kind, name);
        }
        Some(("seed", _)) => {
            let added = store.seed_default_categories()?;
            println!("Seeded {} default categories", added);
        }
        Some(("list", sub)) => {
            let cats = store.categories(type_filter(sub)?)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| vec![c.name, c.r#type.to_string(), c.color])
                    .collect();
                println!("{}", pretty_table(&["Category", "Type", "Color"], data));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let cat = store.category_by_name(name, type_filter(sub)?)?;
            store.remove_category(cat.id)?;
            println!("Removed {} category '{}'", cat.r#type, name);
        }
        _ => {}
    }
    Ok(())
}
