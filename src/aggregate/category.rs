// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAggregate {
    pub category_id: i64,
    pub name: String,
    pub color: String,
    pub amount: Decimal,
    /// Share of the breakdown total, 0..=100.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub items: Vec<CategoryAggregate>,
    pub total: Decimal,
}

impl CategoryBreakdown {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Group transactions of `kind` by category, largest first.
///
/// Uncategorized transactions are left out of both the items and the total.
/// Equal amounts keep the order in which their categories were first seen.
pub fn aggregate_by_category(transactions: &[Transaction], kind: TransactionType) -> CategoryBreakdown {
    let mut items: Vec<CategoryAggregate> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut total = Decimal::ZERO;

    for tx in transactions.iter().filter(|t| t.r#type == kind) {
        let Some(cat) = &tx.category else {
            continue;
        };
        total += tx.amount;
        match index.get(&cat.id) {
            Some(&i) => items[i].amount += tx.amount,
            None => {
                index.insert(cat.id, items.len());
                items.push(CategoryAggregate {
                    category_id: cat.id,
                    name: cat.name.clone(),
                    color: cat.color.clone(),
                    amount: tx.amount,
                    percentage: Decimal::ZERO,
                });
            }
        }
    }

    if total > Decimal::ZERO {
        for item in &mut items {
            item.percentage = item.amount / total * Decimal::ONE_HUNDRED;
        }
    }
    // sort_by is stable
    items.sort_by(|a, b| b.amount.cmp(&a.amount));

    CategoryBreakdown { items, total }
}
