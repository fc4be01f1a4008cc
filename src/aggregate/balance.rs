// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account balances derived from the transaction ledger.
//!
//! Accounts only store an opening balance. The current balance is always
//! recomputed from settled transactions, so inserting, settling or deleting a
//! transaction never needs a second write to keep the account in sync.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Account, Transaction, TransactionType};

/// Change a transaction applies to its account balance.
///
/// Unsettled transactions and transfers contribute nothing.
pub fn settlement_delta(tx: &Transaction) -> Decimal {
    if !tx.is_paid {
        return Decimal::ZERO;
    }
    match tx.r#type {
        TransactionType::Income => tx.amount,
        TransactionType::Expense => -tx.amount,
        TransactionType::Transfer => Decimal::ZERO,
    }
}

/// Opening balance plus the settlement deltas of the account's transactions.
/// Transactions belonging to other accounts are ignored.
pub fn derived_balance(account: &Account, ledger: &[Transaction]) -> Decimal {
    ledger
        .iter()
        .filter(|t| t.account_id == account.id)
        .map(settlement_delta)
        .fold(account.opening_balance, |acc, d| acc + d)
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountBalance {
    pub account_id: i64,
    pub name: String,
    pub r#type: String,
    pub balance: Decimal,
    /// Credit limit plus balance, for credit cards only.
    pub available_credit: Option<Decimal>,
}

/// Balances for every account in one pass over the ledger.
pub fn account_balances(accounts: &[Account], ledger: &[Transaction]) -> Vec<AccountBalance> {
    let mut deltas: HashMap<i64, Decimal> = HashMap::new();
    for tx in ledger {
        *deltas.entry(tx.account_id).or_insert(Decimal::ZERO) += settlement_delta(tx);
    }
    accounts
        .iter()
        .map(|a| {
            let balance = a.opening_balance + deltas.get(&a.id).copied().unwrap_or_default();
            AccountBalance {
                account_id: a.id,
                name: a.name.clone(),
                r#type: a.r#type.to_string(),
                balance,
                available_credit: a
                    .r#type
                    .is_credit_card()
                    .then(|| a.credit_limit + balance),
            }
        })
        .collect()
}

/// Sum of all account balances.
pub fn total_balance(balances: &[AccountBalance]) -> Decimal {
    balances.iter().map(|b| b.balance).sum()
}
