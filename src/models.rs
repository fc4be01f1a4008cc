// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_CATEGORY_COLOR: &str = "#e2e8f0";

/// Largest magnitude (1e15) accepted for any stored amount. Aggregations sum
/// stored amounts with plain `+`; this bound keeps those sums far from
/// `Decimal::MAX` for any realistic row count.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Starter categories inserted by `category seed`: (name, type, color).
pub const DEFAULT_CATEGORIES: &[(&str, TransactionType, &str)] = &[
    ("Salary", TransactionType::Income, "#10b981"),
    ("Investments", TransactionType::Income, "#6366f1"),
    ("Gifts", TransactionType::Income, "#ec4899"),
    ("Other", TransactionType::Income, "#9ca3af"),
    ("Food", TransactionType::Expense, "#f97316"),
    ("Transport", TransactionType::Expense, "#0ea5e9"),
    ("Housing", TransactionType::Expense, "#8b5cf6"),
    ("Health", TransactionType::Expense, "#ef4444"),
    ("Leisure", TransactionType::Expense, "#22c55e"),
    ("Education", TransactionType::Expense, "#f59e0b"),
    ("Shopping", TransactionType::Expense, "#ec4899"),
    ("Bills", TransactionType::Expense, "#64748b"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            other => Err(Error::InvalidData(format!(
                "Unknown transaction type '{}' (valid: income, expense, transfer)",
                other
            ))),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    Investment,
    CreditCard,
    Cash,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Investment => "investment",
            Self::CreditCard => "credit_card",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }

    pub fn is_credit_card(&self) -> bool {
        matches!(self, Self::CreditCard)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "investment" => Ok(Self::Investment),
            "credit_card" | "credit" => Ok(Self::CreditCard),
            "cash" => Ok(Self::Cash),
            "other" => Ok(Self::Other),
            other => Err(Error::InvalidData(format!(
                "Unknown account type '{}' (valid: checking, savings, investment, credit_card, cash, other)",
                other
            ))),
        }
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub r#type: AccountType,
    pub opening_balance: Decimal,
    pub color: Option<String>,
    pub credit_limit: Decimal,
}

/// A category as referenced by transactions. `r#type` is income or expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub r#type: TransactionType,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub account_id: i64,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category: Option<Category>,
    pub description: String,
    pub is_paid: bool,
    pub notes: Option<String>,
}

/// Input for recording a transaction; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub account_id: i64,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category_id: Option<i64>,
    pub description: String,
    pub is_paid: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub end_date: NaiveDate,
}
