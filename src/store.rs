// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Query/command interface to the ledger and its SQLite implementation.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use rust_decimal::Decimal;

use crate::aggregate::DateRange;
use crate::error::{Error, Result};
use crate::models::{
    Account, AccountType, Category, DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR, Goal, MAX_AMOUNT,
    NewTransaction, Transaction, TransactionType,
};

/// Filters for a transaction fetch. All set filters must match.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub range: Option<DateRange>,
    pub r#type: Option<TransactionType>,
    pub category_id: Option<i64>,
    pub account_id: Option<i64>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub newest_first: bool,
}

impl TransactionQuery {
    pub fn in_range(range: DateRange) -> Self {
        Self {
            range: Some(range),
            ..Self::default()
        }
    }

    pub fn of_type(mut self, kind: TransactionType) -> Self {
        self.r#type = Some(kind);
        self
    }

    pub fn account(mut self, id: i64) -> Self {
        self.account_id = Some(id);
        self
    }

    pub fn category(mut self, id: i64) -> Self {
        self.category_id = Some(id);
        self
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = Some(text.to_string());
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }
}

pub trait LedgerStore {
    fn accounts(&self) -> Result<Vec<Account>>;
    fn account_by_name(&self, name: &str) -> Result<Account>;
    fn categories(&self, kind: Option<TransactionType>) -> Result<Vec<Category>>;
    fn category_by_name(&self, name: &str, kind: Option<TransactionType>) -> Result<Category>;
    fn transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>>;
    /// Validate and insert one transaction, returning its id.
    fn record_transaction(&self, new: &NewTransaction) -> Result<i64>;
    fn set_paid(&self, id: i64, paid: bool) -> Result<()>;
    fn delete_transaction(&self, id: i64) -> Result<()>;
    fn goals(&self) -> Result<Vec<Goal>>;
}

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

const TX_SELECT: &str = "SELECT t.id, t.date, t.account_id, t.amount, t.type, t.category_id, \
     c.name, c.type, c.color, t.description, t.is_paid, t.notes \
     FROM transactions t LEFT JOIN categories c ON t.category_id=c.id WHERE 1=1";

/// Reject amounts whose magnitude exceeds [`MAX_AMOUNT`].
fn check_amount(what: &str, value: Decimal) -> Result<()> {
    if value.abs() > MAX_AMOUNT {
        return Err(Error::InvalidData(format!(
            "{} {} is out of range (max {})",
            what, value, MAX_AMOUNT
        )));
    }
    Ok(())
}

fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    let value = s
        .trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
    // rows written outside the store still have to respect the bound
    check_amount("Stored amount", value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
    Ok(value)
}

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern.
fn like_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

fn transaction_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let category = match r.get::<_, Option<i64>>(5)? {
        Some(id) => Some(Category {
            id,
            name: r.get(6)?,
            r#type: r.get(7)?,
            color: r.get(8)?,
        }),
        None => None,
    };
    Ok(Transaction {
        id: r.get(0)?,
        date: r.get(1)?,
        account_id: r.get(2)?,
        amount: decimal_at(r, 3)?,
        r#type: r.get(4)?,
        category,
        description: r.get(9)?,
        is_paid: r.get(10)?,
        notes: r.get(11)?,
    })
}

fn account_from_row(r: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: r.get(0)?,
        name: r.get(1)?,
        r#type: r.get(2)?,
        opening_balance: decimal_at(r, 3)?,
        color: r.get(4)?,
        credit_limit: decimal_at(r, 5)?,
    })
}

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        r#type: r.get(2)?,
        color: r.get(3)?,
    })
}

fn goal_from_row(r: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: r.get(0)?,
        name: r.get(1)?,
        target_amount: decimal_at(r, 2)?,
        current_amount: decimal_at(r, 3)?,
        end_date: r.get(4)?,
    })
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn add_account(
        &self,
        name: &str,
        kind: AccountType,
        opening_balance: Decimal,
        color: Option<&str>,
        credit_limit: Decimal,
    ) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Account name is required".into()));
        }
        if credit_limit < Decimal::ZERO {
            return Err(Error::InvalidData("Credit limit cannot be negative".into()));
        }
        check_amount("Opening balance", opening_balance)?;
        check_amount("Credit limit", credit_limit)?;
        self.conn.execute(
            "INSERT INTO accounts(name, type, opening_balance, color, credit_limit)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                name,
                kind,
                opening_balance.to_string(),
                color,
                credit_limit.to_string()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, name, kind = %kind, "account added");
        Ok(id)
    }

    pub fn remove_account(&self, name: &str) -> Result<()> {
        let n = self
            .conn
            .execute("DELETE FROM accounts WHERE name=?1", params![name])?;
        if n == 0 {
            return Err(Error::NotFound(format!("Account '{}'", name)));
        }
        Ok(())
    }

    pub fn add_category(&self, name: &str, kind: TransactionType, color: Option<&str>) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Category name is required".into()));
        }
        if kind == TransactionType::Transfer {
            return Err(Error::InvalidData(
                "Categories are either income or expense".into(),
            ));
        }
        self.conn.execute(
            "INSERT INTO categories(name, type, color) VALUES (?1, ?2, ?3)",
            params![name, kind, color.unwrap_or(DEFAULT_CATEGORY_COLOR)],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, name, kind = %kind, "category added");
        Ok(id)
    }

    /// Insert the starter categories, skipping any that already exist.
    /// Returns how many were added.
    pub fn seed_default_categories(&self) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut added = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO categories(name, type, color) VALUES (?1, ?2, ?3)",
            )?;
            for (name, kind, color) in DEFAULT_CATEGORIES {
                added += stmt.execute(params![name, kind, color])?;
            }
        }
        tx.commit()?;
        tracing::info!(added, "default categories seeded");
        Ok(added)
    }

    pub fn remove_category(&self, id: i64) -> Result<()> {
        let n = self
            .conn
            .execute("DELETE FROM categories WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(Error::NotFound(format!("Category #{}", id)));
        }
        Ok(())
    }

    pub fn add_goal(&self, name: &str, target: Decimal, end_date: NaiveDate) -> Result<i64> {
        if target <= Decimal::ZERO {
            return Err(Error::InvalidData("Goal target must be positive".into()));
        }
        check_amount("Goal target", target)?;
        self.conn.execute(
            "INSERT INTO goals(name, target_amount, current_amount, end_date) VALUES (?1, ?2, '0', ?3)",
            params![name.trim(), target.to_string(), end_date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Add `amount` to a goal's saved amount and return the new total.
    pub fn contribute_to_goal(&self, name: &str, amount: Decimal) -> Result<Decimal> {
        check_amount("Contribution", amount)?;
        let tx = self.conn.unchecked_transaction()?;
        let current: Option<String> = tx
            .query_row(
                "SELECT current_amount FROM goals WHERE name=?1",
                params![name],
                |r| r.get(0),
            )
            .optional()?;
        let current = current.ok_or_else(|| Error::NotFound(format!("Goal '{}'", name)))?;
        let current = current
            .parse::<Decimal>()
            .map_err(|e| Error::InvalidData(format!("Goal '{}' amount '{}': {}", name, current, e)))?;
        let updated = current + amount;
        check_amount("Goal total", updated)?;
        tx.execute(
            "UPDATE goals SET current_amount=?1 WHERE name=?2",
            params![updated.to_string(), name],
        )?;
        tx.commit()?;
        Ok(updated)
    }

    fn category_type(&self, id: i64) -> Result<TransactionType> {
        self.conn
            .query_row(
                "SELECT type FROM categories WHERE id=?1",
                params![id],
                |r| r.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Category #{}", id)))
    }
}

impl LedgerStore for SqliteStore<'_> {
    fn accounts(&self) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, type, opening_balance, color, credit_limit FROM accounts ORDER BY name",
        )?;
        let rows = stmt.query_map([], account_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn account_by_name(&self, name: &str) -> Result<Account> {
        self.conn
            .query_row(
                "SELECT id, name, type, opening_balance, color, credit_limit FROM accounts WHERE name=?1",
                params![name],
                account_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Account '{}'", name)))
    }

    fn categories(&self, kind: Option<TransactionType>) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, type, color FROM categories
             WHERE ?1 IS NULL OR type=?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![kind], category_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn category_by_name(&self, name: &str, kind: Option<TransactionType>) -> Result<Category> {
        let mut matches: Vec<Category> = self
            .categories(kind)?
            .into_iter()
            .filter(|c| c.name == name)
            .collect();
        match matches.len() {
            0 => Err(Error::NotFound(format!("Category '{}'", name))),
            1 => Ok(matches.remove(0)),
            _ => Err(Error::InvalidData(format!(
                "Category '{}' exists for both income and expense; pass a type",
                name
            ))),
        }
    }

    fn transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let mut sql = String::from(TX_SELECT);
        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(range) = query.range {
            sql.push_str(" AND t.date >= ? AND t.date <= ?");
            params_vec.push(Box::new(range.start()));
            params_vec.push(Box::new(range.end()));
        }
        if let Some(kind) = query.r#type {
            sql.push_str(" AND t.type = ?");
            params_vec.push(Box::new(kind));
        }
        if let Some(id) = query.category_id {
            sql.push_str(" AND t.category_id = ?");
            params_vec.push(Box::new(id));
        }
        if let Some(id) = query.account_id {
            sql.push_str(" AND t.account_id = ?");
            params_vec.push(Box::new(id));
        }
        if let Some(text) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            // LIKE ignores ASCII case by default
            sql.push_str(" AND t.description LIKE ? ESCAPE '\\'");
            params_vec.push(Box::new(like_pattern(text)));
        }
        if query.newest_first {
            sql.push_str(" ORDER BY t.date DESC, t.id DESC");
        } else {
            sql.push_str(" ORDER BY t.date, t.id");
        }
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params_vec.push(Box::new(limit as i64));
        }

        tracing::debug!(%sql, "querying transactions");
        let mut stmt = self.conn.prepare(&sql)?;
        let refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(refs.as_slice(), transaction_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn record_transaction(&self, new: &NewTransaction) -> Result<i64> {
        if new.description.trim().is_empty() {
            return Err(Error::InvalidData("Description is required".into()));
        }
        if new.amount < Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "Amount must not be negative (got {})",
                new.amount
            )));
        }
        check_amount("Amount", new.amount)?;

        let tx = self.conn.unchecked_transaction()?;
        let account_exists: Option<i64> = tx
            .query_row(
                "SELECT id FROM accounts WHERE id=?1",
                params![new.account_id],
                |r| r.get(0),
            )
            .optional()?;
        if account_exists.is_none() {
            return Err(Error::NotFound(format!("Account #{}", new.account_id)));
        }
        if let Some(cat_id) = new.category_id {
            if new.r#type == TransactionType::Transfer {
                return Err(Error::InvalidData(
                    "Transfers cannot carry a category".into(),
                ));
            }
            let cat_type = self.category_type(cat_id)?;
            if cat_type != new.r#type {
                return Err(Error::InvalidData(format!(
                    "Category #{} is an {} category, transaction is {}",
                    cat_id, cat_type, new.r#type
                )));
            }
        }

        tx.execute(
            "INSERT INTO transactions(date, account_id, category_id, description, amount, type, is_paid, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                new.date,
                new.account_id,
                new.category_id,
                new.description.trim(),
                new.amount.to_string(),
                new.r#type,
                new.is_paid,
                new.notes
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        tracing::info!(
            id,
            account_id = new.account_id,
            kind = %new.r#type,
            amount = %new.amount,
            paid = new.is_paid,
            "transaction recorded"
        );
        Ok(id)
    }

    fn set_paid(&self, id: i64, paid: bool) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE transactions SET is_paid=?1 WHERE id=?2",
            params![paid, id],
        )?;
        if n == 0 {
            return Err(Error::NotFound(format!("Transaction #{}", id)));
        }
        tracing::debug!(id, paid, "settlement flag updated");
        Ok(())
    }

    fn delete_transaction(&self, id: i64) -> Result<()> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(Error::NotFound(format!("Transaction #{}", id)));
        }
        Ok(())
    }

    fn goals(&self) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, target_amount, current_amount, end_date FROM goals ORDER BY end_date",
        )?;
        let rows = stmt.query_map([], goal_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
