// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrend::aggregate::{
    DateRange, account_balances, derived_balance, settlement_delta, summarize,
};
use fintrend::db;
use fintrend::error::Error;
use fintrend::models::{AccountType, DEFAULT_CATEGORIES, MAX_AMOUNT, NewTransaction, TransactionType};
use fintrend::store::{LedgerStore, SqliteStore, TransactionQuery};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

struct Fixture {
    conn: Connection,
    checking: i64,
    card: i64,
    food: i64,
    salary: i64,
}

fn setup() -> Fixture {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let checking = store
        .add_account("Checking", AccountType::Checking, dec("100"), None, Decimal::ZERO)
        .unwrap();
    let card = store
        .add_account("Visa", AccountType::CreditCard, Decimal::ZERO, Some("#1e40af"), dec("500"))
        .unwrap();
    let food = store
        .add_category("Food", TransactionType::Expense, None)
        .unwrap();
    let salary = store
        .add_category("Salary", TransactionType::Income, Some("#10b981"))
        .unwrap();
    Fixture {
        conn,
        checking,
        card,
        food,
        salary,
    }
}

fn new_tx(
    account_id: i64,
    date: &str,
    amount: &str,
    kind: TransactionType,
    category_id: Option<i64>,
    is_paid: bool,
) -> NewTransaction {
    NewTransaction {
        date: d(date),
        account_id,
        amount: dec(amount),
        r#type: kind,
        category_id,
        description: "entry".into(),
        is_paid,
        notes: None,
    }
}

#[test]
fn recorded_transactions_round_trip_with_category() {
    let f = setup();
    let store = SqliteStore::new(&f.conn);
    let id = store
        .record_transaction(&new_tx(
            f.checking,
            "2024-03-05",
            "12.34",
            TransactionType::Expense,
            Some(f.food),
            true,
        ))
        .unwrap();
    let all = store.transactions(&TransactionQuery::default()).unwrap();
    assert_eq!(all.len(), 1);
    let t = &all[0];
    assert_eq!(t.id, id);
    assert_eq!(t.amount, dec("12.34"));
    assert_eq!(t.date, d("2024-03-05"));
    let cat = t.category.as_ref().unwrap();
    assert_eq!(cat.name, "Food");
    assert_eq!(cat.color, "#e2e8f0");
}

#[test]
fn query_filters_by_range_type_account_and_category() {
    let f = setup();
    let store = SqliteStore::new(&f.conn);
    let rows = [
        new_tx(f.checking, "2024-02-28", "5", TransactionType::Expense, Some(f.food), true),
        new_tx(f.checking, "2024-03-01", "2000", TransactionType::Income, Some(f.salary), true),
        new_tx(f.card, "2024-03-10", "40", TransactionType::Expense, Some(f.food), true),
        new_tx(f.checking, "2024-03-31", "9", TransactionType::Expense, None, false),
        new_tx(f.checking, "2024-04-01", "1", TransactionType::Expense, None, true),
    ];
    for r in &rows {
        store.record_transaction(r).unwrap();
    }
    let march = DateRange::new(d("2024-03-01"), d("2024-03-31")).unwrap();

    let in_march = store.transactions(&TransactionQuery::in_range(march)).unwrap();
    assert_eq!(in_march.len(), 3);
    assert!(in_march.windows(2).all(|w| w[0].date <= w[1].date));

    let expenses = store
        .transactions(&TransactionQuery::in_range(march).of_type(TransactionType::Expense))
        .unwrap();
    assert_eq!(expenses.len(), 2);

    let card_only = store
        .transactions(&TransactionQuery::default().account(f.card))
        .unwrap();
    assert_eq!(card_only.len(), 1);

    let food = store
        .transactions(&TransactionQuery::default().category(f.food))
        .unwrap();
    assert_eq!(food.len(), 2);

    let latest = store
        .transactions(&TransactionQuery::default().newest_first().limit(2))
        .unwrap();
    assert_eq!(latest[0].date, d("2024-04-01"));
    assert_eq!(latest.len(), 2);
}

#[test]
fn record_rejects_bad_input() {
    let f = setup();
    let store = SqliteStore::new(&f.conn);

    let negative = new_tx(f.checking, "2024-03-01", "-1", TransactionType::Expense, None, true);
    assert!(matches!(store.record_transaction(&negative), Err(Error::InvalidData(_))));

    let wrong_cat = new_tx(f.checking, "2024-03-01", "1", TransactionType::Expense, Some(f.salary), true);
    assert!(matches!(store.record_transaction(&wrong_cat), Err(Error::InvalidData(_))));

    let transfer_cat = new_tx(f.checking, "2024-03-01", "1", TransactionType::Transfer, Some(f.food), true);
    assert!(matches!(store.record_transaction(&transfer_cat), Err(Error::InvalidData(_))));

    let no_account = new_tx(999, "2024-03-01", "1", TransactionType::Income, None, true);
    assert!(matches!(store.record_transaction(&no_account), Err(Error::NotFound(_))));

    let mut blank = new_tx(f.checking, "2024-03-01", "1", TransactionType::Income, None, true);
    blank.description = "  ".into();
    assert!(store.record_transaction(&blank).is_err());

    assert!(store.transactions(&TransactionQuery::default()).unwrap().is_empty());
}

#[test]
fn settlement_delta_by_type_and_flag() {
    let f = setup();
    let store = SqliteStore::new(&f.conn);
    for r in [
        new_tx(f.checking, "2024-03-01", "10", TransactionType::Income, None, true),
        new_tx(f.checking, "2024-03-01", "4", TransactionType::Expense, None, true),
        new_tx(f.checking, "2024-03-01", "50", TransactionType::Transfer, None, true),
        new_tx(f.checking, "2024-03-01", "7", TransactionType::Expense, None, false),
    ] {
        store.record_transaction(&r).unwrap();
    }
    let deltas: Vec<_> = store
        .transactions(&TransactionQuery::default())
        .unwrap()
        .iter()
        .map(settlement_delta)
        .collect();
    assert_eq!(deltas, vec![dec("10"), dec("-4"), Decimal::ZERO, Decimal::ZERO]);
}

#[test]
fn balance_is_derived_from_settled_ledger() {
    let f = setup();
    let store = SqliteStore::new(&f.conn);
    store
        .record_transaction(&new_tx(f.checking, "2024-03-01", "2000", TransactionType::Income, Some(f.salary), true))
        .unwrap();
    store
        .record_transaction(&new_tx(f.checking, "2024-03-02", "150.25", TransactionType::Expense, Some(f.food), true))
        .unwrap();
    let pending = store
        .record_transaction(&new_tx(f.checking, "2024-03-03", "80", TransactionType::Expense, None, false))
        .unwrap();
    store
        .record_transaction(&new_tx(f.card, "2024-03-04", "600", TransactionType::Expense, Some(f.food), true))
        .unwrap();

    let checking = store.account_by_name("Checking").unwrap();
    let ledger = store.transactions(&TransactionQuery::default()).unwrap();
    assert_eq!(derived_balance(&checking, &ledger), dec("1949.75"));

    // settling the pending bill is the only write needed
    store.set_paid(pending, true).unwrap();
    let ledger = store.transactions(&TransactionQuery::default()).unwrap();
    assert_eq!(derived_balance(&checking, &ledger), dec("1869.75"));

    store.delete_transaction(pending).unwrap();
    let ledger = store.transactions(&TransactionQuery::default()).unwrap();
    let balances = account_balances(&store.accounts().unwrap(), &ledger);
    let visa = balances.iter().find(|b| b.name == "Visa").unwrap();
    assert_eq!(visa.balance, dec("-600"));
    assert_eq!(visa.available_credit, Some(dec("-100")));
    let checking = balances.iter().find(|b| b.name == "Checking").unwrap();
    assert_eq!(checking.balance, dec("1949.75"));
    assert_eq!(checking.available_credit, None);
}

#[test]
fn category_lookup_by_name_and_type() {
    let f = setup();
    let store = SqliteStore::new(&f.conn);
    store
        .add_category("Other", TransactionType::Income, None)
        .unwrap();
    store
        .add_category("Other", TransactionType::Expense, None)
        .unwrap();
    assert!(store.category_by_name("Other", None).is_err());
    let c = store
        .category_by_name("Other", Some(TransactionType::Income))
        .unwrap();
    assert_eq!(c.r#type, TransactionType::Income);
    assert!(matches!(
        store.add_category("Moves", TransactionType::Transfer, None),
        Err(Error::InvalidData(_))
    ));
    assert_eq!(store.categories(Some(TransactionType::Expense)).unwrap().len(), 2);
}

#[test]
fn missing_rows_report_not_found() {
    let f = setup();
    let store = SqliteStore::new(&f.conn);
    assert!(matches!(store.set_paid(42, true), Err(Error::NotFound(_))));
    assert!(matches!(store.delete_transaction(42), Err(Error::NotFound(_))));
    assert!(matches!(store.account_by_name("Nope"), Err(Error::NotFound(_))));
    assert!(matches!(store.remove_account("Nope"), Err(Error::NotFound(_))));
}

#[test]
fn amounts_beyond_the_bound_are_rejected() {
    let f = setup();
    let store = SqliteStore::new(&f.conn);

    let huge = new_tx(f.checking, "2024-03-01", "1", TransactionType::Income, None, true);
    for amount in [MAX_AMOUNT + Decimal::ONE, Decimal::MAX] {
        let rec = NewTransaction { amount, ..huge.clone() };
        assert!(matches!(store.record_transaction(&rec), Err(Error::InvalidData(_))));
    }
    assert!(matches!(
        store.add_account("Vault", AccountType::Savings, dec("-10000000000000000"), None, Decimal::ZERO),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        store.add_account("Black", AccountType::CreditCard, Decimal::ZERO, None, Decimal::MAX),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        store.add_goal("Moon", Decimal::MAX, d("2030-01-01")),
        Err(Error::InvalidData(_))
    ));
    store.add_goal("House", dec("1000"), d("2030-01-01")).unwrap();
    store.contribute_to_goal("House", MAX_AMOUNT).unwrap();
    assert!(matches!(
        store.contribute_to_goal("House", Decimal::ONE),
        Err(Error::InvalidData(_))
    ));

    // the largest accepted amount still sums without overflow
    let max = NewTransaction { amount: MAX_AMOUNT, ..huge };
    store.record_transaction(&max).unwrap();
    store.record_transaction(&max).unwrap();
    let ledger = store.transactions(&TransactionQuery::default()).unwrap();
    let march = DateRange::new(d("2024-03-01"), d("2024-03-31")).unwrap();
    assert_eq!(summarize(&ledger, march).income, MAX_AMOUNT * Decimal::TWO);
}

#[test]
fn oversized_stored_amount_fails_the_fetch() {
    let f = setup();
    f.conn
        .execute(
            "INSERT INTO transactions(date,account_id,amount,description,type) \
             VALUES ('2024-03-01',?1,'79228162514264337593543950335','Bogus','income')",
            [f.checking],
        )
        .unwrap();
    let store = SqliteStore::new(&f.conn);
    assert!(store.transactions(&TransactionQuery::default()).is_err());
}

#[test]
fn seeding_default_categories_is_repeatable() {
    let f = setup();
    let store = SqliteStore::new(&f.conn);

    // Food and Salary already exist from the fixture
    let added = store.seed_default_categories().unwrap();
    assert_eq!(added, DEFAULT_CATEGORIES.len() - 2);
    assert_eq!(store.seed_default_categories().unwrap(), 0);

    let all = store.categories(None).unwrap();
    assert_eq!(all.len(), DEFAULT_CATEGORIES.len());
    assert_eq!(store.categories(Some(TransactionType::Income)).unwrap().len(), 4);
    assert_eq!(store.categories(Some(TransactionType::Expense)).unwrap().len(), 8);
    // existing rows keep their own color
    let food = store.category_by_name("Food", Some(TransactionType::Expense)).unwrap();
    assert_eq!(food.id, f.food);
    assert_eq!(food.color, "#e2e8f0");
}
