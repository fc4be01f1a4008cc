// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrend::commands::doctor;
use fintrend::db;

#[test]
fn clean_ledger_has_no_issues() {
    let conn = db::open_in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    assert!(doctor::diagnose(&conn, today).unwrap().is_empty());
}

#[test]
fn reports_overdue_mismatched_and_over_limit() {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(id,name,type,credit_limit) VALUES (1,'Visa','credit_card','100');
        INSERT INTO categories(id,name,type) VALUES (1,'Salary','income');
        -- written directly, bypassing store validation
        INSERT INTO transactions(date,account_id,amount,description,category_id,type,is_paid)
            VALUES ('2025-01-02',1,'150','Laptop',1,'expense',1);
        INSERT INTO transactions(date,account_id,amount,description,category_id,type,is_paid)
            VALUES ('2025-01-05',1,'30','Phone bill',NULL,'expense',0);
        INSERT INTO transactions(date,account_id,amount,description,category_id,type,is_paid)
            VALUES ('2025-01-20',1,'30','Future bill',NULL,'expense',0);
        "#,
    )
    .unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    let rows = doctor::diagnose(&conn, today).unwrap();
    let kinds: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(
        kinds,
        vec!["category_type_mismatch", "overdue_unpaid", "credit_limit_exceeded"]
    );
    assert!(rows[2][1].contains("over by 50"));
}

#[test]
fn categorized_transfer_is_its_own_issue() {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(id,name,type) VALUES (1,'Checking','checking');
        INSERT INTO categories(id,name,type) VALUES (1,'Food','expense');
        INSERT INTO transactions(date,account_id,amount,description,category_id,type)
            VALUES ('2025-01-03',1,'80','To savings',1,'transfer');
        INSERT INTO transactions(date,account_id,amount,description,category_id,type)
            VALUES ('2025-01-04',1,'12','Lunch',1,'expense');
        "#,
    )
    .unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    let rows = doctor::diagnose(&conn, today).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "categorized_transfer");
    assert!(rows[0][1].contains("To savings"));
}
