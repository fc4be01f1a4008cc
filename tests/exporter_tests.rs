// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrend::{cli, commands::exporter, db};
use rusqlite::Connection;
use serde_json::Value;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO accounts(id,name,type) VALUES (1,'Checking','checking')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO categories(id,name,type) VALUES (1,'Groceries','expense')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(date,account_id,amount,description,category_id,type,notes) VALUES \
        ('2025-01-02',1,'12.34','Corner Shop',1,'expense','Weekly run'), \
        ('2025-01-08',1,'1500','Payroll',NULL,'income',NULL), \
        ('2025-01-09',1,'200','To savings',NULL,'transfer',NULL)",
        [],
    )
    .unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("export", sub)) = matches.subcommand() {
        exporter::handle(conn, sub).unwrap();
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_writes_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.json");
    let out_str = out.to_string_lossy().to_string();

    run(
        &conn,
        &["fintrend", "export", "transactions", "--format", "json", "--out", &out_str],
    );

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.contains("\n  {"), "expected pretty JSON output");
    let v: Value = serde_json::from_str(&contents).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["account"], "Checking");
    assert_eq!(arr[0]["category"], "Groceries");
    assert_eq!(arr[0]["type"], "expense");
    assert_eq!(arr[0]["amount"], "12.34");
    assert_eq!(arr[1]["category"], Value::Null);
}

#[test]
fn export_transactions_csv_respects_range() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.csv");
    let out_str = out.to_string_lossy().to_string();

    run(
        &conn,
        &[
            "fintrend", "export", "transactions", "--from", "2025-01-05", "--to", "2025-01-31",
            "--out", &out_str,
        ],
    );

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "date");
    let records: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][2], "Payroll");
}

#[test]
fn export_trend_writes_weekly_buckets() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("trend.csv");
    let out_str = out.to_string_lossy().to_string();

    run(
        &conn,
        &[
            "fintrend", "export", "trend", "--from", "2025-01-01", "--to", "2025-01-12",
            "--interval", "week", "--out", &out_str,
        ],
    );

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let records: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
    // 2024-12-30 and 2025-01-06 weeks
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "2024-12-30");
    assert_eq!(&records[0][1], "2025-01-01");
    assert_eq!(&records[0][4], "12.34");
    assert_eq!(&records[1][3], "1500");
    assert_eq!(&records[1][5], "1500");
}
