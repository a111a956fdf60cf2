// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;

use fundscope::Error;
use fundscope::loader::{load_path, load_reader};
use fundscope::models::Direction;
use rust_decimal::Decimal;
use tempfile::tempdir;

const HEADER: &str = "Effective Date & Time,Transaction ID,Description,Credit/Debit,Kind,Amount Single Column,Currency,Is Reverse,Is Reversed,Reverse Transaction ID,Opposite Account Name,Opposite Account Handle,Accounting Category Name,Payment Processor Fee,Tax Amount";

#[test]
fn loads_full_export_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.csv");
    let body = format!(
        "{HEADER}\n\
         2024-01-15T12:00:00Z,tx-1,Monthly contribution from Ada,CREDIT,CONTRIBUTION,100.00,usd,false,false,,Ada Lovelace,ada,,-3.20,\n\
         2024-01-20T12:00:00Z,tx-2, stipend payment ,DEBIT,EXPENSE,-40,USD,0,1,tx-9,,  ,Consultants - Dev,,0\n"
    );
    fs::write(&path, body).unwrap();

    let txs = load_path(&path).unwrap();
    assert_eq!(txs.len(), 2);

    let a = &txs[0];
    assert_eq!(a.id, "tx-1");
    assert_eq!(a.direction, Direction::Credit);
    assert_eq!(a.amount, Decimal::new(10000, 2));
    assert_eq!(a.currency, "USD");
    assert_eq!(a.counterparty_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(a.counterparty_handle.as_deref(), Some("ada"));
    assert_eq!(a.accounting_category, None);
    assert_eq!(a.reverse_transaction_id, None);
    assert_eq!(a.payment_processor_fee, Decimal::new(-320, 2));
    assert_eq!(a.tax_amount, Decimal::ZERO);

    let b = &txs[1];
    assert_eq!(b.description, "stipend payment");
    assert_eq!(b.direction, Direction::Debit);
    assert!(!b.is_reverse);
    assert!(b.is_reversed);
    assert_eq!(b.reverse_transaction_id.as_deref(), Some("tx-9"));
    assert_eq!(b.counterparty_name, None);
    assert_eq!(b.counterparty_handle, None);
    assert_eq!(b.counterparty(), "Unknown");
    assert_eq!(b.accounting_category.as_deref(), Some("Consultants - Dev"));
}

#[test]
fn minimal_export_with_reordered_and_extra_columns() {
    let csv = "Kind,Amount Single Column,Legacy Column,Credit/Debit,Transaction ID,Effective Date & Time\n\
               ADDED_FUNDS,1.5e2,whatever,credit,x1,2024-03-01\n";
    let txs = load_reader(csv.as_bytes()).unwrap();
    assert_eq!(txs.len(), 1);
    let t = &txs[0];
    assert_eq!(t.kind, "ADDED_FUNDS");
    assert_eq!(t.amount, Decimal::from(150));
    assert_eq!(t.direction, Direction::Credit);
    assert_eq!(t.description, "");
    assert!(!t.is_reverse);
    assert_eq!(t.effective_date, "2024-03-01");
}

#[test]
fn blank_amount_is_zero() {
    let csv = format!("{HEADER}\n2024-01-15,tx-1,gift,CREDIT,CONTRIBUTION,,USD,,,,,,,,\n");
    let txs = load_reader(csv.as_bytes()).unwrap();
    assert_eq!(txs[0].amount, Decimal::ZERO);
}

#[test]
fn missing_required_columns_are_named() {
    let csv = "Transaction ID,Kind\nx,EXPENSE\n";
    let err = load_reader(csv.as_bytes()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Effective Date & Time"), "{msg}");
    assert!(msg.contains("Credit/Debit"), "{msg}");
    assert!(msg.contains("Amount Single Column"), "{msg}");
    assert!(!msg.contains("Kind"), "{msg}");
}

#[test]
fn invalid_direction_reports_row() {
    let csv = format!("{HEADER}\n2024-01-15,tx-1,gift,SIDEWAYS,CONTRIBUTION,1,USD,,,,,,,,\n");
    match load_reader(csv.as_bytes()).unwrap_err() {
        Error::InvalidData(msg) => {
            assert!(msg.contains("Row 2"), "{msg}");
            assert!(msg.contains("SIDEWAYS"), "{msg}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn bad_flag_and_amount_are_errors() {
    let csv = format!("{HEADER}\n2024-01-15,tx-1,gift,CREDIT,CONTRIBUTION,1,USD,maybe,,,,,,,\n");
    assert!(matches!(
        load_reader(csv.as_bytes()),
        Err(Error::InvalidData(_))
    ));
    let csv = format!("{HEADER}\n2024-01-15,tx-1,gift,CREDIT,CONTRIBUTION,ten,USD,,,,,,,,\n");
    assert!(matches!(
        load_reader(csv.as_bytes()),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn empty_id_is_rejected() {
    let csv = format!("{HEADER}\n2024-01-15, ,gift,CREDIT,CONTRIBUTION,1,USD,,,,,,,,\n");
    assert!(load_reader(csv.as_bytes()).is_err());
}

#[test]
fn timestamps_are_kept_verbatim() {
    let csv = format!("{HEADER}\nnot a date,tx-1,gift,CREDIT,CONTRIBUTION,1,USD,,,,,,,,\n");
    let txs = load_reader(csv.as_bytes()).unwrap();
    assert_eq!(txs[0].effective_date, "not a date");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_path(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
