// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Shared predicates and timestamp handling.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{Direction, Transaction};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A reversal, or a transaction that has been reversed. Both halves of a
/// reversed pair are excluded from every aggregate.
pub fn is_excluded(tx: &Transaction) -> bool {
    tx.is_reverse
        || tx.is_reversed
        || tx
            .reverse_transaction_id
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty())
}

pub fn included(txs: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    txs.iter().filter(|tx| !is_excluded(tx))
}

pub fn is_credit(tx: &Transaction) -> bool {
    tx.direction == Direction::Credit
}

pub fn is_debit(tx: &Transaction) -> bool {
    tx.direction == Direction::Debit
}

pub fn is_kind(tx: &Transaction, kind: &str) -> bool {
    tx.kind == kind
}

/// Expense magnitude of a debit, income of a credit.
pub fn magnitude(tx: &Transaction) -> Decimal {
    match tx.direction {
        Direction::Credit => tx.amount,
        Direction::Debit => tx.amount.abs(),
    }
}

/// Parse an effective timestamp into `tz`.
///
/// Offset-bearing timestamps convert; naive date-times are wall-clock time
/// in `tz`; a bare date is midnight UTC. Anything else is an error rather
/// than a silent epoch default.
pub fn parse_effective_in<Tz: TimeZone>(tx: &Transaction, tz: &Tz) -> Result<DateTime<Tz>> {
    let raw = tx.effective_date.trim();
    let invalid = || Error::InvalidTimestamp {
        id: tx.id.clone(),
        value: tx.effective_date.clone(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(tz));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return tz.from_local_datetime(&naive).earliest().ok_or_else(invalid);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        return Ok(Utc.from_utc_datetime(&midnight).with_timezone(tz));
    }
    Err(invalid())
}

pub fn month_key_in<Tz: TimeZone>(tx: &Transaction, tz: &Tz) -> Result<String> {
    let dt = parse_effective_in(tx, tz)?;
    Ok(format!("{:04}-{:02}", dt.year(), dt.month()))
}

/// `YYYY-MM` in the local calendar of the machine running the analysis.
pub fn month_key(tx: &Transaction) -> Result<String> {
    month_key_in(tx, &Local)
}

pub fn local_date_in<Tz: TimeZone>(tx: &Transaction, tz: &Tz) -> Result<NaiveDate> {
    Ok(parse_effective_in(tx, tz)?.date_naive())
}

pub fn local_date(tx: &Transaction) -> Result<NaiveDate> {
    local_date_in(tx, &Local)
}

/// Split a `YYYY-MM` key into (year, month).
pub fn split_month_key(key: &str) -> Option<(i32, u32)> {
    let (y, m) = key.split_once('-')?;
    let y: i32 = y.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    (1..=12).contains(&m).then_some((y, m))
}
