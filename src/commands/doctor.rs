// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use anyhow::Result;

use super::Ledger;
use crate::analysis::filter::{is_excluded, month_key};
use crate::models::{Transaction, kind};
use crate::utils::pretty_table;

/// (issue, detail) pairs for data the reports would mishandle or drop.
pub fn diagnose(txs: &[Transaction]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Timestamps the month grouping would reject
    for tx in txs {
        if month_key(tx).is_err() {
            rows.push(vec![
                "invalid_timestamp".into(),
                format!("{} '{}'", tx.id, tx.effective_date),
            ]);
        }
    }

    // 2) Duplicate IDs and reversal references to rows not in the export
    let mut seen: HashSet<&str> = HashSet::new();
    for tx in txs {
        if !seen.insert(tx.id.as_str()) {
            rows.push(vec!["duplicate_id".into(), tx.id.clone()]);
        }
    }
    for tx in txs {
        if let Some(r) = tx.reverse_transaction_id.as_deref() {
            if !r.is_empty() && !seen.contains(r) {
                rows.push(vec!["dangling_reversal".into(), format!("{} -> {}", tx.id, r)]);
            }
        }
    }

    // 3) Rows that will be grouped under "Unknown"
    for tx in txs.iter().filter(|tx| !is_excluded(tx)) {
        let blank = |s: &Option<String>| s.as_deref().is_none_or(|v| v.trim().is_empty());
        if blank(&tx.counterparty_name) && blank(&tx.counterparty_handle) {
            rows.push(vec!["unknown_counterparty".into(), tx.id.clone()]);
        }
    }

    // 4) Kinds the classifier has no rule for; they only reach the
    // pass-through category and "Other" income
    let known = [kind::CONTRIBUTION, kind::EXPENSE, kind::ADDED_FUNDS, kind::HOST_FEE];
    let mut unknown_kinds: Vec<(&str, usize)> = Vec::new();
    for tx in txs.iter().filter(|tx| !is_excluded(tx)) {
        if known.contains(&tx.kind.as_str()) {
            continue;
        }
        match unknown_kinds.iter_mut().find(|(k, _)| *k == tx.kind) {
            Some((_, n)) => *n += 1,
            None => unknown_kinds.push((tx.kind.as_str(), 1)),
        }
    }
    for (k, n) in unknown_kinds {
        let label = if k.is_empty() { "(blank)" } else { k };
        rows.push(vec!["unclassified_kind".into(), format!("{} ({} rows)", label, n)]);
    }

    // 5) Amounts are summed without conversion
    let mut currencies: Vec<&str> = Vec::new();
    for tx in txs {
        if !tx.currency.is_empty() && !currencies.contains(&tx.currency.as_str()) {
            currencies.push(&tx.currency);
        }
    }
    if currencies.len() > 1 {
        rows.push(vec!["mixed_currency".into(), currencies.join(", ")]);
    }

    rows
}

pub fn handle(ledger: &Ledger) -> Result<()> {
    let rows = diagnose(&ledger.transactions);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
