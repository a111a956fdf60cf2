// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::models::{ExpenseBreakdown, LargestContribution, SourceBreakdown, Transaction};
use crate::utils::round_cents;

use super::aggregate::{expenses_by_recipient, income_by_source};
use super::classify::Classifier;
use super::filter::{included, is_credit, local_date};

/// Scan cap used by the legacy dashboard before filtering to one-time gifts.
pub const LEGACY_ONE_TIME_SCAN_CAP: usize = 1000;

pub fn top_n<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items.iter().take(n).cloned().collect()
}

pub fn top_sources(txs: &[Transaction], n: usize) -> Vec<SourceBreakdown> {
    top_n(&income_by_source(txs), n)
}

pub fn top_expenses(txs: &[Transaction], n: usize) -> Vec<ExpenseBreakdown> {
    top_n(&expenses_by_recipient(txs), n)
}

fn all_contributions(
    txs: &[Transaction],
    classifier: &Classifier,
) -> Result<Vec<LargestContribution>> {
    let mut out = included(txs)
        .filter(|tx| is_credit(tx))
        .map(|tx| {
            Ok(LargestContribution {
                date: local_date(tx)?,
                source: tx.counterparty().to_string(),
                amount: round_cents(tx.amount),
                description: tx.description.clone(),
                is_recurring: classifier.is_recurring(tx),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    Ok(out)
}

/// Individual credits, largest first.
pub fn largest_contributions(
    txs: &[Transaction],
    classifier: &Classifier,
    limit: usize,
) -> Result<Vec<LargestContribution>> {
    let mut all = all_contributions(txs, classifier)?;
    all.truncate(limit);
    Ok(all)
}

/// Largest credits that are not recurring.
///
/// With `scan_cap` unset the filter runs over every credit. With a cap, only
/// the `cap` largest credits are scanned before filtering, so one-time gifts
/// ranked below that many recurring ones are dropped.
pub fn largest_one_time_contributions(
    txs: &[Transaction],
    classifier: &Classifier,
    limit: usize,
    scan_cap: Option<usize>,
) -> Result<Vec<LargestContribution>> {
    let mut all = all_contributions(txs, classifier)?;
    if let Some(cap) = scan_cap {
        all.truncate(cap);
    }
    Ok(all
        .into_iter()
        .filter(|c| !c.is_recurring)
        .take(limit)
        .collect())
}
