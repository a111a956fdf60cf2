// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Group-by-key accumulation into report rows.
//!
//! Every function walks the non-excluded transactions once, accumulates in
//! locals, and rounds to cents only when materializing rows.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::Result;
use crate::models::{
    CategoryBreakdown, ContributionSide, ContributorAnalysis, ExpenseBreakdown, LedgerOverview,
    MonthlyContributions, MonthlySummary, SalaryAnalysis, SourceBreakdown, Transaction, kind,
};
use crate::utils::round_cents;

use super::classify::Classifier;
use super::filter::{
    included, is_credit, is_debit, is_excluded, is_kind, magnitude, month_key, split_month_key,
};

/// Keyed sum/count that remembers first-seen key order, so a stable sort
/// by amount breaks ties by insertion.
#[derive(Debug, Default)]
struct Tally {
    index: HashMap<String, usize>,
    rows: Vec<(String, Decimal, usize)>,
}

impl Tally {
    fn add(&mut self, key: &str, amount: Decimal) {
        match self.index.get(key) {
            Some(&i) => {
                let row = &mut self.rows[i];
                row.1 += amount;
                row.2 += 1;
            }
            None => {
                self.index.insert(key.to_string(), self.rows.len());
                self.rows.push((key.to_string(), amount, 1));
            }
        }
    }

    fn total(&self) -> (Decimal, usize) {
        self.rows
            .iter()
            .fold((Decimal::ZERO, 0), |(a, c), r| (a + r.1, c + r.2))
    }

    /// Rows rounded to cents, largest amount first.
    fn into_sorted(self) -> Vec<(String, Decimal, usize)> {
        let mut rows: Vec<_> = self
            .rows
            .into_iter()
            .map(|(k, a, c)| (k, round_cents(a), c))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }
}

fn into_sources(tally: Tally) -> Vec<SourceBreakdown> {
    tally
        .into_sorted()
        .into_iter()
        .map(|(source, amount, count)| SourceBreakdown {
            source,
            amount,
            count,
        })
        .collect()
}

/// Income, expenses and net per local calendar month, oldest first.
pub fn monthly_summary(txs: &[Transaction]) -> Result<Vec<MonthlySummary>> {
    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for tx in included(txs) {
        let key = month_key(tx)?;
        let entry = months.entry(key).or_insert((Decimal::ZERO, Decimal::ZERO));
        if is_credit(tx) {
            entry.0 += tx.amount;
        } else {
            entry.1 += tx.amount.abs();
        }
    }
    debug!(months = months.len(), "Built monthly summary");
    Ok(months
        .into_iter()
        .map(|(month, (inc, exp))| {
            let income = round_cents(inc);
            let expenses = round_cents(exp);
            MonthlySummary {
                month,
                income,
                expenses,
                // Difference of the rounded totals, so the row always balances.
                net: income - expenses,
            }
        })
        .collect())
}

/// Credits grouped by counterparty, largest first.
pub fn income_by_source(txs: &[Transaction]) -> Vec<SourceBreakdown> {
    let mut tally = Tally::default();
    for tx in included(txs).filter(|tx| is_credit(tx)) {
        tally.add(tx.counterparty(), tx.amount);
    }
    into_sources(tally)
}

/// Debits grouped by counterparty (absolute amounts), largest first.
pub fn expenses_by_recipient(txs: &[Transaction]) -> Vec<ExpenseBreakdown> {
    let mut tally = Tally::default();
    for tx in included(txs).filter(|tx| is_debit(tx)) {
        tally.add(tx.counterparty(), tx.amount.abs());
    }
    tally
        .into_sorted()
        .into_iter()
        .map(|(recipient, amount, count)| ExpenseBreakdown {
            recipient,
            amount,
            count,
        })
        .collect()
}

/// Debits grouped by mapped expense category, largest first.
pub fn expenses_by_category(
    txs: &[Transaction],
    classifier: &Classifier,
) -> Vec<CategoryBreakdown> {
    let mut tally = Tally::default();
    for tx in included(txs).filter(|tx| is_debit(tx)) {
        tally.add(&classifier.expense_category(tx), tx.amount.abs());
    }
    tally
        .into_sorted()
        .into_iter()
        .map(|(category, amount, count)| CategoryBreakdown {
            category,
            amount,
            count,
        })
        .collect()
}

fn is_contribution(tx: &Transaction) -> bool {
    is_credit(tx) && is_kind(tx, kind::CONTRIBUTION)
}

fn side(tally: Tally) -> ContributionSide {
    let (total, count) = tally.total();
    ContributionSide {
        total: round_cents(total),
        count,
        contributors: into_sources(tally),
    }
}

/// Contributions split into recurring and one-time, each by contributor.
pub fn contributor_analysis(txs: &[Transaction], classifier: &Classifier) -> ContributorAnalysis {
    let mut recurring = Tally::default();
    let mut one_time = Tally::default();
    for tx in included(txs).filter(|tx| is_contribution(tx)) {
        if classifier.is_recurring(tx) {
            recurring.add(tx.counterparty(), tx.amount);
        } else {
            one_time.add(tx.counterparty(), tx.amount);
        }
    }
    ContributorAnalysis {
        recurring: side(recurring),
        one_time: side(one_time),
    }
}

/// Recurring and one-time contribution totals per month, oldest first.
pub fn monthly_contributions(
    txs: &[Transaction],
    classifier: &Classifier,
) -> Result<Vec<MonthlyContributions>> {
    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for tx in included(txs).filter(|tx| is_contribution(tx)) {
        let entry = months
            .entry(month_key(tx)?)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        if classifier.is_recurring(tx) {
            entry.0 += tx.amount;
        } else {
            entry.1 += tx.amount;
        }
    }
    Ok(months
        .into_iter()
        .map(|(month, (r, o))| MonthlyContributions {
            month,
            recurring: round_cents(r),
            one_time: round_cents(o),
        })
        .collect())
}

/// Inclusive count of months between two `YYYY-MM` keys, at least 1.
pub fn month_span(first: &str, last: &str) -> i64 {
    match (split_month_key(first), split_month_key(last)) {
        (Some((fy, fm)), Some((ly, lm))) => {
            let span = (ly - fy) as i64 * 12 + (lm as i64 - fm as i64) + 1;
            span.max(1)
        }
        _ => 1,
    }
}

struct Payee {
    description: String,
    total: Decimal,
    count: usize,
    first_month: String,
    last_month: String,
}

/// Salary-like payments per recipient, highest total first.
pub fn salary_analysis(
    txs: &[Transaction],
    classifier: &Classifier,
) -> Result<Vec<SalaryAnalysis>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut payees: Vec<(String, Payee)> = Vec::new();

    for tx in included(txs).filter(|tx| classifier.is_salary_like(tx)) {
        let month = month_key(tx)?;
        let recipient = tx.counterparty();
        match index.get(recipient) {
            Some(&i) => {
                let p = &mut payees[i].1;
                p.total += tx.amount.abs();
                p.count += 1;
                if month < p.first_month {
                    p.first_month = month.clone();
                }
                if month > p.last_month {
                    p.last_month = month;
                }
            }
            None => {
                index.insert(recipient.to_string(), payees.len());
                payees.push((
                    recipient.to_string(),
                    Payee {
                        description: tx.description.clone(),
                        total: tx.amount.abs(),
                        count: 1,
                        first_month: month.clone(),
                        last_month: month,
                    },
                ));
            }
        }
    }

    let mut out: Vec<SalaryAnalysis> = payees
        .into_iter()
        .map(|(recipient, p)| {
            let span = month_span(&p.first_month, &p.last_month);
            SalaryAnalysis {
                recipient,
                description: p.description,
                total_paid: round_cents(p.total),
                monthly_average: round_cents(p.total / Decimal::from(span)),
                payment_count: p.count,
                first_month: p.first_month,
                last_month: p.last_month,
            }
        })
        .collect();
    out.sort_by(|a, b| b.total_paid.cmp(&a.total_paid));
    Ok(out)
}

/// Credits grouped by income-source label, largest first.
pub fn income_sourcing(txs: &[Transaction], classifier: &Classifier) -> Vec<SourceBreakdown> {
    let mut tally = Tally::default();
    for tx in included(txs) {
        if let Some(label) = classifier.income_source(tx) {
            tally.add(&label, tx.amount);
        }
    }
    into_sources(tally)
}

/// Credits no income rule claims, grouped by counterparty.
pub fn other_income(txs: &[Transaction], classifier: &Classifier) -> Vec<SourceBreakdown> {
    let mut tally = Tally::default();
    for tx in included(txs).filter(|tx| classifier.is_other_income(tx)) {
        tally.add(tx.counterparty(), tx.amount);
    }
    into_sources(tally)
}

/// Whole-ledger totals.
pub fn overview(txs: &[Transaction]) -> Result<LedgerOverview> {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    let mut first: Option<String> = None;
    let mut last: Option<String> = None;
    let mut currencies: Vec<String> = Vec::new();
    let mut excluded = 0;

    for tx in txs {
        if is_excluded(tx) {
            excluded += 1;
            continue;
        }
        if is_credit(tx) {
            income += magnitude(tx);
        } else {
            expenses += magnitude(tx);
        }
        let month = month_key(tx)?;
        if first.as_ref().is_none_or(|f| month < *f) {
            first = Some(month.clone());
        }
        if last.as_ref().is_none_or(|l| month > *l) {
            last = Some(month);
        }
        if !tx.currency.is_empty() && !currencies.contains(&tx.currency) {
            currencies.push(tx.currency.clone());
        }
    }

    let total_income = round_cents(income);
    let total_expenses = round_cents(expenses);
    Ok(LedgerOverview {
        transaction_count: txs.len(),
        excluded_count: excluded,
        total_income,
        total_expenses,
        net: total_income - total_expenses,
        first_month: first,
        last_month: last,
        currencies,
    })
}
