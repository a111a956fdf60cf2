// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fundscope::analysis::{
    Classifier, largest_contributions, largest_one_time_contributions, top_expenses, top_n,
    top_sources,
};
use fundscope::config::Preset;
use fundscope::models::{Direction, Transaction, kind};
use rust_decimal::Decimal;

fn contribution(id: usize, amount: i64, recurring: bool) -> Transaction {
    let desc = if recurring {
        "Monthly contribution from backer"
    } else {
        "Contribution from backer"
    };
    Transaction::new(
        id.to_string(),
        "2024-04-10 12:00:00",
        Direction::Credit,
        kind::CONTRIBUTION,
        Decimal::from(amount),
        desc,
    )
    .with_counterparty(format!("Backer {id}"))
}

/// Seven recurring gifts that all outrank three one-time gifts.
fn mixed() -> Vec<Transaction> {
    let mut txs = Vec::new();
    for i in 0..7 {
        txs.push(contribution(i, 1000 + i as i64 * 10, true));
    }
    txs.push(contribution(7, 300, false));
    txs.push(contribution(8, 500, false));
    txs.push(contribution(9, 400, false));
    txs
}

fn classifier() -> Classifier {
    Classifier::builtin(Preset::Full).unwrap()
}

#[test]
fn largest_sorted_and_limited() {
    let mut txs = mixed();
    txs.push(Transaction::new(
        "debit",
        "2024-04-11 12:00:00",
        Direction::Debit,
        kind::EXPENSE,
        Decimal::from(-5000),
        "big bill",
    ));
    let top = largest_contributions(&txs, &classifier(), 3).unwrap();
    let amounts: Vec<_> = top.iter().map(|c| c.amount).collect();
    assert_eq!(
        amounts,
        [Decimal::from(1060), Decimal::from(1050), Decimal::from(1040)]
    );
    assert!(top.iter().all(|c| c.is_recurring));
    assert_eq!(top[0].source, "Backer 6");
    assert_eq!(top[0].date, NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
}

#[test]
fn one_time_filters_before_limiting() {
    let got = largest_one_time_contributions(&mixed(), &classifier(), 5, None).unwrap();
    let amounts: Vec<_> = got.iter().map(|c| c.amount).collect();
    assert_eq!(
        amounts,
        [Decimal::from(500), Decimal::from(400), Decimal::from(300)]
    );
    assert!(got.iter().all(|c| !c.is_recurring));
}

#[test]
fn one_time_scan_cap_reproduces_two_step_selection() {
    let c = classifier();
    let capped = largest_one_time_contributions(&mixed(), &c, 5, Some(7)).unwrap();
    assert!(capped.is_empty());
    let capped = largest_one_time_contributions(&mixed(), &c, 5, Some(8)).unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].amount, Decimal::from(500));
}

#[test]
fn excluded_credits_never_rank() {
    let mut txs = mixed();
    let mut refunded = contribution(10, 99999, false);
    refunded.is_reversed = true;
    txs.push(refunded);
    let top = largest_contributions(&txs, &classifier(), 1).unwrap();
    assert_eq!(top[0].amount, Decimal::from(1060));
}

#[test]
fn top_helpers_take_prefix() {
    assert_eq!(top_n(&[5, 4, 3], 2), vec![5, 4]);
    assert_eq!(top_n(&[5], 3), vec![5]);

    let sources = top_sources(&mixed(), 2);
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].source, "Backer 6");
    assert!(top_expenses(&mixed(), 5).is_empty());
}
