// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Maps transactions onto semantic labels using [`RulesConfig`] tables.
//!
//! Recurring and salary detection are keyword heuristics over the
//! exporter's free text, not structured fields.

use crate::config::{Field, IncomeTarget, Preset, RulesConfig};
use crate::error::Result;
use crate::models::{Transaction, kind};

use super::filter::{is_credit, is_debit, is_kind};

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RulesConfig,
}

impl Classifier {
    pub fn new(rules: RulesConfig) -> Self {
        Self { rules }
    }

    /// Classifier over the embedded rule tables.
    pub fn builtin(preset: Preset) -> Result<Self> {
        Ok(Self::new(RulesConfig::builtin(preset)?))
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// CREDIT + CONTRIBUTION whose description carries a recurring phrase.
    pub fn is_recurring(&self, tx: &Transaction) -> bool {
        if !is_credit(tx) || !is_kind(tx, kind::CONTRIBUTION) {
            return false;
        }
        let desc = tx.description.to_lowercase();
        self.rules
            .recurring_phrases
            .iter()
            .any(|p| desc.contains(p.as_str()))
    }

    /// Accounting category, else kind, else the configured fallback.
    pub fn category_subject<'a>(&'a self, tx: &'a Transaction) -> &'a str {
        tx.accounting_category
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(tx.kind.as_str()).filter(|s| !s.is_empty()))
            .unwrap_or(self.rules.fallback_category.as_str())
    }

    /// Expense category; the first matching rule wins, otherwise the subject
    /// passes through.
    pub fn expense_category(&self, tx: &Transaction) -> String {
        let subject = self.category_subject(tx);
        let desc = tx.description.to_lowercase();
        for rule in &self.rules.category_rules {
            let hit = rule.when.iter().any(|c| match c.field {
                Field::Category => c.matcher.is_match(subject),
                Field::Description => c.matcher.is_match(&desc),
            });
            if hit {
                return rule.label.clone();
            }
        }
        subject.to_string()
    }

    /// Income-source label for a credit; `None` for debits.
    pub fn income_source(&self, tx: &Transaction) -> Option<String> {
        if !is_credit(tx) {
            return None;
        }
        let counterparty = tx.counterparty().to_lowercase();
        for rule in &self.rules.income_rules {
            if tx.kind != rule.kind {
                continue;
            }
            if let Some(needle) = &rule.counterparty_contains {
                if !counterparty.contains(needle.as_str()) {
                    continue;
                }
            }
            let label = match &rule.target {
                IncomeTarget::Label(l) => l.clone(),
                IncomeTarget::ByCadence {
                    recurring,
                    one_time,
                } => {
                    if self.is_recurring(tx) {
                        recurring.clone()
                    } else {
                        one_time.clone()
                    }
                }
            };
            return Some(label);
        }
        Some(self.rules.other_income_label.clone())
    }

    pub fn is_other_income(&self, tx: &Transaction) -> bool {
        self.income_source(tx)
            .is_some_and(|l| l == self.rules.other_income_label)
    }

    /// DEBIT + EXPENSE matching a salary keyword or consultant-like category.
    pub fn is_salary_like(&self, tx: &Transaction) -> bool {
        if !is_debit(tx) || !is_kind(tx, kind::EXPENSE) {
            return false;
        }
        let desc = tx.description.to_lowercase();
        if self
            .rules
            .salary_keywords
            .iter()
            .any(|k| desc.contains(k.as_str()))
        {
            return true;
        }
        let cat = tx
            .accounting_category
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        self.rules
            .salary_category_keywords
            .iter()
            .any(|k| cat.contains(k.as_str()))
    }
}
