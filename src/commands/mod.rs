// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod fetch;
pub mod reports;
pub mod rules;

use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::Classifier;
use crate::loader;
use crate::models::Transaction;

/// A loaded export plus the classifier the reports run with.
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    pub classifier: Classifier,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>, classifier: Classifier) -> Self {
        Self {
            transactions,
            classifier,
        }
    }

    pub fn open(path: &Path, classifier: Classifier) -> Result<Self> {
        let transactions = loader::load_path(path)
            .with_context(|| format!("Load transactions from {}", path.display()))?;
        Ok(Self::new(transactions, classifier))
    }
}
