// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction-export CSV → typed [`Transaction`] records.
//!
//! Columns are located by exact header name, so the classic export and the
//! wider variants load alike; unknown columns are ignored. Amount-like
//! fields are coerced to `Decimal` (blank → 0) and nullable text is trimmed
//! with blanks normalized to `None`. Timestamps are kept verbatim and parsed
//! by the analysis.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Direction, Transaction};
use crate::utils::http_client;

pub mod headers {
    pub const EFFECTIVE_DATE: &str = "Effective Date & Time";
    pub const TRANSACTION_ID: &str = "Transaction ID";
    pub const DESCRIPTION: &str = "Description";
    pub const CREDIT_DEBIT: &str = "Credit/Debit";
    pub const KIND: &str = "Kind";
    pub const AMOUNT: &str = "Amount Single Column";
    pub const CURRENCY: &str = "Currency";
    pub const IS_REVERSE: &str = "Is Reverse";
    pub const IS_REVERSED: &str = "Is Reversed";
    pub const REVERSE_TRANSACTION_ID: &str = "Reverse Transaction ID";
    pub const OPPOSITE_ACCOUNT_NAME: &str = "Opposite Account Name";
    pub const OPPOSITE_ACCOUNT_HANDLE: &str = "Opposite Account Handle";
    pub const ACCOUNTING_CATEGORY: &str = "Accounting Category Name";
    pub const PAYMENT_PROCESSOR_FEE: &str = "Payment Processor Fee";
    pub const TAX_AMOUNT: &str = "Tax Amount";

    /// Columns a file must carry to be loadable.
    pub const REQUIRED: &[&str] = &[EFFECTIVE_DATE, TRANSACTION_ID, CREDIT_DEBIT, KIND, AMOUNT];
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Effective Date & Time")]
    effective_date: String,
    #[serde(rename = "Transaction ID")]
    id: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Credit/Debit")]
    direction: String,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Amount Single Column")]
    amount: String,
    #[serde(rename = "Currency", default)]
    currency: String,
    #[serde(rename = "Is Reverse", default)]
    is_reverse: String,
    #[serde(rename = "Is Reversed", default)]
    is_reversed: String,
    #[serde(rename = "Reverse Transaction ID", default)]
    reverse_transaction_id: String,
    #[serde(rename = "Opposite Account Name", default)]
    counterparty_name: String,
    #[serde(rename = "Opposite Account Handle", default)]
    counterparty_handle: String,
    #[serde(rename = "Accounting Category Name", default)]
    accounting_category: String,
    #[serde(rename = "Payment Processor Fee", default)]
    payment_processor_fee: String,
    #[serde(rename = "Tax Amount", default)]
    tax_amount: String,
}

fn nullable(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

fn number(row: usize, column: &str, raw: &str) -> Result<Decimal> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(Decimal::ZERO);
    }
    t.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(t))
        .map_err(|_| Error::InvalidData(format!("Row {}: invalid {} '{}'", row, column, raw)))
}

fn flag(row: usize, column: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        _ => Err(Error::InvalidData(format!(
            "Row {}: invalid {} '{}'",
            row, column, raw
        ))),
    }
}

impl RawRow {
    fn into_transaction(self, row: usize) -> Result<Transaction> {
        let direction = Direction::parse(&self.direction).ok_or_else(|| {
            Error::InvalidData(format!(
                "Row {}: invalid {} '{}' (expected CREDIT or DEBIT)",
                row,
                headers::CREDIT_DEBIT,
                self.direction
            ))
        })?;
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(Error::InvalidData(format!(
                "Row {}: {} missing",
                row,
                headers::TRANSACTION_ID
            )));
        }
        Ok(Transaction {
            effective_date: self.effective_date.trim().to_string(),
            id,
            description: self.description.trim().to_string(),
            direction,
            kind: self.kind.trim().to_string(),
            amount: number(row, headers::AMOUNT, &self.amount)?,
            currency: self.currency.trim().to_uppercase(),
            is_reverse: flag(row, headers::IS_REVERSE, &self.is_reverse)?,
            is_reversed: flag(row, headers::IS_REVERSED, &self.is_reversed)?,
            reverse_transaction_id: nullable(self.reverse_transaction_id),
            counterparty_name: nullable(self.counterparty_name),
            counterparty_handle: nullable(self.counterparty_handle),
            accounting_category: nullable(self.accounting_category),
            payment_processor_fee: number(
                row,
                headers::PAYMENT_PROCESSOR_FEE,
                &self.payment_processor_fee,
            )?,
            tax_amount: number(row, headers::TAX_AMOUNT, &self.tax_amount)?,
        })
    }
}

/// Load every row from a CSV reader.
pub fn load_reader<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let present = rdr.headers()?.clone();
    let missing: Vec<&str> = headers::REQUIRED
        .iter()
        .copied()
        .filter(|h| !present.iter().any(|p| p == *h))
        .collect();
    if !missing.is_empty() {
        return Err(Error::InvalidData(format!(
            "Export is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut out = Vec::new();
    for (i, result) in rdr.deserialize::<RawRow>().enumerate() {
        // Header is line 1.
        let row = i + 2;
        let raw = result?;
        out.push(raw.into_transaction(row)?);
    }
    debug!(rows = out.len(), "Parsed transaction export");
    Ok(out)
}

pub fn load_path(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    let txs = load_reader(file)?;
    info!(path = %path.display(), rows = txs.len(), "Loaded transactions");
    Ok(txs)
}

/// Download an export and save it to `out`. The body must load as an export
/// before anything is written.
pub fn fetch(url: &str, out: &Path) -> Result<Vec<Transaction>> {
    let body = http_client()?
        .get(url)
        .send()?
        .error_for_status()?
        .bytes()?;
    let txs = load_reader(&body[..])?;
    fs::write(out, &body)?;
    info!(url = %url, out = %out.display(), rows = txs.len(), "Fetched export");
    Ok(txs)
}
