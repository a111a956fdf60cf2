// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::{Map, Value, json};
use tracing::warn;

use super::Ledger;
use super::reports::{Report, ReportParams, build};
use crate::utils::pretty_table;

/// Reports shown on the dashboard, in display order.
pub const SECTIONS: &[(&str, &str)] = &[
    ("overview", "Overview"),
    ("monthly", "Monthly Summary"),
    ("runway", "Runway"),
    ("income-sourcing", "Income by Source Type"),
    ("top-sources", "Top Income Sources"),
    ("contributors", "Contributors"),
    ("recurring-monthly", "Recurring vs One-time by Month"),
    ("categories", "Expenses by Category"),
    ("top-expenses", "Top Expense Recipients"),
    ("salaries", "Salaries & Stipends"),
    ("salary-share", "Salary Share of Income"),
    ("largest", "Largest Contributions"),
    ("largest-one-time", "Largest One-time Contributions"),
    ("other-income", "Other Income"),
];

/// Build every section. A section that fails is reported alongside the
/// others instead of aborting the run.
pub fn build_all(ledger: &Ledger, params: &ReportParams) -> Vec<(&'static str, Result<Report>)> {
    SECTIONS
        .iter()
        .map(|(name, _)| (*name, build(name, ledger, params)))
        .collect()
}

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    let params = ReportParams::from_matches(m);
    let sections = build_all(ledger, &params);

    if m.get_flag("json") {
        let mut doc = Map::new();
        for (name, res) in sections {
            let v = match res {
                Ok(r) => serde_json::to_value(&r)?,
                Err(e) => json!({ "error": e.to_string() }),
            };
            doc.insert(name.to_string(), v);
        }
        println!("{}", serde_json::to_string_pretty(&Value::Object(doc))?);
        return Ok(());
    }

    for ((name, res), (_, title)) in sections.into_iter().zip(SECTIONS) {
        println!("== {} ==", title);
        match res {
            Ok(r) => println!("{}", pretty_table(&r.headers(), r.rows())),
            Err(e) => {
                warn!(report = name, error = %e, "Report failed");
                println!("(unavailable: {})", e);
            }
        }
        println!();
    }
    Ok(())
}
