// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::Ledger;
use super::reports::{Report, ReportParams, build};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    let name = m.get_one::<String>("report").unwrap();
    let fmt = m.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = m.get_one::<String>("out").unwrap().trim();
    let params = ReportParams::from_matches(m);

    let report = build(name, ledger, &params)?;
    write_report(&report, &fmt, Path::new(out))?;
    info!(report = %name, format = %fmt, out = %out, "Exported report");
    println!("Exported {} to {}", name, out);
    Ok(())
}

/// Write a report as CSV (table headers + rows) or pretty JSON.
pub fn write_report(report: &Report, fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record(report.headers())?;
            for row in report.rows() {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(report)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
    Ok(())
}
