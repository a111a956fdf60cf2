// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use fundscope::analysis::Classifier;
use fundscope::commands::{self, Ledger};
use fundscope::config::{Preset, RulesConfig};
use fundscope::cli;

fn init_logging(verbose: bool) {
    // RUST_LOG > --verbose > warn
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn open_ledger(matches: &clap::ArgMatches, classifier: Classifier) -> Result<Ledger> {
    let path = matches
        .get_one::<String>("path")
        .map(|s| PathBuf::from(s.trim()))
        .context("--path <CSV> is required for this command")?;
    Ledger::open(&path, classifier)
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    init_logging(matches.get_flag("verbose"));

    let preset = Preset::parse(matches.get_one::<String>("preset").unwrap())?;
    let rules_path = matches.get_one::<String>("rules").map(|s| s.trim());
    // Resolved on demand so `rules init` can replace a broken override.
    let load_rules = || RulesConfig::load(rules_path.map(Path::new), preset);
    let classifier = || -> Result<Classifier> { Ok(Classifier::new(load_rules()?.0)) };

    match matches.subcommand() {
        Some(("report", sub)) => {
            let ledger = open_ledger(&matches, classifier()?)?;
            commands::reports::handle(&ledger, sub)?
        }
        Some(("dashboard", sub)) => {
            let ledger = open_ledger(&matches, classifier()?)?;
            commands::dashboard::handle(&ledger, sub)?
        }
        Some(("export", sub)) => {
            let ledger = open_ledger(&matches, classifier()?)?;
            commands::exporter::handle(&ledger, sub)?
        }
        Some(("doctor", _)) => {
            let ledger = open_ledger(&matches, classifier()?)?;
            commands::doctor::handle(&ledger)?
        }
        Some(("fetch", sub)) => commands::fetch::handle(sub)?,
        Some(("rules", sub)) => commands::rules::handle(sub, load_rules)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
