// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command, value_parser};

/// Report names accepted by `report` and `export --report`.
pub const REPORTS: &[&str] = &[
    "overview",
    "monthly",
    "sources",
    "expenses",
    "categories",
    "contributors",
    "recurring-monthly",
    "salaries",
    "salary-share",
    "runway",
    "largest",
    "largest-one-time",
    "top-sources",
    "top-expenses",
    "income-sourcing",
    "other-income",
];

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn limit_arg(default: &'static str) -> Arg {
    Arg::new("limit")
        .long("limit")
        .value_parser(value_parser!(usize))
        .default_value(default)
        .help("Number of rows to keep")
}

fn months_arg() -> Arg {
    Arg::new("months")
        .long("months")
        .value_parser(value_parser!(usize))
        .default_value("6")
        .help("Trailing months to average over")
}

fn one_time_arg() -> Arg {
    Arg::new("one_time")
        .long("one-time")
        .action(ArgAction::SetTrue)
        .help("Only one-time contributions (with `largest`)")
}

fn scan_cap_arg() -> Arg {
    Arg::new("scan_cap")
        .long("scan-cap")
        .value_parser(value_parser!(usize))
        .help("Only scan this many top credits before filtering to one-time")
}

fn report_cmd() -> Command {
    let leaf =
        |name: &'static str, about: &'static str| json_flags(Command::new(name).about(about));
    Command::new("report")
        .about("Print a single report")
        .subcommand_required(true)
        .subcommand(leaf("overview", "Ledger totals and date range"))
        .subcommand(leaf("monthly", "Income, expenses and net per month"))
        .subcommand(leaf("sources", "Income grouped by counterparty"))
        .subcommand(leaf("expenses", "Expenses grouped by recipient"))
        .subcommand(leaf("categories", "Expenses grouped by category"))
        .subcommand(leaf("contributors", "Recurring vs one-time contributors"))
        .subcommand(leaf(
            "recurring-monthly",
            "Recurring and one-time contributions per month",
        ))
        .subcommand(leaf("salaries", "Salary-like payments per recipient"))
        .subcommand(leaf("salary-share", "Salaries as a share of recent income"))
        .subcommand(leaf("runway", "Months until the balance is exhausted").arg(months_arg()))
        .subcommand(
            leaf("largest", "Largest individual contributions")
                .arg(limit_arg("10"))
                .arg(one_time_arg())
                .arg(scan_cap_arg().requires("one_time")),
        )
        .subcommand(
            leaf("largest-one-time", "Largest one-time contributions")
                .arg(limit_arg("10"))
                .arg(scan_cap_arg()),
        )
        .subcommand(leaf("top-sources", "Largest income sources").arg(limit_arg("5")))
        .subcommand(leaf("top-expenses", "Largest expense recipients").arg(limit_arg("5")))
        .subcommand(leaf("income-sourcing", "Income by source type"))
        .subcommand(leaf("other-income", "Income no source rule claims"))
}

pub fn build_cli() -> Command {
    Command::new("fundscope")
        .about("Income, expense, contributor and runway reports from transaction exports")
        .version(clap::crate_version!())
        .arg(
            Arg::new("path")
                .long("path")
                .global(true)
                .help("Transaction export CSV"),
        )
        .arg(
            Arg::new("rules")
                .long("rules")
                .global(true)
                .help("Classification rules TOML (defaults to the config dir, then built-ins)"),
        )
        .arg(
            Arg::new("preset")
                .long("preset")
                .global(true)
                .value_parser(["full", "abridged"])
                .default_value("full")
                .help("Rule preset"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(report_cmd())
        .subcommand(
            Command::new("dashboard")
                .about("Print every report")
                .arg(months_arg())
                .arg(limit_arg("5"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print as one JSON document"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write a report to a file")
                .arg(
                    Arg::new("report")
                        .long("report")
                        .required(true)
                        .value_parser(PossibleValuesParser::new(REPORTS.iter().copied())),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true))
                .arg(months_arg())
                .arg(limit_arg("10"))
                .arg(one_time_arg())
                .arg(scan_cap_arg().requires("one_time")),
        )
        .subcommand(
            Command::new("fetch")
                .about("Download a transaction export")
                .arg(Arg::new("url").long("url").required(true))
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("rules")
                .about("Inspect or initialize classification rules")
                .subcommand(Command::new("show").about("Print the effective rule tables"))
                .subcommand(Command::new("path").about("Print the override location"))
                .subcommand(
                    Command::new("init")
                        .about("Write the built-in rules to the override location")
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .help("Write here instead of the config dir"),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check an export for data problems"))
}
