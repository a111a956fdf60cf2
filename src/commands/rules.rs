// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{
    ConfigSource, Field, IncomeTarget, Matcher, RulesConfig, default_config_path, write_default,
};
use crate::utils::pretty_table;

/// `load` resolves the effective rules. Only `show` calls it, so `path` and
/// `init` keep working when the override file is broken.
pub fn handle<F>(m: &clap::ArgMatches, load: F) -> Result<()>
where
    F: FnOnce() -> crate::Result<(RulesConfig, ConfigSource)>,
{
    match m.subcommand() {
        Some(("show", _)) => {
            let (rules, source) = load()?;
            show(&rules, &source);
        }
        Some(("path", _)) => {
            let p = default_config_path().context("Could not determine platform config dir")?;
            println!("{}", p.display());
        }
        Some(("init", sub)) => {
            let p = match sub.get_one::<String>("out") {
                Some(out) => PathBuf::from(out.trim()),
                None => default_config_path().context("Could not determine platform config dir")?,
            };
            write_default(&p, sub.get_flag("force"))?;
            println!("Wrote default rules to {}", p.display());
        }
        _ => {}
    }
    Ok(())
}

fn describe(field: Field, matcher: &Matcher) -> String {
    let f = match field {
        Field::Category => "category",
        Field::Description => "description",
    };
    match matcher {
        Matcher::StartsWith(p) => format!("{} starts with '{}'", f, p),
        Matcher::Equals(p) => format!("{} = '{}'", f, p),
        Matcher::Contains(p) => format!("{} contains '{}'", f, p),
        Matcher::Pattern(re) => format!("{} =~ /{}/", f, re.as_str()),
    }
}

fn show(rules: &RulesConfig, source: &ConfigSource) {
    println!("Rules from {}", source);

    let rows = rules
        .category_rules
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let when = r
                .when
                .iter()
                .map(|c| describe(c.field, &c.matcher))
                .collect::<Vec<_>>()
                .join("\nOR ");
            vec![(i + 1).to_string(), r.label.clone(), when]
        })
        .collect();
    println!("{}", pretty_table(&["#", "Category", "When"], rows));

    let rows = rules
        .income_rules
        .iter()
        .map(|r| {
            let target = match &r.target {
                IncomeTarget::Label(l) => l.clone(),
                IncomeTarget::ByCadence {
                    recurring,
                    one_time,
                } => format!("{} / {}", recurring, one_time),
            };
            vec![
                r.kind.clone(),
                r.counterparty_contains.clone().unwrap_or_default(),
                target,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Kind", "Counterparty contains", "Source"], rows)
    );

    let rows = vec![
        vec![
            "Recurring phrases".to_string(),
            rules.recurring_phrases.join(", "),
        ],
        vec!["Salary keywords".to_string(), rules.salary_keywords.join(", ")],
        vec![
            "Salary category keywords".to_string(),
            rules.salary_category_keywords.join(", "),
        ],
        vec![
            "Fallback category".to_string(),
            rules.fallback_category.clone(),
        ],
        vec![
            "Other income label".to_string(),
            rules.other_income_label.clone(),
        ],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
}
