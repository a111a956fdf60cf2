// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;

use fundscope::Error;
use fundscope::analysis::Classifier;
use fundscope::config::{
    ConfigSource, DEFAULT_RULES, IncomeTarget, Preset, RulesConfig, write_default,
};
use fundscope::models::{Direction, Transaction, kind};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn expense(desc: &str, category: Option<&str>) -> Transaction {
    let t = Transaction::new(
        "e1",
        "2024-01-15T12:00:00Z",
        Direction::Debit,
        kind::EXPENSE,
        Decimal::from(-10),
        desc,
    );
    match category {
        Some(c) => t.with_category(c),
        None => t,
    }
}

#[test]
fn embedded_rules_parse_for_both_presets() {
    let full = RulesConfig::builtin(Preset::Full).unwrap();
    let labels: Vec<_> = full.category_rules.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        ["Paid Maintainers", "Community Incentives", "Miscellaneous", "OC Fees"]
    );
    assert_eq!(full.recurring_phrases, ["monthly contribution"]);
    assert_eq!(full.fallback_category, "Uncategorized");
    assert_eq!(full.other_income_label, "Other");
    assert_eq!(full.income_rules.len(), 2);
    assert_eq!(
        full.income_rules[0].counterparty_contains.as_deref(),
        Some("github")
    );
    assert_eq!(
        full.income_rules[1].target,
        IncomeTarget::ByCadence {
            recurring: "Open Collective (Recurring)".into(),
            one_time: "Open Collective (One-time)".into(),
        }
    );

    let abridged = RulesConfig::builtin(Preset::Abridged).unwrap();
    assert_eq!(abridged.category_rules.len(), 3);
}

#[test]
fn preset_names() {
    assert_eq!(Preset::parse("FULL").unwrap(), Preset::Full);
    assert_eq!(Preset::parse(" abridged ").unwrap(), Preset::Abridged);
    assert!(matches!(Preset::parse("legacy"), Err(Error::Config(_))));
    assert_eq!(Preset::default(), Preset::Full);
}

#[test]
fn custom_rules_with_regex_and_keyword_normalization() {
    let toml = r#"
recurring_phrases = ["Yearly Contribution"]
salary_keywords = ["Bounty"]

[[category_rules]]
label = "Infrastructure"
when = [{ field = "description", regex = "(?i)^(aws|gcp)\\b" }]

[[category_rules]]
label = "Swag"
when = [{ field = "description", contains = "STICKERS" }]
"#;
    let cfg = RulesConfig::from_toml(toml, Preset::Full).unwrap();
    assert_eq!(cfg.recurring_phrases, ["yearly contribution"]);
    assert_eq!(cfg.salary_keywords, ["bounty"]);
    assert_eq!(cfg.fallback_category, "Uncategorized");
    assert!(cfg.income_rules.is_empty());

    let c = Classifier::new(cfg);
    assert_eq!(c.expense_category(&expense("AWS invoice", None)), "Infrastructure");
    assert_eq!(c.expense_category(&expense("Stickers order", None)), "Swag");
    assert_eq!(c.expense_category(&expense("Coffee", None)), "EXPENSE");
    assert!(c.is_salary_like(&expense("Bug bounty", None)));

    let gift = Transaction::new(
        "c1",
        "2024-01-15T12:00:00Z",
        Direction::Credit,
        kind::CONTRIBUTION,
        Decimal::from(5),
        "Yearly contribution to project",
    );
    assert!(c.is_recurring(&gift));
    // No income rules: every credit is "Other".
    assert_eq!(c.income_source(&gift).as_deref(), Some("Other"));
}

#[test]
fn invalid_regex_names_pattern() {
    let toml = r#"
[[category_rules]]
label = "Broken"
when = [{ field = "category", regex = "(unclosed" }]
"#;
    match RulesConfig::from_toml(toml, Preset::Full).unwrap_err() {
        Error::Regex { pattern, .. } => assert_eq!(pattern, "(unclosed"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn condition_needs_exactly_one_matcher() {
    let two = r#"
[[category_rules]]
label = "Both"
when = [{ field = "category", equals = "A", contains = "B" }]
"#;
    assert!(matches!(
        RulesConfig::from_toml(two, Preset::Full),
        Err(Error::Config(_))
    ));

    let none = r#"
[[category_rules]]
label = "Neither"
when = [{ field = "category" }]
"#;
    assert!(matches!(
        RulesConfig::from_toml(none, Preset::Full),
        Err(Error::Config(_))
    ));
}

#[test]
fn structural_errors() {
    let bad_field = r#"
[[category_rules]]
label = "X"
when = [{ field = "amount", equals = "1" }]
"#;
    assert!(matches!(
        RulesConfig::from_toml(bad_field, Preset::Full),
        Err(Error::Config(_))
    ));

    let empty_when = r#"
[[category_rules]]
label = "X"
when = []
"#;
    assert!(matches!(
        RulesConfig::from_toml(empty_when, Preset::Full),
        Err(Error::Config(_))
    ));

    let half_cadence = r#"
[[income_rules]]
kind = "CONTRIBUTION"
recurring_label = "Recurring"
"#;
    assert!(matches!(
        RulesConfig::from_toml(half_cadence, Preset::Full),
        Err(Error::Config(_))
    ));

    assert!(matches!(
        RulesConfig::from_toml("unknown_key = 1", Preset::Full),
        Err(Error::Toml(_))
    ));
}

#[test]
fn preset_tagged_income_rule_is_skipped_when_abridged() {
    let toml = r#"
[[income_rules]]
kind = "ADDED_FUNDS"
preset = "full"
label = "Grants"
"#;
    assert_eq!(
        RulesConfig::from_toml(toml, Preset::Full)
            .unwrap()
            .income_rules
            .len(),
        1
    );
    assert!(
        RulesConfig::from_toml(toml, Preset::Abridged)
            .unwrap()
            .income_rules
            .is_empty()
    );
}

#[test]
fn rules_tagged_for_one_preset_apply_only_there() {
    let toml = r#"
[[category_rules]]
label = "Everywhere"
when = [{ field = "category", equals = "A" }]

[[category_rules]]
label = "Short Only"
preset = "abridged"
when = [{ field = "category", equals = "B" }]

[[category_rules]]
label = "Long Only"
preset = "Full"
when = [{ field = "category", equals = "C" }]
"#;
    let labels = |preset| {
        RulesConfig::from_toml(toml, preset)
            .unwrap()
            .category_rules
            .into_iter()
            .map(|r| r.label)
            .collect::<Vec<_>>()
    };
    assert_eq!(labels(Preset::Full), ["Everywhere", "Long Only"]);
    assert_eq!(labels(Preset::Abridged), ["Everywhere", "Short Only"]);
}

#[test]
fn unknown_preset_tag_is_rejected() {
    let toml = r#"
[[category_rules]]
label = "Typo"
preset = "ful"
when = [{ field = "category", equals = "A" }]
"#;
    for preset in [Preset::Full, Preset::Abridged] {
        match RulesConfig::from_toml(toml, preset).unwrap_err() {
            Error::Config(msg) => assert!(msg.contains("ful"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    let income = r#"
[[income_rules]]
kind = "ADDED_FUNDS"
preset = "legacy"
label = "Grants"
"#;
    assert!(matches!(
        RulesConfig::from_toml(income, Preset::Full),
        Err(Error::Config(_))
    ));
}

#[test]
fn write_default_refuses_to_clobber() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("rules.toml");

    write_default(&path, false).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_RULES);

    fs::write(&path, "# edited").unwrap();
    assert!(matches!(write_default(&path, false), Err(Error::Config(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), "# edited");

    write_default(&path, true).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_RULES);
}

#[test]
fn explicit_path_is_loaded_or_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, "fallback_category = \"Misc\"\n").unwrap();

    let (cfg, source) = RulesConfig::load(Some(&path), Preset::Full).unwrap();
    assert_eq!(cfg.fallback_category, "Misc");
    assert!(cfg.category_rules.is_empty());
    assert_eq!(source, ConfigSource::File(path.clone()));
    assert_eq!(source.to_string(), path.display().to_string());

    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        RulesConfig::load(Some(&missing), Preset::Full),
        Err(Error::Config(_))
    ));
}
