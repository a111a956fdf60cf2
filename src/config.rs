// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Classification rule tables.
//!
//! The heuristics that map free-text export fields onto categories, income
//! sources and salary-like expenses live in TOML so that a change in the
//! exporting platform's wording is a config edit. Resolution order:
//!
//! 1. An explicit path (`--rules`)
//! 2. `rules.toml` in the platform config dir, if present
//! 3. The defaults embedded in the binary
//!
//! A [`Preset`] then drops rules that belong to another variant.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Embedded default rules (compiled into binary)
pub const DEFAULT_RULES: &str = include_str!("../config/rules.toml");

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Fundscope", "fundscope"));

/// Override location in the platform config dir.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP.0, APP.1, APP.2).map(|p| p.config_dir().join("rules.toml"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Untagged rules plus those tagged `full` (the host-fee category).
    #[default]
    Full,
    /// Untagged rules plus those tagged `abridged`.
    Abridged,
}

impl Preset {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Preset::Full),
            "abridged" => Ok(Preset::Abridged),
            other => Err(Error::Config(format!(
                "Unknown preset '{}' (use full|abridged)",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Full => "full",
            Preset::Abridged => "abridged",
        }
    }

    /// Untagged rules apply to every preset; tagged ones only to their own.
    fn admits(&self, tag: Option<&str>) -> Result<bool> {
        match tag {
            None => Ok(true),
            Some(t) => Ok(Preset::parse(t)? == *self),
        }
    }
}

/// Which text a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Accounting category, else kind, else the fallback. Case-sensitive.
    Category,
    /// Lower-cased description.
    Description,
}

#[derive(Debug, Clone)]
pub enum Matcher {
    StartsWith(String),
    Equals(String),
    Contains(String),
    Pattern(Regex),
}

impl Matcher {
    pub fn is_match(&self, hay: &str) -> bool {
        match self {
            Matcher::StartsWith(p) => hay.starts_with(p.as_str()),
            Matcher::Equals(p) => hay == p,
            Matcher::Contains(p) => hay.contains(p.as_str()),
            Matcher::Pattern(re) => re.is_match(hay),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub field: Field,
    pub matcher: Matcher,
}

#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub label: String,
    /// Any-of: the rule fires when one condition holds.
    pub when: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeTarget {
    Label(String),
    /// Split by the recurring-contribution heuristic.
    ByCadence { recurring: String, one_time: String },
}

#[derive(Debug, Clone)]
pub struct IncomeRule {
    pub kind: String,
    /// Lower-cased needle matched against the lower-cased counterparty.
    pub counterparty_contains: Option<String>,
    pub target: IncomeTarget,
}

/// Validated rule tables consumed by [`crate::analysis::Classifier`].
#[derive(Debug, Clone)]
pub struct RulesConfig {
    pub recurring_phrases: Vec<String>,
    pub salary_keywords: Vec<String>,
    pub salary_category_keywords: Vec<String>,
    pub fallback_category: String,
    pub other_income_label: String,
    pub category_rules: Vec<CategoryRule>,
    pub income_rules: Vec<IncomeRule>,
}

/// Where a loaded config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Embedded => write!(f, "(embedded defaults)"),
            ConfigSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

impl RulesConfig {
    /// The embedded defaults for a preset.
    pub fn builtin(preset: Preset) -> Result<Self> {
        parse_rules(DEFAULT_RULES, preset)
    }

    pub fn from_toml(content: &str, preset: Preset) -> Result<Self> {
        parse_rules(content, preset)
    }

    /// Resolve and load rules (explicit path, then config dir, then embedded).
    pub fn load(explicit: Option<&Path>, preset: Preset) -> Result<(Self, ConfigSource)> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::Config(format!(
                        "Rules file {} does not exist",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        match path {
            Some(p) => {
                let content = fs::read_to_string(&p).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", p.display(), e))
                })?;
                let cfg = parse_rules(&content, preset)?;
                info!(path = %p.display(), preset = preset.as_str(), "Loaded rules file");
                Ok((cfg, ConfigSource::File(p)))
            }
            None => {
                debug!(preset = preset.as_str(), "Using embedded rules");
                Ok((Self::builtin(preset)?, ConfigSource::Embedded))
            }
        }
    }
}

/// Write the embedded defaults to `path`, refusing to clobber unless `force`.
pub fn write_default(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_RULES)?;
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRules {
    recurring_phrases: Option<Vec<String>>,
    salary_keywords: Option<Vec<String>>,
    salary_category_keywords: Option<Vec<String>>,
    fallback_category: Option<String>,
    other_income_label: Option<String>,
    #[serde(default)]
    category_rules: Vec<RawCategoryRule>,
    #[serde(default)]
    income_rules: Vec<RawIncomeRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCategoryRule {
    label: String,
    preset: Option<String>,
    when: Vec<RawCondition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCondition {
    field: String,
    starts_with: Option<String>,
    equals: Option<String>,
    contains: Option<String>,
    regex: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIncomeRule {
    kind: String,
    preset: Option<String>,
    counterparty_contains: Option<String>,
    label: Option<String>,
    recurring_label: Option<String>,
    one_time_label: Option<String>,
}

fn lower_all(v: Vec<String>) -> Vec<String> {
    v.into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_rules(content: &str, preset: Preset) -> Result<RulesConfig> {
    let raw: RawRules = toml::from_str(content)?;

    let mut category_rules = Vec::new();
    for rule in raw.category_rules {
        if !preset.admits(rule.preset.as_deref())? {
            debug!(label = %rule.label, "Skipping category rule outside preset");
            continue;
        }
        if rule.when.is_empty() {
            return Err(Error::Config(format!(
                "Category rule '{}' has no conditions",
                rule.label
            )));
        }
        let when = rule
            .when
            .into_iter()
            .map(|c| compile_condition(&rule.label, c))
            .collect::<Result<Vec<_>>>()?;
        category_rules.push(CategoryRule {
            label: rule.label,
            when,
        });
    }

    let mut income_rules = Vec::new();
    for rule in raw.income_rules {
        if !preset.admits(rule.preset.as_deref())? {
            continue;
        }
        let target = match (rule.label, rule.recurring_label, rule.one_time_label) {
            (Some(label), None, None) => IncomeTarget::Label(label),
            (None, Some(recurring), Some(one_time)) => {
                IncomeTarget::ByCadence { recurring, one_time }
            }
            _ => {
                return Err(Error::Config(format!(
                    "Income rule for kind '{}' needs either `label` or both \
                     `recurring_label` and `one_time_label`",
                    rule.kind
                )));
            }
        };
        income_rules.push(IncomeRule {
            kind: rule.kind.trim().to_string(),
            counterparty_contains: rule
                .counterparty_contains
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
            target,
        });
    }

    Ok(RulesConfig {
        recurring_phrases: lower_all(raw.recurring_phrases.unwrap_or_default()),
        salary_keywords: lower_all(raw.salary_keywords.unwrap_or_default()),
        salary_category_keywords: lower_all(raw.salary_category_keywords.unwrap_or_default()),
        fallback_category: raw
            .fallback_category
            .unwrap_or_else(|| "Uncategorized".to_string()),
        other_income_label: raw
            .other_income_label
            .unwrap_or_else(|| "Other".to_string()),
        category_rules,
        income_rules,
    })
}

fn compile_condition(label: &str, raw: RawCondition) -> Result<Condition> {
    let field = match raw.field.trim().to_ascii_lowercase().as_str() {
        "category" => Field::Category,
        "description" => Field::Description,
        other => {
            return Err(Error::Config(format!(
                "Rule '{}': unknown field '{}' (use category|description)",
                label, other
            )));
        }
    };
    // Description is matched lower-cased, so literal needles are too.
    let norm = |s: String| match field {
        Field::Description => s.to_lowercase(),
        Field::Category => s,
    };
    let matcher = match (raw.starts_with, raw.equals, raw.contains, raw.regex) {
        (Some(p), None, None, None) => Matcher::StartsWith(norm(p)),
        (None, Some(p), None, None) => Matcher::Equals(norm(p)),
        (None, None, Some(p), None) => Matcher::Contains(norm(p)),
        (None, None, None, Some(p)) => {
            let re = Regex::new(&p).map_err(|source| Error::Regex {
                pattern: p.clone(),
                source,
            })?;
            Matcher::Pattern(re)
        }
        _ => {
            return Err(Error::Config(format!(
                "Rule '{}': each condition needs exactly one of \
                 starts_with, equals, contains, regex",
                label
            )));
        }
    };
    Ok(Condition { field, matcher })
}
