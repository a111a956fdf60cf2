// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use serde::Serialize;

use super::Ledger;
use crate::analysis::{self, DEFAULT_RUNWAY_WINDOW};
use crate::models::*;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

/// Knobs shared by `report`, `dashboard` and `export`.
#[derive(Debug, Clone, Copy)]
pub struct ReportParams {
    pub months: usize,
    pub limit: usize,
    pub one_time: bool,
    pub scan_cap: Option<usize>,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            months: DEFAULT_RUNWAY_WINDOW,
            limit: 10,
            one_time: false,
            scan_cap: None,
        }
    }
}

impl ReportParams {
    /// Read whichever knobs the (sub)command defines.
    pub fn from_matches(m: &clap::ArgMatches) -> Self {
        let d = Self::default();
        let usize_arg = |id: &str| m.try_get_one::<usize>(id).ok().flatten().copied();
        Self {
            months: usize_arg("months").unwrap_or(d.months),
            limit: usize_arg("limit").unwrap_or(d.limit),
            one_time: m.try_get_one::<bool>("one_time").ok().flatten().copied().unwrap_or(false),
            scan_cap: usize_arg("scan_cap"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Overview(LedgerOverview),
    Monthly(Vec<MonthlySummary>),
    Sources(Vec<SourceBreakdown>),
    Expenses(Vec<ExpenseBreakdown>),
    Categories(Vec<CategoryBreakdown>),
    Contributors(ContributorAnalysis),
    RecurringMonthly(Vec<MonthlyContributions>),
    Salaries(Vec<SalaryAnalysis>),
    SalaryShare(SalaryShare),
    Runway(RunwayProjection),
    Largest(Vec<LargestContribution>),
}

/// Compute one report by name.
pub fn build(name: &str, ledger: &Ledger, p: &ReportParams) -> Result<Report> {
    let txs = &ledger.transactions;
    let cls = &ledger.classifier;
    let report = match name {
        "overview" => Report::Overview(analysis::overview(txs)?),
        "monthly" => Report::Monthly(analysis::monthly_summary(txs)?),
        "sources" => Report::Sources(analysis::income_by_source(txs)),
        "expenses" => Report::Expenses(analysis::expenses_by_recipient(txs)),
        "categories" => Report::Categories(analysis::expenses_by_category(txs, cls)),
        "contributors" => Report::Contributors(analysis::contributor_analysis(txs, cls)),
        "recurring-monthly" => {
            Report::RecurringMonthly(analysis::monthly_contributions(txs, cls)?)
        }
        "salaries" => Report::Salaries(analysis::salary_analysis(txs, cls)?),
        "salary-share" => {
            let salaries = analysis::salary_analysis(txs, cls)?;
            let monthly = analysis::monthly_summary(txs)?;
            let contributions = analysis::monthly_contributions(txs, cls)?;
            Report::SalaryShare(analysis::salary_share(&salaries, &monthly, &contributions))
        }
        "runway" => {
            let monthly = analysis::monthly_summary(txs)?;
            Report::Runway(analysis::runway_projection(&monthly, p.months)?)
        }
        "largest" => {
            let rows = if p.one_time {
                analysis::largest_one_time_contributions(txs, cls, p.limit, p.scan_cap)?
            } else {
                analysis::largest_contributions(txs, cls, p.limit)?
            };
            Report::Largest(rows)
        }
        "largest-one-time" => Report::Largest(analysis::largest_one_time_contributions(
            txs, cls, p.limit, p.scan_cap,
        )?),
        "top-sources" => Report::Sources(analysis::top_sources(txs, p.limit)),
        "top-expenses" => Report::Expenses(analysis::top_expenses(txs, p.limit)),
        "income-sourcing" => Report::Sources(analysis::income_sourcing(txs, cls)),
        "other-income" => Report::Sources(analysis::other_income(txs, cls)),
        other => return Err(anyhow!("Unknown report '{}'", other)),
    };
    Ok(report)
}

fn kv(rows: &[(&str, String)]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|(k, v)| vec![k.to_string(), v.clone()])
        .collect()
}

impl Report {
    pub fn headers(&self) -> Vec<&'static str> {
        match self {
            Report::Overview(_) | Report::SalaryShare(_) | Report::Runway(_) => {
                vec!["Metric", "Value"]
            }
            Report::Monthly(_) => vec!["Month", "Income", "Expenses", "Net"],
            Report::Sources(_) => vec!["Source", "Amount", "Count"],
            Report::Expenses(_) => vec!["Recipient", "Amount", "Count"],
            Report::Categories(_) => vec!["Category", "Amount", "Count"],
            Report::Contributors(_) => vec!["Cadence", "Contributor", "Amount", "Count"],
            Report::RecurringMonthly(_) => vec!["Month", "Recurring", "One-time"],
            Report::Salaries(_) => vec![
                "Recipient", "Total Paid", "Monthly Avg", "Payments", "First", "Last",
            ],
            Report::Largest(_) => vec!["Date", "Source", "Amount", "Recurring", "Description"],
        }
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        match self {
            Report::Overview(o) => kv(&[
                ("Transactions", o.transaction_count.to_string()),
                ("Excluded (reversals)", o.excluded_count.to_string()),
                ("Total income", fmt_money(&o.total_income)),
                ("Total expenses", fmt_money(&o.total_expenses)),
                ("Net", fmt_money(&o.net)),
                ("First month", o.first_month.clone().unwrap_or_default()),
                ("Last month", o.last_month.clone().unwrap_or_default()),
                ("Currencies", o.currencies.join(", ")),
            ]),
            Report::Monthly(v) => v
                .iter()
                .map(|m| {
                    vec![
                        m.month.clone(),
                        fmt_money(&m.income),
                        fmt_money(&m.expenses),
                        fmt_money(&m.net),
                    ]
                })
                .collect(),
            Report::Sources(v) => v
                .iter()
                .map(|s| vec![s.source.clone(), fmt_money(&s.amount), s.count.to_string()])
                .collect(),
            Report::Expenses(v) => v
                .iter()
                .map(|e| vec![e.recipient.clone(), fmt_money(&e.amount), e.count.to_string()])
                .collect(),
            Report::Categories(v) => v
                .iter()
                .map(|c| vec![c.category.clone(), fmt_money(&c.amount), c.count.to_string()])
                .collect(),
            Report::Contributors(a) => {
                let mut rows = Vec::new();
                for (cadence, side) in [("Recurring", &a.recurring), ("One-time", &a.one_time)] {
                    rows.push(vec![
                        cadence.to_string(),
                        "(total)".to_string(),
                        fmt_money(&side.total),
                        side.count.to_string(),
                    ]);
                    for c in &side.contributors {
                        rows.push(vec![
                            cadence.to_string(),
                            c.source.clone(),
                            fmt_money(&c.amount),
                            c.count.to_string(),
                        ]);
                    }
                }
                rows
            }
            Report::RecurringMonthly(v) => v
                .iter()
                .map(|m| vec![m.month.clone(), fmt_money(&m.recurring), fmt_money(&m.one_time)])
                .collect(),
            Report::Salaries(v) => v
                .iter()
                .map(|s| {
                    vec![
                        s.recipient.clone(),
                        fmt_money(&s.total_paid),
                        fmt_money(&s.monthly_average),
                        s.payment_count.to_string(),
                        s.first_month.clone(),
                        s.last_month.clone(),
                    ]
                })
                .collect(),
            Report::SalaryShare(s) => kv(&[
                ("Monthly salary expenses", fmt_money(&s.monthly_salary_expenses)),
                ("Avg monthly income", fmt_money(&s.avg_monthly_income)),
                (
                    "Avg monthly recurring income",
                    fmt_money(&s.avg_monthly_recurring_income),
                ),
                ("% of income", format!("{:.1}", s.percent_of_income)),
                (
                    "% of recurring income",
                    format!("{:.1}", s.percent_of_recurring_income),
                ),
            ]),
            Report::Runway(r) => kv(&[
                ("Current balance", fmt_money(&r.current_balance)),
                ("Avg income", fmt_money(&r.avg_income)),
                ("Avg expenses", fmt_money(&r.avg_expenses)),
                ("Avg net", fmt_money(&r.avg_net)),
                ("Months of runway", r.months_of_runway.to_string()),
                (
                    "Required monthly contribution",
                    fmt_money(&r.required_monthly_contribution),
                ),
            ]),
            Report::Largest(v) => v
                .iter()
                .map(|c| {
                    vec![
                        c.date.to_string(),
                        c.source.clone(),
                        fmt_money(&c.amount),
                        if c.is_recurring { "yes" } else { "no" }.to_string(),
                        c.description.clone(),
                    ]
                })
                .collect(),
        }
    }

    pub fn print(&self, json_flag: bool, jsonl_flag: bool) -> Result<()> {
        if !maybe_print_json(json_flag, jsonl_flag, self)? {
            println!("{}", pretty_table(&self.headers(), self.rows()));
        }
        Ok(())
    }
}

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    if let Some((name, sub)) = m.subcommand() {
        let json_flag = sub.get_flag("json");
        let jsonl_flag = sub.get_flag("jsonl");
        let params = ReportParams::from_matches(sub);
        build(name, ledger, &params)?.print(json_flag, jsonl_flag)?;
    }
    Ok(())
}
