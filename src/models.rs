// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction kinds the analysis cares about. The export carries others
/// (e.g. `PAYMENT_PROCESSOR_FEE`, `BALANCE_TRANSFER`); they pass through.
pub mod kind {
    pub const CONTRIBUTION: &str = "CONTRIBUTION";
    pub const EXPENSE: &str = "EXPENSE";
    pub const ADDED_FUNDS: &str = "ADDED_FUNDS";
    pub const HOST_FEE: &str = "HOST_FEE";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREDIT" => Some(Direction::Credit),
            "DEBIT" => Some(Direction::Debit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "CREDIT",
            Direction::Debit => "DEBIT",
        }
    }
}

/// One ledger entry as exported. Never mutated by the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Raw effective timestamp; parsed lazily so malformed values surface
    /// as errors at the report that needs them.
    pub effective_date: String,
    pub id: String,
    pub description: String,
    pub direction: Direction,
    pub kind: String,
    /// Signed; DEBIT rows may be stored negative.
    pub amount: Decimal,
    pub currency: String,
    pub is_reverse: bool,
    pub is_reversed: bool,
    pub reverse_transaction_id: Option<String>,
    pub counterparty_name: Option<String>,
    pub counterparty_handle: Option<String>,
    pub accounting_category: Option<String>,
    pub payment_processor_fee: Decimal,
    pub tax_amount: Decimal,
}

impl Transaction {
    /// A bare record with everything optional left empty.
    pub fn new(
        id: impl Into<String>,
        effective_date: impl Into<String>,
        direction: Direction,
        kind: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            effective_date: effective_date.into(),
            id: id.into(),
            description: description.into(),
            direction,
            kind: kind.into(),
            amount,
            currency: "USD".to_string(),
            is_reverse: false,
            is_reversed: false,
            reverse_transaction_id: None,
            counterparty_name: None,
            counterparty_handle: None,
            accounting_category: None,
            payment_processor_fee: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
        }
    }

    pub fn with_counterparty(mut self, name: impl Into<String>) -> Self {
        self.counterparty_name = Some(name.into());
        self
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.counterparty_handle = Some(handle.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.accounting_category = Some(category.into());
        self
    }

    /// Counterparty label: name, then handle, then "Unknown".
    pub fn counterparty(&self) -> &str {
        self.counterparty_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.counterparty_handle
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
            })
            .unwrap_or(UNKNOWN_COUNTERPARTY)
    }
}

pub const UNKNOWN_COUNTERPARTY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub source: String,
    pub amount: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub recipient: String,
    pub amount: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub amount: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionSide {
    pub total: Decimal,
    pub count: usize,
    pub contributors: Vec<SourceBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributorAnalysis {
    pub recurring: ContributionSide,
    pub one_time: ContributionSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyContributions {
    pub month: String,
    pub recurring: Decimal,
    pub one_time: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryAnalysis {
    pub recipient: String,
    /// First description seen for this recipient.
    pub description: String,
    pub total_paid: Decimal,
    pub monthly_average: Decimal,
    pub payment_count: usize,
    pub first_month: String,
    pub last_month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargestContribution {
    pub date: NaiveDate,
    pub source: String,
    pub amount: Decimal,
    pub description: String,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthsOfRunway {
    /// Average net is non-negative; the balance never runs out.
    Indefinite,
    Months(i64),
}

impl MonthsOfRunway {
    pub fn is_indefinite(&self) -> bool {
        matches!(self, MonthsOfRunway::Indefinite)
    }

    pub fn months(&self) -> Option<i64> {
        match self {
            MonthsOfRunway::Indefinite => None,
            MonthsOfRunway::Months(m) => Some(*m),
        }
    }
}

impl std::fmt::Display for MonthsOfRunway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonthsOfRunway::Indefinite => write!(f, "∞"),
            MonthsOfRunway::Months(m) => write!(f, "{}", m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayProjection {
    pub current_balance: Decimal,
    pub avg_expenses: Decimal,
    pub avg_income: Decimal,
    pub avg_net: Decimal,
    pub months_of_runway: MonthsOfRunway,
    pub required_monthly_contribution: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryShare {
    pub monthly_salary_expenses: Decimal,
    pub avg_monthly_income: Decimal,
    pub avg_monthly_recurring_income: Decimal,
    pub percent_of_income: Decimal,
    pub percent_of_recurring_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerOverview {
    pub transaction_count: usize,
    pub excluded_count: usize,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
    pub first_month: Option<String>,
    pub last_month: Option<String>,
    pub currencies: Vec<String>,
}
