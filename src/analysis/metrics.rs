// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Metrics derived from aggregator output.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    MonthlyContributions, MonthlySummary, MonthsOfRunway, RunwayProjection, SalaryAnalysis,
    SalaryShare,
};
use crate::utils::{mean, round_cents, round_percent, trailing};

pub const DEFAULT_RUNWAY_WINDOW: usize = 6;
pub const SALARY_SHARE_WINDOW: usize = 6;

/// Project how long the balance lasts at the recent average burn.
///
/// The balance is the sum of net over all months; averages cover only the
/// trailing `window` months. A negative balance yields a non-positive month
/// count, not zero.
pub fn runway_projection(monthly: &[MonthlySummary], window: usize) -> Result<RunwayProjection> {
    let recent = trailing(monthly, window);
    if recent.is_empty() {
        return Err(Error::EmptyWindow);
    }

    let current_balance = round_cents(monthly.iter().map(|m| m.net).sum());
    let avg_income = mean(&recent.iter().map(|m| m.income).collect::<Vec<_>>());
    let avg_expenses = mean(&recent.iter().map(|m| m.expenses).collect::<Vec<_>>());
    let avg_net = mean(&recent.iter().map(|m| m.net).collect::<Vec<_>>());

    let months_of_runway = if avg_net >= Decimal::ZERO {
        MonthsOfRunway::Indefinite
    } else {
        let months = (current_balance / avg_net.abs()).floor();
        // Saturate toward the balance's sign when the count overflows.
        let saturated = if months.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        };
        MonthsOfRunway::Months(months.to_i64().unwrap_or(saturated))
    };
    let required = (avg_expenses - avg_income).max(Decimal::ZERO);

    debug!(
        window = recent.len(),
        balance = %current_balance,
        runway = %months_of_runway,
        "Projected runway"
    );

    Ok(RunwayProjection {
        current_balance,
        avg_expenses: round_cents(avg_expenses),
        avg_income: round_cents(avg_income),
        avg_net: round_cents(avg_net),
        months_of_runway,
        required_monthly_contribution: round_cents(required),
    })
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_percent(part / whole * Decimal::ONE_HUNDRED)
}

/// Recurring salary cost against recent income.
///
/// Only recipients paid more than once count as salaried.
pub fn salary_share(
    salaries: &[SalaryAnalysis],
    monthly: &[MonthlySummary],
    contributions: &[MonthlyContributions],
) -> SalaryShare {
    let monthly_salary_expenses = round_cents(
        salaries
            .iter()
            .filter(|s| s.payment_count > 1)
            .map(|s| s.monthly_average)
            .sum(),
    );
    let avg_monthly_income = round_cents(mean(
        &trailing(monthly, SALARY_SHARE_WINDOW)
            .iter()
            .map(|m| m.income)
            .collect::<Vec<_>>(),
    ));
    let avg_monthly_recurring_income = round_cents(mean(
        &trailing(contributions, SALARY_SHARE_WINDOW)
            .iter()
            .map(|m| m.recurring)
            .collect::<Vec<_>>(),
    ));

    SalaryShare {
        monthly_salary_expenses,
        avg_monthly_income,
        avg_monthly_recurring_income,
        percent_of_income: percent_of(monthly_salary_expenses, avg_monthly_income),
        percent_of_recurring_income: percent_of(
            monthly_salary_expenses,
            avg_monthly_recurring_income,
        ),
    }
}
