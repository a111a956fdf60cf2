// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure report functions over a slice of transactions.
//!
//! Nothing here performs I/O or keeps state between calls; reversed
//! transactions are dropped before any grouping.

pub mod aggregate;
pub mod classify;
pub mod filter;
pub mod metrics;
pub mod select;

pub use aggregate::{
    contributor_analysis, expenses_by_category, expenses_by_recipient, income_by_source,
    income_sourcing, month_span, monthly_contributions, monthly_summary, other_income, overview,
    salary_analysis,
};
pub use classify::Classifier;
pub use filter::{is_excluded, local_date, month_key, month_key_in};
pub use metrics::{DEFAULT_RUNWAY_WINDOW, runway_projection, salary_share};
pub use select::{
    LEGACY_ONE_TIME_SCAN_CAP, largest_contributions, largest_one_time_contributions, top_expenses,
    top_n, top_sources,
};
