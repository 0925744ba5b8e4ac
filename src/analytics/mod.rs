//! Aggregation of transactions and budgets into the numbers shown on the
//! dashboard and returned by the analytics API.
//!
//! Nothing in this module touches the database. Callers pass in a snapshot of
//! the records and get back derived values.

pub mod aggregation;
mod budget_comparison;
mod period;
mod policy;
mod report;

pub use aggregation::{
    CategoryTotal, category_share, category_spend, in_period, month_over_month_change,
    sum_by_category, total_spent,
};
pub use budget_comparison::{BudgetComparison, budget_vs_actual, percent_used};
pub use period::{Period, PeriodQuery, month_abbreviation};
pub use policy::AnalyticsPolicy;
pub use report::{AnalyticsReport, build_report};
