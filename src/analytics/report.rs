//! The analytics report of one month, shared by the dashboard and `/api/analytics`.

use serde::Serialize;

use crate::{
    analytics::{
        AnalyticsPolicy, BudgetComparison, CategoryTotal, Period, aggregation, budget_vs_actual,
    },
    budget::Budget,
    insights::{SpendingInsights, derive_insights},
    transaction::Transaction,
};

/// How many categories the "top categories" table shows.
pub const TOP_CATEGORY_COUNT: usize = 3;
/// How many transactions the "recent transactions" table shows.
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// Every aggregate shown on the dashboard for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub period: Period,
    /// Lifetime total.
    pub total_spent: f64,
    pub current_month_spent: f64,
    pub average_monthly_spend: f64,
    pub month_over_month_change: f64,
    /// Years that have transactions, earliest first.
    pub available_years: Vec<i32>,
    /// Spending per month of the period's year, January first.
    pub monthly_totals: [f64; 12],
    /// Spending per category over the period's year.
    pub category_breakdown: Vec<CategoryTotal>,
    /// Lifetime top categories.
    pub top_categories: Vec<CategoryTotal>,
    pub recent_transactions: Vec<Transaction>,
    pub budget_vs_actual: Vec<BudgetComparison>,
    pub insights: SpendingInsights,
}

/// Compute every aggregate for `period` from a snapshot of the records.
pub fn build_report(
    transactions: &[Transaction],
    budgets: &[Budget],
    period: Period,
    policy: &AnalyticsPolicy,
) -> AnalyticsReport {
    let insights = derive_insights(transactions, budgets, period, policy);

    AnalyticsReport {
        period,
        total_spent: insights.total_spent,
        current_month_spent: insights.current_month_spent,
        average_monthly_spend: aggregation::average_monthly_spend(transactions),
        month_over_month_change: insights.month_over_month_change,
        available_years: aggregation::available_years(transactions),
        monthly_totals: aggregation::monthly_totals(transactions, period.year),
        category_breakdown: aggregation::category_breakdown(aggregation::in_year(
            transactions,
            period.year,
        )),
        top_categories: aggregation::top_categories(
            &aggregation::sum_by_category(transactions),
            TOP_CATEGORY_COUNT,
        ),
        recent_transactions: aggregation::recent_transactions(
            transactions,
            RECENT_TRANSACTION_COUNT,
        )
        .into_iter()
        .cloned()
        .collect(),
        budget_vs_actual: budget_vs_actual(transactions, budgets, period, policy),
        insights,
    }
}
