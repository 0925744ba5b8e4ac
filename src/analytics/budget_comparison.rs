//! Compares the budgets of a month against what was actually spent.

use serde::Serialize;

use crate::{
    analytics::{
        AnalyticsPolicy, Period,
        aggregation::{category_spend, in_period, sum_by_category},
    },
    budget::Budget,
    transaction::Transaction,
};

/// One row of the budget vs. actual comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    pub category_id: String,
    pub name: &'static str,
    pub color: &'static str,
    /// The budgeted amount, zero for categories without a budget.
    pub budget: f64,
    pub actual: f64,
    /// `budget - actual`, negative when over budget.
    pub difference: f64,
    pub percent_used: f64,
    /// Whether the category has a budget for the period.
    pub budgeted: bool,
}

impl BudgetComparison {
    /// Whether more was spent than budgeted.
    pub fn is_over_budget(&self) -> bool {
        self.actual > self.budget
    }
}

/// Join each budget of `period` with the spending in its category for that
/// period.
///
/// Budgeted categories come first, in the order of `budgets`. Categories with
/// spending but no budget follow in the order they were first encountered,
/// with a budget of zero and [AnalyticsPolicy::unbudgeted_percent_used].
/// The result is empty when nothing was budgeted or spent in the period.
pub fn budget_vs_actual(
    transactions: &[Transaction],
    budgets: &[Budget],
    period: Period,
    policy: &AnalyticsPolicy,
) -> Vec<BudgetComparison> {
    let period_budgets: Vec<&Budget> = budgets
        .iter()
        .filter(|budget| budget.period() == period)
        .collect();

    let mut comparisons: Vec<BudgetComparison> = period_budgets
        .iter()
        .map(|budget| {
            let actual = category_spend(in_period(transactions, period), &budget.category_id);
            let category = budget.category();

            BudgetComparison {
                category_id: budget.category_id.clone(),
                name: category.name,
                color: category.color,
                budget: budget.amount,
                actual,
                difference: budget.amount - actual,
                percent_used: percent_used(actual, budget.amount, policy),
                budgeted: true,
            }
        })
        .collect();

    let unbudgeted = sum_by_category(in_period(transactions, period))
        .into_iter()
        .filter(|total| total.amount > 0.0)
        .filter(|total| {
            !period_budgets
                .iter()
                .any(|budget| budget.category_id == total.category_id)
        })
        .map(|total| BudgetComparison {
            category_id: total.category_id,
            name: total.name,
            color: total.color,
            budget: 0.0,
            actual: total.amount,
            difference: -total.amount,
            percent_used: policy.unbudgeted_percent_used,
            budgeted: false,
        });

    comparisons.extend(unbudgeted);
    comparisons
}

/// `actual` as a percentage of `budget`.
///
/// A zero budget has no meaningful percentage, so the policy's
/// [AnalyticsPolicy::zero_budget_percent_used] is returned instead.
pub fn percent_used(actual: f64, budget: f64, policy: &AnalyticsPolicy) -> f64 {
    if budget == 0.0 {
        return policy.zero_budget_percent_used;
    }

    actual / budget * 100.0
}
