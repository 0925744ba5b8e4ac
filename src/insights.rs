//! Flags noteworthy spending patterns for the current month.

use serde::Serialize;

use crate::{
    analytics::{
        AnalyticsPolicy, CategoryTotal, Period, category_spend, in_period,
        month_over_month_change, sum_by_category, total_spent,
    },
    budget::Budget,
    category::DISCRETIONARY_CATEGORY_IDS,
    transaction::Transaction,
};

/// A category where more was spent than budgeted this month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverBudget {
    pub category_id: String,
    pub name: &'static str,
    pub color: &'static str,
    pub budget: f64,
    pub actual: f64,
    pub over_by: f64,
}

/// A category whose spending grew sharply compared to last month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusualSpending {
    pub category_id: String,
    pub name: &'static str,
    pub color: &'static str,
    /// The amount spent this month.
    pub amount: f64,
    pub previous_amount: f64,
    pub percent_increase: f64,
}

/// Everything the insights panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingInsights {
    pub total_spent: f64,
    pub current_month_spent: f64,
    pub previous_month_spent: f64,
    pub month_over_month_change: f64,
    /// Sorted by `over_by`, largest first.
    pub over_budget: Vec<OverBudget>,
    /// Sorted by `percent_increase`, largest first.
    pub unusual_spending: Vec<UnusualSpending>,
    /// Discretionary categories with spending this month, largest first.
    pub savings_opportunities: Vec<CategoryTotal>,
    pub largest_expense: Option<Transaction>,
    /// The category with the highest total across all transactions.
    pub top_category: Option<CategoryTotal>,
}

/// Derive the insights for `period` from every transaction and budget.
pub fn derive_insights(
    transactions: &[Transaction],
    budgets: &[Budget],
    period: Period,
    policy: &AnalyticsPolicy,
) -> SpendingInsights {
    let previous_period = period.previous();
    let current_month_spent = total_spent(in_period(transactions, period));
    let previous_month_spent = total_spent(in_period(transactions, previous_period));

    SpendingInsights {
        total_spent: total_spent(transactions),
        current_month_spent,
        previous_month_spent,
        month_over_month_change: month_over_month_change(
            current_month_spent,
            previous_month_spent,
            policy,
        ),
        over_budget: over_budget_categories(transactions, budgets, period),
        unusual_spending: unusual_spending(transactions, period, policy),
        savings_opportunities: savings_opportunities(transactions, period),
        largest_expense: largest_expense(transactions).cloned(),
        top_category: top_category(transactions),
    }
}

/// The budgets of `period` that were exceeded, by how much, largest first.
pub fn over_budget_categories(
    transactions: &[Transaction],
    budgets: &[Budget],
    period: Period,
) -> Vec<OverBudget> {
    let mut over_budget: Vec<OverBudget> = budgets
        .iter()
        .filter(|budget| budget.period() == period)
        .filter_map(|budget| {
            let actual = category_spend(in_period(transactions, period), &budget.category_id);

            if actual <= budget.amount {
                return None;
            }

            let category = budget.category();

            Some(OverBudget {
                category_id: budget.category_id.clone(),
                name: category.name,
                color: category.color,
                budget: budget.amount,
                actual,
                over_by: actual - budget.amount,
            })
        })
        .collect();

    over_budget.sort_by(|a, b| b.over_by.total_cmp(&a.over_by));
    over_budget
}

/// Categories whose spending in `period` grew by more than the policy's
/// threshold over the previous month, largest increase first.
///
/// Categories with nothing spent last month are never flagged.
pub fn unusual_spending(
    transactions: &[Transaction],
    period: Period,
    policy: &AnalyticsPolicy,
) -> Vec<UnusualSpending> {
    let previous_period = period.previous();

    let mut unusual: Vec<UnusualSpending> = sum_by_category(in_period(transactions, period))
        .into_iter()
        .filter_map(|current| {
            let previous_amount = category_spend(
                in_period(transactions, previous_period),
                &current.category_id,
            );

            if previous_amount <= 0.0 {
                return None;
            }

            let percent_increase = (current.amount - previous_amount) / previous_amount * 100.0;

            (percent_increase > policy.unusual_increase_threshold).then(|| UnusualSpending {
                category_id: current.category_id,
                name: current.name,
                color: current.color,
                amount: current.amount,
                previous_amount,
                percent_increase,
            })
        })
        .collect();

    unusual.sort_by(|a, b| b.percent_increase.total_cmp(&a.percent_increase));
    unusual
}

/// The discretionary categories with spending in `period`, largest first.
pub fn savings_opportunities(transactions: &[Transaction], period: Period) -> Vec<CategoryTotal> {
    let mut opportunities: Vec<CategoryTotal> = sum_by_category(in_period(transactions, period))
        .into_iter()
        .filter(|total| DISCRETIONARY_CATEGORY_IDS.contains(&total.category_id.as_str()))
        .filter(|total| total.amount > 0.0)
        .collect();

    opportunities.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    opportunities
}

/// The transaction with the largest amount. Ties keep the first encountered.
pub fn largest_expense(transactions: &[Transaction]) -> Option<&Transaction> {
    transactions.iter().fold(None, |largest, transaction| match largest {
        Some(largest) if largest.amount >= transaction.amount => Some(largest),
        _ => Some(transaction),
    })
}

/// The category with the highest total. Ties keep the first encountered.
///
/// `None` when nothing has been spent.
pub fn top_category(transactions: &[Transaction]) -> Option<CategoryTotal> {
    sum_by_category(transactions)
        .into_iter()
        .filter(|total| total.amount > 0.0)
        .fold(None, |top, total| match top {
            Some(top) if top.amount >= total.amount => Some(top),
            _ => Some(total),
        })
}
