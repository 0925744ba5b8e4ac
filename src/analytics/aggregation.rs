//! Transaction data aggregation for the dashboard, charts and insights.
//!
//! Every function here is pure: it reads a slice of transactions and returns
//! a new value, never modifying its input.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::{
    analytics::{AnalyticsPolicy, Period},
    category::{CATEGORIES, Category, lookup_category},
    transaction::Transaction,
};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The category ID as stored on the transactions.
    pub category_id: String,
    pub name: &'static str,
    pub color: &'static str,
    pub amount: f64,
}

impl CategoryTotal {
    fn new(category_id: &str, amount: f64) -> Self {
        let category = lookup_category(category_id);

        Self {
            category_id: category_id.to_owned(),
            name: category.name,
            color: category.color,
            amount,
        }
    }

    fn from_category(category: &Category, amount: f64) -> Self {
        Self {
            category_id: category.id.to_owned(),
            name: category.name,
            color: category.color,
            amount,
        }
    }
}

/// Sum the amounts of `transactions`.
pub fn total_spent<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> f64 {
    transactions
        .into_iter()
        .map(|transaction| transaction.amount)
        .sum()
}

/// The transactions dated within `period`.
pub fn in_period(
    transactions: &[Transaction],
    period: Period,
) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(move |transaction| period.contains(transaction.date))
}

/// The transactions dated within `year`.
pub fn in_year(transactions: &[Transaction], year: i32) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(move |transaction| transaction.date.year() == year)
}

/// Sum the amounts of `transactions` per category ID.
///
/// Groups appear in the order their category was first encountered.
/// Unknown category IDs keep their own group and display as "Other".
pub fn sum_by_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions {
        match totals
            .iter_mut()
            .find(|total| total.category_id == transaction.category)
        {
            Some(total) => total.amount += transaction.amount,
            None => totals.push(CategoryTotal::new(
                &transaction.category,
                transaction.amount,
            )),
        }
    }

    totals
}

/// The amount spent in `category_id` by `transactions`.
pub fn category_spend<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    category_id: &str,
) -> f64 {
    total_spent(
        transactions
            .into_iter()
            .filter(|transaction| transaction.category == category_id),
    )
}

/// Sum the amounts of `transactions` for every known category, for charts.
///
/// Every category starts at zero in registry order, unknown category IDs are
/// counted as "Other" and categories that stay at zero are dropped.
pub fn category_breakdown<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryTotal> {
    let mut amounts = [0.0; CATEGORIES.len()];

    for transaction in transactions {
        let category = lookup_category(&transaction.category);

        if let Some(index) = CATEGORIES.iter().position(|c| c.id == category.id) {
            amounts[index] += transaction.amount;
        }
    }

    CATEGORIES
        .iter()
        .zip(amounts)
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(category, amount)| CategoryTotal::from_category(category, amount))
        .collect()
}

/// The `n` categories with the highest totals, highest first.
///
/// Ties keep the order of `totals`.
pub fn top_categories(totals: &[CategoryTotal], n: usize) -> Vec<CategoryTotal> {
    let mut sorted = totals.to_vec();
    // `sort_by` is stable so equal totals keep their order.
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    sorted.truncate(n);
    sorted
}

/// Sum the amounts of the transactions in `year` per month.
///
/// Index 0 is January. Months without transactions are zero.
pub fn monthly_totals(transactions: &[Transaction], year: i32) -> [f64; 12] {
    let mut totals = [0.0; 12];

    for transaction in in_year(transactions, year) {
        let month = Period::of(transaction.date).month;
        totals[usize::from(month)] += transaction.amount;
    }

    totals
}

/// The number of distinct calendar months that have transactions.
pub fn unique_period_count(transactions: &[Transaction]) -> usize {
    transactions
        .iter()
        .map(|transaction| Period::of(transaction.date))
        .collect::<HashSet<_>>()
        .len()
}

/// The total spent divided by the number of months with transactions.
///
/// Zero when there are no transactions.
pub fn average_monthly_spend(transactions: &[Transaction]) -> f64 {
    total_spent(transactions) / unique_period_count(transactions).max(1) as f64
}

/// The percentage change from `previous` to `current`.
///
/// When `previous` is zero there is no meaningful change, so the policy's
/// [AnalyticsPolicy::no_previous_month_change] is returned instead.
pub fn month_over_month_change(current: f64, previous: f64, policy: &AnalyticsPolicy) -> f64 {
    if previous == 0.0 {
        return policy.no_previous_month_change;
    }

    (current - previous) / previous * 100.0
}

/// The distinct years that have transactions, earliest first.
pub fn available_years(transactions: &[Transaction]) -> Vec<i32> {
    transactions
        .iter()
        .map(|transaction| transaction.date.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The `n` most recent transactions, newest first.
///
/// Transactions on the same date keep their order from `transactions`.
pub fn recent_transactions(transactions: &[Transaction], n: usize) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}

/// `amount` as a percentage of `total`, zero if `total` is zero.
pub fn category_share(amount: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }

    amount / total * 100.0
}
