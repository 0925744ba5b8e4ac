//! The endpoint URIs for pages, form handlers and the JSON API.
//!
//! For endpoints that take a parameter, e.g., '/budgets/{budget_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with the spending summary and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing every transaction. Also accepts new transactions from the form.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The form route for replacing or deleting a transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The page for setting the budgets of a month. Also accepts the budget form.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The form route for deleting a budget.
pub const BUDGET: &str = "/budgets/{budget_id}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The JSON route for listing and creating transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The JSON route for a single transaction.
pub const TRANSACTION_API: &str = "/api/transactions/{transaction_id}";
/// The JSON route for listing and creating budgets.
pub const BUDGETS_API: &str = "/api/budgets";
/// The JSON route for a single budget.
pub const BUDGET_API: &str = "/api/budgets/{budget_id}";
/// The JSON route for the category registry.
pub const CATEGORIES_API: &str = "/api/categories";
/// The JSON route for the analytics of a month.
pub const ANALYTICS_API: &str = "/api/analytics";

/// Replace the first `{parameter}` in `endpoint_path` with `id`.
///
/// Paths without a parameter are returned unchanged. An unclosed brace
/// replaces everything from the brace to the end of the path.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_end..]
    )
}
