//! Monthly spending budgets per category.
//!
//! This module contains the `Budget` model and its database queries, the
//! JSON API and the budgets page with its form endpoints.

mod api;
mod budgets_page;
mod core;
mod delete_endpoint;
mod save_endpoint;

pub use api::{
    delete_budget_endpoint, get_budget_endpoint, list_budgets_endpoint, update_budget_endpoint,
    upsert_budget_endpoint,
};
pub use budgets_page::get_budgets_page;
pub use core::{
    Budget, BudgetBuilder, create_budget_table, delete_budget, get_budget, list_budgets,
    update_budget, upsert_budget,
};
pub use delete_endpoint::delete_budget_form_endpoint;
pub use save_endpoint::save_budgets_endpoint;
