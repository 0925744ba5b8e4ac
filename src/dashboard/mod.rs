//! Dashboard module
//!
//! Provides an overview page with summary cards, charts, spending insights
//! and tables for one month, plus the JSON analytics endpoint that returns
//! the same numbers.

mod api;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use api::get_analytics_endpoint;
pub use handlers::get_dashboard_page;
