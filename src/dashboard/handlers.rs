//! HTTP handler for the dashboard page.
//!
//! The dashboard shows one month at a time. The month comes from the `year`
//! and `month` query parameters and defaults to the current local month.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    analytics::{AnalyticsPolicy, AnalyticsReport, Period, PeriodQuery, build_report},
    dashboard::{
        cards::{insights_view, summary_cards_view},
        charts::{
            DashboardChart, budget_vs_actual_chart, category_breakdown_chart, charts_script,
            charts_view, monthly_expenses_chart,
        },
        tables::{recent_transactions_table, top_categories_table},
    },
    endpoints,
    html::{HeadElement, LINK_STYLE, base, link},
    navigation::NavBar,
    snapshot::{SnapshotCache, load_snapshot},
    timezone::get_local_date,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub analytics_policy: AnalyticsPolicy,
    pub db_connection: Arc<Mutex<Connection>>,
    pub snapshot_cache: Arc<SnapshotCache>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            analytics_policy: state.analytics_policy,
            db_connection: state.db_connection.clone(),
            snapshot_cache: state.snapshot_cache.clone(),
        }
    }
}

/// The URL of the dashboard for `period`.
fn dashboard_url(period: Period) -> String {
    format!(
        "{}?year={}&month={}",
        endpoints::DASHBOARD_VIEW,
        period.year,
        period.month
    )
}

/// Display a page with an overview of the user's spending.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Response, Error> {
    let current = Period::of(get_local_date(&state.local_timezone)?);
    let period = query.resolve(current)?;

    let snapshot = load_snapshot(&state.db_connection, &state.snapshot_cache)
        .inspect_err(|error| tracing::error!("could not load records for dashboard: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if snapshot.transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let report = build_report(
        &snapshot.transactions,
        &snapshot.budgets,
        period,
        &state.analytics_policy,
    );

    Ok(dashboard_view(nav_bar, &report).into_response())
}

/// Creates the dashboard charts from the report.
///
/// The chart options are serialized to JSON for ECharts consumption.
fn build_dashboard_charts(report: &AnalyticsReport) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: "monthly-expenses-chart",
            options: monthly_expenses_chart(&report.monthly_totals, report.period.year)
                .to_string(),
        },
        DashboardChart {
            id: "category-breakdown-chart",
            options: category_breakdown_chart(&report.category_breakdown, report.period.year)
                .to_string(),
        },
        DashboardChart {
            id: "budget-vs-actual-chart",
            options: budget_vs_actual_chart(&report.budget_vs_actual, report.period).to_string(),
        },
    ]
}

/// Links to the previous and next month, plus the first month of every year
/// that has transactions.
fn period_navigation(period: Period, available_years: &[i32]) -> Markup {
    html! {
        nav class="w-full mb-6 space-y-2" aria-label="Month"
        {
            div class="flex items-center justify-between gap-4"
            {
                a href=(dashboard_url(period.previous())) class=(LINK_STYLE)
                {
                    "← " (period.previous().label())
                }

                h1 class="text-xl font-bold" { (period.label()) }

                a href=(dashboard_url(period.next())) class=(LINK_STYLE)
                {
                    (period.next().label()) " →"
                }
            }

            @if available_years.len() > 1 {
                ul id="year-selector" class="flex flex-wrap justify-center gap-3 text-sm"
                {
                    @for &year in available_years {
                        li
                        {
                            @if year == period.year {
                                span class="font-semibold" aria-current="true" { (year) }
                            } @else {
                                a
                                    href=(dashboard_url(Period { year, month: 0 }))
                                    class=(LINK_STYLE)
                                {
                                    (year)
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the dashboard page when no transaction data exists.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "add a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts and insights will show up here once you "
                (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with summary cards, charts, insights and tables.
fn dashboard_view(nav_bar: NavBar, report: &AnalyticsReport) -> Markup {
    let nav_bar = nav_bar.into_html();
    let charts = build_dashboard_charts(report);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (period_navigation(report.period, &report.available_years))

            (summary_cards_view(report))

            (charts_view(&charts))

            (insights_view(&report.insights))

            section class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full mb-8"
            {
                (top_categories_table(&report.top_categories, report.total_spent))
                (recent_transactions_table(&report.recent_transactions))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
