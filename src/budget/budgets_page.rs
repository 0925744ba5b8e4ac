//! Defines the route handler for the page for setting the budgets of one month.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    analytics::{AnalyticsPolicy, BudgetComparison, Period, PeriodQuery, budget_vs_actual},
    budget::Budget,
    category::CATEGORIES,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, category_badge, dollar_input_styles, format_currency, format_percentage,
        loading_spinner,
    },
    navigation::NavBar,
    snapshot::{SnapshotCache, load_snapshot},
    timezone::get_local_date,
};

/// The state needed for the budgets page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub analytics_policy: AnalyticsPolicy,
    pub db_connection: Arc<Mutex<Connection>>,
    pub snapshot_cache: Arc<SnapshotCache>,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            analytics_policy: state.analytics_policy,
            db_connection: state.db_connection.clone(),
            snapshot_cache: state.snapshot_cache.clone(),
        }
    }
}

/// The URL of the budgets page for `period`.
pub fn budgets_page_url(period: Period) -> String {
    format!(
        "{}?year={}&month={}",
        endpoints::BUDGETS_VIEW,
        period.year,
        period.month
    )
}

/// One row of the budget-vs-actual table.
struct ComparisonRow<'a> {
    comparison: &'a BudgetComparison,
    /// Only budgeted rows can be deleted.
    delete_url: Option<String>,
}

fn period_navigation(period: Period) -> Markup {
    html! {
        nav class="flex items-center justify-between gap-4" aria-label="Month"
        {
            a href=(budgets_page_url(period.previous())) class=(LINK_STYLE)
            {
                "← " (period.previous().label())
            }

            h1 class="text-xl font-bold" { "Budgets for " (period.label()) }

            a href=(budgets_page_url(period.next())) class=(LINK_STYLE)
            {
                (period.next().label()) " →"
            }
        }
    }
}

fn budget_form(period: Period, budgets: &[&Budget]) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(endpoints::BUDGETS_VIEW)
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            input type="hidden" name="year" value=(period.year);
            input type="hidden" name="month" value=(period.month);

            div class="grid grid-cols-1 gap-4 sm:grid-cols-2"
            {
                @for category in &CATEGORIES {
                    @let input_id = format!("amount-{}", category.id);
                    @let current = budgets
                        .iter()
                        .find(|budget| budget.category_id == category.id)
                        .map(|budget| format!("{:.2}", budget.amount));

                    div
                    {
                        label for=(input_id) class=(FORM_LABEL_STYLE)
                        {
                            (category_badge(category))
                        }

                        input type="hidden" name="category_id" value=(category.id);

                        div class="input-wrapper w-full"
                        {
                            input
                                name="amount"
                                id=(input_id)
                                type="number"
                                step="0.01"
                                min="0"
                                placeholder="No budget"
                                value=[current]
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (spinner)
                }
                " Save Budgets"
            }
        }
    }
}

fn comparison_table(period: Period, rows: &[ComparisonRow<'_>]) -> Markup {
    html! {
        div class="w-full overflow-x-auto dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Budget" }
                        th scope="col" class="px-6 py-3 text-right" { "Actual" }
                        th scope="col" class="px-6 py-3 text-right" { "Remaining" }
                        th scope="col" class="px-6 py-3 text-right" { "Used" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for row in rows {
                        @let comparison = row.comparison;
                        @let used_style = if comparison.is_over_budget() {
                            "px-6 py-4 text-right font-semibold text-red-600 dark:text-red-400"
                        } else {
                            "px-6 py-4 text-right"
                        };

                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE)
                            {
                                span
                                    class="inline-flex items-center px-2.5 py-0.5 text-xs
                                        font-semibold text-white rounded-full"
                                    style={"background-color: " (comparison.color)}
                                {
                                    (comparison.name)
                                }
                            }
                            td class="px-6 py-4 text-right tabular-nums"
                            {
                                @if comparison.budgeted {
                                    (format_currency(comparison.budget))
                                } @else {
                                    "None"
                                }
                            }
                            td class="px-6 py-4 text-right tabular-nums"
                            {
                                (format_currency(comparison.actual))
                            }
                            td class="px-6 py-4 text-right tabular-nums"
                            {
                                (format_currency(comparison.difference))
                            }
                            td class=(used_style)
                            {
                                (format_percentage(comparison.percent_used))
                            }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @if let Some(delete_url) = &row.delete_url {
                                    button
                                        hx-delete=(delete_url)
                                        hx-confirm={
                                            "Are you sure you want to delete the "
                                            (comparison.name) " budget for " (period.label()) "?"
                                        }
                                        hx-target-error="#alert-container"
                                        class=(BUTTON_DELETE_STYLE)
                                    {
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td
                                colspan="6"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No budgets or spending for " (period.label()) "."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn budgets_view(period: Period, budgets: &[&Budget], comparisons: &[BudgetComparison]) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();
    let rows: Vec<ComparisonRow<'_>> = comparisons
        .iter()
        .map(|comparison| ComparisonRow {
            comparison,
            delete_url: budgets
                .iter()
                .find(|budget| comparison.budgeted && budget.category_id == comparison.category_id)
                .map(|budget| format_endpoint(endpoints::BUDGET, budget.id)),
        })
        .collect();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6"
            {
                (period_navigation(period))

                (budget_form(period, budgets))

                h2 class="text-lg font-semibold" { "Budget vs Actual" }

                (comparison_table(period, &rows))
            }
        }
    };

    base("Budgets", &[dollar_input_styles()], &content)
}

/// Renders the budget form and the budget-vs-actual table for the month in
/// the query, or the current month if there is no query.
pub async fn get_budgets_page(
    State(state): State<BudgetsPageState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Response, Error> {
    let current = Period::of(get_local_date(&state.local_timezone)?);
    let period = query.resolve(current)?;

    let snapshot = load_snapshot(&state.db_connection, &state.snapshot_cache)
        .inspect_err(|error| tracing::error!("could not load records for budgets page: {error}"))?;

    let budgets: Vec<&Budget> = snapshot
        .budgets
        .iter()
        .filter(|budget| budget.period() == period)
        .collect();
    let comparisons = budget_vs_actual(
        &snapshot.transactions,
        &snapshot.budgets,
        period,
        &state.analytics_policy,
    );

    Ok(budgets_view(period, &budgets, &comparisons).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        analytics::{AnalyticsPolicy, Period, PeriodQuery},
        budget::{Budget, upsert_budget},
        category::CATEGORIES,
        db::initialize,
        endpoints::{self, format_endpoint},
        snapshot::SnapshotCache,
        test_utils::{
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
        transaction::{Transaction, create_transaction},
    };

    use super::{BudgetsPageState, budgets_page_url, get_budgets_page};

    const MARCH_2024: Period = Period {
        year: 2024,
        month: 2,
    };

    fn get_test_state() -> BudgetsPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        BudgetsPageState {
            local_timezone: "Etc/UTC".to_owned(),
            analytics_policy: AnalyticsPolicy::default(),
            db_connection: Arc::new(Mutex::new(connection)),
            snapshot_cache: Arc::new(SnapshotCache::new()),
        }
    }

    fn march_query() -> Query<PeriodQuery> {
        Query(PeriodQuery {
            year: Some(2024),
            month: Some(2),
        })
    }

    #[test]
    fn page_url_has_period_query() {
        assert_eq!(budgets_page_url(MARCH_2024), "/budgets?year=2024&month=2");
    }

    #[tokio::test]
    async fn form_has_input_for_every_category() {
        let state = get_test_state();

        let response = get_budgets_page(State(state), march_query()).await.unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::BUDGETS_VIEW, "hx-post");
        assert_form_submit_button_with_text(&form, "Save Budgets");

        let amount_inputs = form
            .select(&Selector::parse("input[name=amount]").unwrap())
            .count();
        assert_eq!(amount_inputs, CATEGORIES.len());

        let hidden_month = form
            .select(&Selector::parse("input[name=month]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"));
        assert_eq!(hidden_month, Some("2"));
    }

    #[tokio::test]
    async fn shows_existing_budget_and_actual_spend() {
        let state = get_test_state();
        let budget = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(120.0, date!(2024 - 03 - 10), "Dinner").category("dining"),
                &connection,
            )
            .unwrap();
            upsert_budget(Budget::build("dining", 100.0, MARCH_2024), &connection).unwrap()
        };

        let response = get_budgets_page(State(state), march_query()).await.unwrap();
        let document = parse_html_document(response).await;

        let dining_value = document
            .select(&Selector::parse("input#amount-dining").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"));
        assert_eq!(dining_value, Some("100.00"));

        let rows: Vec<_> = document
            .select(&Selector::parse("tbody tr").unwrap())
            .collect();
        assert_eq!(rows.len(), 1);
        let row_text = rows[0].text().collect::<String>();
        assert!(row_text.contains("Dining"));
        assert!(row_text.contains("$120.00"));
        assert!(row_text.contains("-$20.00"));
        assert!(row_text.contains("120.0%"));

        let delete_url = rows[0]
            .select(&Selector::parse("button").unwrap())
            .next()
            .and_then(|button| button.value().attr("hx-delete"));
        assert_eq!(
            delete_url,
            Some(format_endpoint(endpoints::BUDGET, budget.id).as_str())
        );
    }

    #[tokio::test]
    async fn unbudgeted_spend_has_no_delete_button() {
        let state = get_test_state();
        create_transaction(
            Transaction::build(30.0, date!(2024 - 03 - 02), "Film").category("entertainment"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_budgets_page(State(state), march_query()).await.unwrap();
        let document = parse_html_document(response).await;

        let row = document
            .select(&Selector::parse("tbody tr").unwrap())
            .next()
            .unwrap();
        assert!(row.text().collect::<String>().contains("100.0%"));
        assert_eq!(row.select(&Selector::parse("button").unwrap()).count(), 0);
    }

    #[tokio::test]
    async fn empty_period_shows_message() {
        let state = get_test_state();

        let response = get_budgets_page(State(state), march_query()).await.unwrap();
        let document = parse_html_document(response).await;

        let message = document
            .select(&Selector::parse("td[colspan='6']").unwrap())
            .next()
            .expect("No empty table message")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), "No budgets or spending for March 2024.");
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let state = get_test_state();
        let query = Query(PeriodQuery {
            year: Some(2024),
            month: Some(12),
        });

        let response = get_budgets_page(State(state), query).await.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
