//! The JSON endpoint that returns the full analytics report for one month.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Response,
};

use crate::{
    Error,
    analytics::{AnalyticsReport, Period, PeriodQuery, build_report},
    api,
    dashboard::handlers::DashboardState,
    snapshot::load_snapshot,
    timezone::get_local_date,
};

const RECORD_NAME: &str = "Report";
const FAILURE_MESSAGE: &str = "Failed to compute analytics";

fn analytics_report(state: &DashboardState, query: PeriodQuery) -> Result<AnalyticsReport, Error> {
    let current = Period::of(get_local_date(&state.local_timezone)?);
    let period = query.resolve(current)?;
    let snapshot = load_snapshot(&state.db_connection, &state.snapshot_cache)?;

    Ok(build_report(
        &snapshot.transactions,
        &snapshot.budgets,
        period,
        &state.analytics_policy,
    ))
}

/// A route handler for the analytics of the month in the query, or the
/// current local month if the query is empty.
pub async fn get_analytics_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return Error::Validation(rejection.body_text())
                .into_api_response(RECORD_NAME, FAILURE_MESSAGE);
        }
    };

    match analytics_report(&state, query) {
        Ok(report) => api::ok(StatusCode::OK, report),
        Err(error) => error.into_api_response(RECORD_NAME, FAILURE_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;
    use time::macros::date;

    use crate::{
        analytics::{AnalyticsPolicy, Period},
        budget::{Budget, upsert_budget},
        dashboard::handlers::DashboardState,
        db::initialize,
        endpoints,
        snapshot::SnapshotCache,
        transaction::{Transaction, create_transaction},
    };

    use super::get_analytics_endpoint;

    fn get_test_state() -> DashboardState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        DashboardState {
            local_timezone: "Etc/UTC".to_owned(),
            analytics_policy: AnalyticsPolicy::default(),
            db_connection: Arc::new(Mutex::new(connection)),
            snapshot_cache: Arc::new(SnapshotCache::new()),
        }
    }

    fn get_test_server(state: DashboardState) -> TestServer {
        let app = Router::new()
            .route(endpoints::ANALYTICS_API, get(get_analytics_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn returns_report_for_requested_month() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(120.0, date!(2023 - 01 - 15), "Shop").category("groceries"),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(50.0, date!(2023 - 02 - 05), "Bus").category("transportation"),
                &connection,
            )
            .unwrap();
            upsert_budget(
                Budget::build(
                    "transportation",
                    80.0,
                    Period {
                        year: 2023,
                        month: 1,
                    },
                ),
                &connection,
            )
            .unwrap();
        }
        let server = get_test_server(state);

        let response = server
            .get(endpoints::ANALYTICS_API)
            .add_query_param("year", 2023)
            .add_query_param("month", 1)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert_eq!(data["period"]["year"], 2023);
        assert_eq!(data["period"]["month"], 1);
        assert_eq!(data["totalSpent"], 170.0);
        assert_eq!(data["currentMonthSpent"], 50.0);
        assert_eq!(data["monthlyTotals"][0], 120.0);
        assert_eq!(data["monthlyTotals"][1], 50.0);
        assert_eq!(data["monthlyTotals"].as_array().unwrap().len(), 12);
        assert_eq!(data["budgetVsActual"][0]["categoryId"], "transportation");
        assert_eq!(data["budgetVsActual"][0]["percentUsed"], 62.5);
    }

    #[tokio::test]
    async fn empty_store_has_empty_breakdowns() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::ANALYTICS_API)
            .add_query_param("year", 2024)
            .add_query_param("month", 3)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        let data = &body["data"];
        assert_eq!(data["totalSpent"], 0.0);
        assert_eq!(data["budgetVsActual"], Value::Array(vec![]));
        assert_eq!(data["categoryBreakdown"], Value::Array(vec![]));
    }

    #[tokio::test]
    async fn month_out_of_range_is_bad_request() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::ANALYTICS_API)
            .add_query_param("month", 12)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["success"], false);
    }

    #[tokio::test]
    async fn year_out_of_range_is_bad_request() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::ANALYTICS_API)
            .add_query_param("year", i32::MIN)
            .add_query_param("month", 0)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["success"], false);
    }

    #[tokio::test]
    async fn malformed_query_is_bad_request() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::ANALYTICS_API)
            .add_query_param("year", "soon")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["success"], false);
    }
}
