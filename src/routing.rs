//! Application router configuration for the pages, form endpoints and JSON API.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    budget::{
        delete_budget_endpoint, delete_budget_form_endpoint, get_budget_endpoint,
        get_budgets_page, list_budgets_endpoint, save_budgets_endpoint, update_budget_endpoint,
        upsert_budget_endpoint,
    },
    category::get_categories_endpoint,
    dashboard::{get_analytics_endpoint, get_dashboard_page},
    endpoints,
    error_pages::{get_404_not_found, get_internal_server_error_page},
    transaction::{
        create_transaction_api_endpoint, create_transaction_endpoint,
        delete_transaction_api_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_create_transaction_page, get_edit_transaction_page, get_transaction_endpoint,
        get_transactions_page, list_transactions_endpoint, update_transaction_api_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::TRANSACTIONS_VIEW,
            get(get_transactions_page).post(create_transaction_endpoint),
        )
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(
            endpoints::TRANSACTION,
            delete(delete_transaction_endpoint).put(edit_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS_VIEW,
            get(get_budgets_page).post(save_budgets_endpoint),
        )
        .route(endpoints::BUDGET, delete(delete_budget_form_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_api_endpoint),
        )
        .route(
            endpoints::TRANSACTION_API,
            get(get_transaction_endpoint)
                .put(update_transaction_api_endpoint)
                .delete(delete_transaction_api_endpoint),
        )
        .route(
            endpoints::BUDGETS_API,
            get(list_budgets_endpoint).post(upsert_budget_endpoint),
        )
        .route(
            endpoints::BUDGET_API,
            get(get_budget_endpoint)
                .put(update_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .route(endpoints::CATEGORIES_API, get(get_categories_endpoint))
        .route(endpoints::ANALYTICS_API, get(get_analytics_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, analytics::AnalyticsPolicy, endpoints, routing::build_router};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "Etc/UTC", AnalyticsPolicy::default()).unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn pages_are_routed() {
        let server = get_test_server();

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::BUDGETS_VIEW,
        ] {
            server.get(page).await.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let server = get_test_server();

        server
            .get("/definitely/not/a/page")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn api_write_is_visible_to_analytics() {
        let server = get_test_server();

        // Prime the snapshot cache so the write has to invalidate it.
        server
            .get(endpoints::ANALYTICS_API)
            .add_query_param("year", 2023)
            .add_query_param("month", 0)
            .await
            .assert_status_ok();

        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 120.0,
                "date": "2023-01-15",
                "description": "Weekly shop",
                "category": "groceries",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(endpoints::ANALYTICS_API)
            .add_query_param("year", 2023)
            .add_query_param("month", 0)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["currentMonthSpent"], 120.0);
        assert_eq!(body["data"]["categoryBreakdown"][0]["categoryId"], "groceries");
    }

    #[tokio::test]
    async fn categories_are_served() {
        let server = get_test_server();

        let response = server.get(endpoints::CATEGORIES_API).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"][0]["id"], "groceries");
    }
}
