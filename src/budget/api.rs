//! JSON endpoints for listing, upserting, replacing and deleting budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    api::{self, Empty},
    budget::{BudgetBuilder, delete_budget, get_budget, list_budgets, update_budget, upsert_budget},
    database_id::BudgetId,
    snapshot::SnapshotCache,
};

const RECORD_NAME: &str = "Budget";

/// The state needed by the budget API.
#[derive(Debug, Clone)]
pub struct BudgetApiState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub snapshot_cache: Arc<SnapshotCache>,
}

impl FromRef<AppState> for BudgetApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            snapshot_cache: state.snapshot_cache.clone(),
        }
    }
}

/// The JSON body for upserting or replacing a budget.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub category_id: Option<String>,
    pub amount: Option<f64>,
    /// Zero-based, 0 is January.
    pub month: Option<u8>,
    pub year: Option<i32>,
}

impl BudgetInput {
    /// Check the required fields and convert to a [BudgetBuilder].
    ///
    /// # Errors
    /// Returns [Error::Validation] if a field is missing or invalid.
    pub fn into_builder(self) -> Result<BudgetBuilder, Error> {
        let (Some(category_id), Some(amount), Some(month), Some(year)) =
            (self.category_id, self.amount, self.month, self.year)
        else {
            return Err(Error::Validation(
                "Category, amount, month and year are required".to_owned(),
            ));
        };

        BudgetBuilder {
            category_id,
            amount,
            month,
            year,
        }
        .validate()
    }
}

fn parse_body(body: Result<Json<BudgetInput>, JsonRejection>) -> Result<BudgetBuilder, Error> {
    match body {
        Ok(Json(input)) => input.into_builder(),
        Err(rejection) => Err(Error::Validation(rejection.body_text())),
    }
}

/// A route handler that responds with every budget, most recent period first.
pub async fn list_budgets_endpoint(State(state): State<BudgetApiState>) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| list_budgets(&connection));

    match result {
        Ok(budgets) => api::ok(StatusCode::OK, budgets),
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to fetch budgets"),
    }
}

/// A route handler that creates a budget, or overwrites the amount of the
/// budget for the same category and month. Responds with 201 and the stored budget.
pub async fn upsert_budget_endpoint(
    State(state): State<BudgetApiState>,
    body: Result<Json<BudgetInput>, JsonRejection>,
) -> Response {
    let result = parse_body(body).and_then(|builder| {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        upsert_budget(builder, &connection)
    });

    match result {
        Ok(budget) => {
            state.snapshot_cache.invalidate();
            api::ok(StatusCode::CREATED, budget)
        }
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to save budget"),
    }
}

/// A route handler that responds with a single budget.
pub async fn get_budget_endpoint(
    State(state): State<BudgetApiState>,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| get_budget(budget_id, &connection));

    match result {
        Ok(budget) => api::ok(StatusCode::OK, budget),
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to fetch budget"),
    }
}

/// A route handler for replacing every field of a budget.
pub async fn update_budget_endpoint(
    State(state): State<BudgetApiState>,
    Path(budget_id): Path<BudgetId>,
    body: Result<Json<BudgetInput>, JsonRejection>,
) -> Response {
    let result = parse_body(body).and_then(|builder| {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        update_budget(budget_id, builder, &connection)
    });

    match result {
        Ok(budget) => {
            state.snapshot_cache.invalidate();
            api::ok(StatusCode::OK, budget)
        }
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to update budget"),
    }
}

/// A route handler for deleting a budget, responds with an empty object.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetApiState>,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| delete_budget(budget_id, &connection));

    match result {
        Ok(()) => {
            state.snapshot_cache.invalidate();
            api::ok(StatusCode::OK, Empty {})
        }
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to delete budget"),
    }
}
