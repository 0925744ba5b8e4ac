//! JSON endpoints for listing, creating, replacing and deleting transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    AppState, Error,
    api::{self, Empty},
    database_id::TransactionId,
    snapshot::SnapshotCache,
    transaction::{
        Transaction, TransactionBuilder, create_transaction, delete_transaction, get_transaction,
        list_transactions, update_transaction,
    },
};

const RECORD_NAME: &str = "Transaction";

/// The state needed by the transaction API.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub snapshot_cache: Arc<SnapshotCache>,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            snapshot_cache: state.snapshot_cache.clone(),
        }
    }
}

/// The JSON body for creating or replacing a transaction.
///
/// Every field is optional here so that a missing field is reported as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionInput {
    pub amount: Option<f64>,
    /// "YYYY-MM-DD", anything after the day (e.g. a time) is ignored.
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl TransactionInput {
    /// Check the required fields and convert to a [TransactionBuilder].
    ///
    /// # Errors
    /// Returns [Error::Validation] if a field is missing or invalid.
    pub fn into_builder(self) -> Result<TransactionBuilder, Error> {
        let (Some(amount), Some(date), Some(description), Some(category)) =
            (self.amount, self.date, self.description, self.category)
        else {
            return Err(Error::Validation(
                "Amount, date, description and category are required".to_owned(),
            ));
        };

        Transaction::build(amount, parse_date(&date)?, &description)
            .category(&category)
            .validate()
    }
}

/// Parse a calendar date, e.g. "2023-01-15", or the date part of an ISO
/// datetime, e.g. "2023-01-15T00:00:00.000Z".
pub(crate) fn parse_date(text: &str) -> Result<Date, Error> {
    let day = text.split_once('T').map_or(text, |(day, _)| day);

    Date::parse(day, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::Validation(format!("\"{text}\" is not a valid date")))
}

fn parse_body(
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Result<TransactionBuilder, Error> {
    match body {
        Ok(Json(input)) => input.into_builder(),
        Err(rejection) => Err(Error::Validation(rejection.body_text())),
    }
}

/// A route handler that responds with every transaction, newest first.
pub async fn list_transactions_endpoint(State(state): State<TransactionApiState>) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| list_transactions(&connection));

    match result {
        Ok(transactions) => api::ok(StatusCode::OK, transactions),
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to fetch transactions"),
    }
}

/// A route handler for creating a transaction, responds with 201 and the new transaction.
pub async fn create_transaction_api_endpoint(
    State(state): State<TransactionApiState>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Response {
    let result = parse_body(body).and_then(|builder| {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        create_transaction(builder, &connection)
    });

    match result {
        Ok(transaction) => {
            state.snapshot_cache.invalidate();
            api::ok(StatusCode::CREATED, transaction)
        }
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to create transaction"),
    }
}

/// A route handler that responds with a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| get_transaction(transaction_id, &connection));

    match result {
        Ok(transaction) => api::ok(StatusCode::OK, transaction),
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to fetch transaction"),
    }
}

/// A route handler for replacing every field of a transaction.
pub async fn update_transaction_api_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Response {
    let result = parse_body(body).and_then(|builder| {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        update_transaction(transaction_id, builder, &connection)
    });

    match result {
        Ok(transaction) => {
            state.snapshot_cache.invalidate();
            api::ok(StatusCode::OK, transaction)
        }
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to update transaction"),
    }
}

/// A route handler for deleting a transaction, responds with an empty object.
pub async fn delete_transaction_api_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| delete_transaction(transaction_id, &connection));

    match result {
        Ok(()) => {
            state.snapshot_cache.invalidate();
            api::ok(StatusCode::OK, Empty {})
        }
        Err(error) => error.into_api_response(RECORD_NAME, "Failed to delete transaction"),
    }
}
