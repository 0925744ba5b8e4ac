//! Defines the form endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    snapshot::SnapshotCache,
    transaction::{create_transaction, form::TransactionForm},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Invalidated after the transaction is saved.
    pub snapshot_cache: Arc<SnapshotCache>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            snapshot_cache: state.snapshot_cache.clone(),
        }
    }
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(builder, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    state.snapshot_cache.invalidate();

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        snapshot::{SnapshotCache, load_snapshot},
        test_utils::assert_hx_redirect,
        transaction::{core::count_transactions, form::TransactionForm, get_transaction},
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            snapshot_cache: Arc::new(SnapshotCache::new()),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();
        let form = TransactionForm {
            description: "test transaction".to_owned(),
            amount: 12.3,
            date: date!(2024 - 05 - 04),
            category: "groceries".to_owned(),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.date, date!(2024 - 05 - 04));
        assert_eq!(transaction.description, "test transaction");
        assert_eq!(transaction.category, "groceries");
    }

    #[tokio::test]
    async fn create_invalidates_snapshot() {
        let state = get_test_state();
        load_snapshot(&state.db_connection, &state.snapshot_cache).unwrap();
        assert!(state.snapshot_cache.current().is_some());

        let form = TransactionForm {
            description: "Bus".to_owned(),
            amount: 3.5,
            date: date!(2024 - 05 - 04),
            category: "transportation".to_owned(),
        };
        create_transaction_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(state.snapshot_cache.current(), None);
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let state = get_test_state();
        let form = TransactionForm {
            description: "Refund".to_owned(),
            amount: -5.0,
            date: date!(2024 - 05 - 04),
            category: "shopping".to_owned(),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection), Ok(0));
    }
}
