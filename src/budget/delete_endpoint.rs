//! Defines the form endpoint for deleting a budget from the budgets page.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{Budget, budgets_page::budgets_page_url, delete_budget, get_budget},
    database_id::BudgetId,
    snapshot::SnapshotCache,
};

/// The state needed to delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// Invalidated after the budget is deleted.
    pub snapshot_cache: Arc<SnapshotCache>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            snapshot_cache: state.snapshot_cache.clone(),
        }
    }
}

fn remove_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let budget = get_budget(id, connection).map_err(|error| match error {
        Error::NotFound => Error::DeleteMissingBudget,
        error => error,
    })?;

    delete_budget(id, connection)?;

    Ok(budget)
}

/// A route handler for deleting a budget.
///
/// Redirects to the budgets page for the budget's month, since the
/// budget-vs-actual row may still be needed for unbudgeted spending.
pub async fn delete_budget_form_endpoint(
    State(state): State<DeleteBudgetState>,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match remove_budget(budget_id, &connection) {
        Ok(budget) => {
            state.snapshot_cache.invalidate();
            (
                HxRedirect(budgets_page_url(budget.period())),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete budget {budget_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        analytics::Period,
        budget::{Budget, list_budgets, upsert_budget},
        db::initialize,
        snapshot::SnapshotCache,
        test_utils::assert_hx_redirect,
    };

    use super::{DeleteBudgetState, delete_budget_form_endpoint};

    fn get_test_state() -> DeleteBudgetState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        DeleteBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
            snapshot_cache: Arc::new(SnapshotCache::new()),
        }
    }

    #[tokio::test]
    async fn deletes_budget_and_redirects_to_its_month() {
        let state = get_test_state();
        let budget = upsert_budget(
            Budget::build(
                "travel",
                500.0,
                Period {
                    year: 2023,
                    month: 6,
                },
            ),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_budget_form_endpoint(State(state.clone()), Path(budget.id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/budgets?year=2023&month=6");
        assert!(
            list_budgets(&state.db_connection.lock().unwrap())
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn missing_budget_returns_not_found_alert() {
        let state = get_test_state();

        let response = delete_budget_form_endpoint(State(state), Path(3)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
