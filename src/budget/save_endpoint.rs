//! Defines the form endpoint that saves the budgets of one month.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    analytics::Period,
    budget::{Budget, BudgetBuilder, budgets_page::budgets_page_url, upsert_budget},
    snapshot::SnapshotCache,
};

/// The state needed to save budgets.
#[derive(Debug, Clone)]
pub struct SaveBudgetsState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// Invalidated after the budgets are saved.
    pub snapshot_cache: Arc<SnapshotCache>,
}

impl FromRef<AppState> for SaveBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            snapshot_cache: state.snapshot_cache.clone(),
        }
    }
}

/// The form data from the budgets page.
///
/// `category_id` and `amount` are repeated once per category, in the same
/// order. An empty amount leaves that category's budget alone.
#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetsForm {
    pub year: i32,
    /// Zero-based, 0 is January.
    pub month: u8,
    #[serde(default)]
    pub category_id: Vec<String>,
    #[serde(default)]
    pub amount: Vec<String>,
}

impl BudgetsForm {
    /// The period of the form and a validated builder for every non-empty amount.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the month, a category or an amount is invalid.
    pub fn into_builders(self) -> Result<(Period, Vec<BudgetBuilder>), Error> {
        let period = Period::new(self.year, self.month)?;

        if self.category_id.len() != self.amount.len() {
            return Err(Error::Validation(
                "Every category needs exactly one amount".to_owned(),
            ));
        }

        let builders = self
            .category_id
            .iter()
            .zip(&self.amount)
            .filter(|(_, amount)| !amount.trim().is_empty())
            .map(|(category_id, amount)| {
                let amount = amount
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| Error::Validation("Amount must be a number".to_owned()))?;

                Budget::build(category_id, amount, period).validate()
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok((period, builders))
    }
}

fn save_budgets(builders: Vec<BudgetBuilder>, connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    for builder in builders {
        upsert_budget(builder, &transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

/// A route handler that upserts every non-empty budget of the form, then
/// redirects back to the budgets page for the same month.
///
/// Nothing is saved if any amount is invalid.
pub async fn save_budgets_endpoint(
    State(state): State<SaveBudgetsState>,
    Form(form): Form<BudgetsForm>,
) -> Response {
    let (period, builders) = match form.into_builders() {
        Ok(result) => result,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = save_budgets(builders, &connection) {
        tracing::error!("could not save budgets for {}: {error}", period.label());
        return error.into_alert_response();
    }

    state.snapshot_cache.invalidate();

    (HxRedirect(budgets_page_url(period)), StatusCode::SEE_OTHER).into_response()
}
