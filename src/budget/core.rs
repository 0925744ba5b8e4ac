//! Defines the budget model and its database queries.
//!
//! There is at most one budget per category per calendar month, enforced with
//! a UNIQUE index. Creating a budget for a (category, month, year) triple that
//! already has one overwrites the stored amount.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    analytics::Period,
    category::{Category, lookup_category},
    database_id::{BudgetId, DatabaseId},
    transaction::validate_amount,
};

/// A spending ceiling for one category in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: DatabaseId,
    /// The ID of the category the budget applies to.
    pub category_id: String,
    /// The most that should be spent in the category for the month.
    pub amount: f64,
    /// The zero-based month, 0 is January.
    pub month: u8,
    pub year: i32,
}

impl Budget {
    /// Create a new budget.
    ///
    /// Shortcut for [BudgetBuilder] for discoverability.
    pub fn build(category_id: &str, amount: f64, period: Period) -> BudgetBuilder {
        BudgetBuilder {
            category_id: category_id.to_owned(),
            amount,
            month: period.month,
            year: period.year,
        }
    }

    /// The registry entry for this budget's category, "Other" if unknown.
    pub fn category(&self) -> &'static Category {
        lookup_category(&self.category_id)
    }

    /// The calendar month the budget applies to.
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }
}

/// The fields needed to create or replace a [Budget].
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetBuilder {
    pub category_id: String,
    pub amount: f64,
    /// The zero-based month, must be in 0..=11.
    pub month: u8,
    pub year: i32,
}

impl BudgetBuilder {
    /// Check the required fields.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the category is empty, the amount is
    /// negative or not a finite number, or the period is out of range.
    pub fn validate(self) -> Result<Self, Error> {
        if self.category_id.trim().is_empty() {
            return Err(Error::Validation("Category is required".to_owned()));
        }

        validate_amount(self.amount)?;
        Period::new(self.year, self.month)?;

        Ok(self)
    }
}

/// Create a budget, or overwrite the amount of the existing budget for the
/// same category and period.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn upsert_budget(builder: BudgetBuilder, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare(
            "INSERT INTO budget (category_id, amount, month, year)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(category_id, month, year) DO UPDATE SET amount = excluded.amount
             RETURNING id, category_id, amount, month, year",
        )?
        .query_row(
            params![
                builder.category_id,
                builder.amount,
                builder.month,
                builder.year
            ],
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve a budget from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare("SELECT id, category_id, amount, month, year FROM budget WHERE id = :id")?
        .query_one(&[(":id", &id)], map_budget_row)?;

    Ok(budget)
}

/// Get every budget, most recent period first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn list_budgets(connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, category_id, amount, month, year FROM budget
             ORDER BY year DESC, month DESC, id ASC",
        )?
        .query_map([], map_budget_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Replace every field of the budget `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingBudget] if `id` does not refer to a valid budget,
/// - [Error::Validation] if another budget already covers the new category and period,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_budget(
    id: BudgetId,
    builder: BudgetBuilder,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "UPDATE budget SET category_id = ?1, amount = ?2, month = ?3, year = ?4
             WHERE id = ?5
             RETURNING id, category_id, amount, month, year",
        )?
        .query_row(
            params![
                builder.category_id,
                builder.amount,
                builder.month,
                builder.year,
                id
            ],
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingBudget,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::Validation(
                "A budget for this category and month already exists".to_owned(),
            ),
            error => error.into(),
        })
}

/// Delete the budget `id`. Transactions are never touched.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingBudget] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM budget WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_id TEXT NOT NULL,
                amount REAL NOT NULL,
                month INTEGER NOT NULL CHECK (month BETWEEN 0 AND 11),
                year INTEGER NOT NULL,
                UNIQUE(category_id, month, year)
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Budget.
fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let id = row.get(0)?;
    let category_id = row.get(1)?;
    let amount = row.get(2)?;
    let month = row.get(3)?;
    let year = row.get(4)?;

    Ok(Budget {
        id,
        category_id,
        amount,
        month,
        year,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        analytics::Period,
        budget::{
            Budget, delete_budget, get_budget, list_budgets, update_budget, upsert_budget,
        },
        db::initialize,
        transaction::{Transaction, create_transaction, list_transactions},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn validate_rejects_month_out_of_range() {
        let result = Budget::build("dining", 10.0, Period { year: 2024, month: 12 }).validate();

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn validate_rejects_year_out_of_range() {
        let result = Budget::build(
            "dining",
            10.0,
            Period {
                year: i32::MIN,
                month: 0,
            },
        )
        .validate();

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn category_falls_back_to_other() {
        let conn = get_test_connection();
        let known = upsert_budget(
            Budget::build("dining", 10.0, Period { year: 2024, month: 1 }),
            &conn,
        )
        .unwrap();
        let unknown = upsert_budget(
            Budget::build("pets", 10.0, Period { year: 2024, month: 1 }),
            &conn,
        )
        .unwrap();

        assert_eq!(known.category().name, "Dining");
        assert_eq!(unknown.category().name, "Other");
    }

    #[test]
    fn validate_rejects_empty_category() {
        let result = Budget::build("", 10.0, Period { year: 2024, month: 1 }).validate();

        assert_eq!(
            result,
            Err(Error::Validation("Category is required".to_owned()))
        );
    }

    #[test]
    fn validate_rejects_negative_amount() {
        let result = Budget::build("dining", -5.0, Period { year: 2024, month: 1 }).validate();

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn submitting_same_period_twice_keeps_one_budget() {
        let conn = get_test_connection();
        let period = Period {
            year: 2024,
            month: 3,
        };

        let first = upsert_budget(Budget::build("dining", 100.0, period), &conn).unwrap();
        let second = upsert_budget(Budget::build("dining", 150.0, period), &conn).unwrap();

        let budgets = list_budgets(&conn).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, 150.0);
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn different_periods_get_separate_budgets() {
        let conn = get_test_connection();

        upsert_budget(
            Budget::build("dining", 100.0, Period { year: 2024, month: 3 }),
            &conn,
        )
        .unwrap();
        upsert_budget(
            Budget::build("dining", 100.0, Period { year: 2024, month: 4 }),
            &conn,
        )
        .unwrap();

        assert_eq!(list_budgets(&conn).unwrap().len(), 2);
    }

    #[test]
    fn list_is_most_recent_period_first() {
        let conn = get_test_connection();
        let old = upsert_budget(
            Budget::build("travel", 10.0, Period { year: 2023, month: 11 }),
            &conn,
        )
        .unwrap();
        let new = upsert_budget(
            Budget::build("travel", 20.0, Period { year: 2024, month: 0 }),
            &conn,
        )
        .unwrap();
        let middle = upsert_budget(
            Budget::build("dining", 30.0, Period { year: 2023, month: 10 }),
            &conn,
        )
        .unwrap();

        assert_eq!(list_budgets(&conn).unwrap(), vec![new, old, middle]);
    }

    #[test]
    fn update_replaces_fields() {
        let conn = get_test_connection();
        let created = upsert_budget(
            Budget::build("dining", 100.0, Period { year: 2024, month: 3 }),
            &conn,
        )
        .unwrap();

        let updated = update_budget(
            created.id,
            Budget::build("shopping", 80.0, Period { year: 2024, month: 4 }),
            &conn,
        )
        .unwrap();

        assert_eq!(updated.category_id, "shopping");
        assert_eq!(updated.amount, 80.0);
        assert_eq!(get_budget(created.id, &conn), Ok(updated));
    }

    #[test]
    fn update_onto_existing_period_is_rejected() {
        let conn = get_test_connection();
        let period = Period {
            year: 2024,
            month: 3,
        };
        upsert_budget(Budget::build("dining", 100.0, period), &conn).unwrap();
        let other = upsert_budget(Budget::build("shopping", 50.0, period), &conn).unwrap();

        let result = update_budget(other.id, Budget::build("dining", 75.0, period), &conn);

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn update_missing_budget_fails() {
        let conn = get_test_connection();

        let result = update_budget(
            3,
            Budget::build("dining", 1.0, Period { year: 2024, month: 3 }),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingBudget));
    }

    #[test]
    fn delete_leaves_transactions_alone() {
        let conn = get_test_connection();
        let period = Period {
            year: 2024,
            month: 3,
        };
        let budget = upsert_budget(Budget::build("dining", 100.0, period), &conn).unwrap();
        create_transaction(
            Transaction::build(20.0, time::macros::date!(2024 - 04 - 10), "Pizza")
                .category("dining"),
            &conn,
        )
        .unwrap();

        delete_budget(budget.id, &conn).unwrap();

        assert_eq!(get_budget(budget.id, &conn), Err(Error::NotFound));
        assert_eq!(list_transactions(&conn).unwrap().len(), 1);
    }

    #[test]
    fn delete_missing_budget_fails() {
        let conn = get_test_connection();

        assert_eq!(delete_budget(1, &conn), Err(Error::DeleteMissingBudget));
    }
}
