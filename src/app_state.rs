//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, analytics::AnalyticsPolicy, db::initialize, snapshot::SnapshotCache};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The values used for the edge cases of the analytics.
    pub analytics_policy: AnalyticsPolicy,

    /// The last snapshot of the records, shared by the dashboard and analytics API.
    pub snapshot_cache: Arc<SnapshotCache>,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        analytics_policy: AnalyticsPolicy,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            analytics_policy,
            snapshot_cache: Arc::new(SnapshotCache::new()),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
