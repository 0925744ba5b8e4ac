//! A read-through cache of every transaction and budget.
//!
//! Each refresh takes a ticket before reading the database. A completed
//! refresh is only cached if its ticket is newer than both the cached
//! snapshot and the last invalidation, so a slow read that started before a
//! write can never replace fresher data.

use std::sync::{Arc, Mutex, PoisonError};

use rusqlite::Connection;

use crate::{
    Error,
    budget::{Budget, list_budgets},
    transaction::{Transaction, list_transactions},
};

/// Every transaction and budget, read at the same time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSnapshot {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

/// Identifies one refresh of the cache. Later refreshes get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Default)]
struct CacheState {
    latest_issued: u64,
    committed: Option<(RefreshTicket, Arc<RecordSnapshot>)>,
    invalidated_at: u64,
}

/// Holds the last successfully read [RecordSnapshot].
#[derive(Debug, Default)]
pub struct SnapshotCache {
    state: Mutex<CacheState>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        // The state is always left consistent, so a panic elsewhere does not
        // invalidate it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached snapshot, if there is one.
    pub fn current(&self) -> Option<Arc<RecordSnapshot>> {
        self.lock()
            .committed
            .as_ref()
            .map(|(_, snapshot)| snapshot.clone())
    }

    /// Take a ticket for a refresh that is about to read the database.
    pub fn begin_refresh(&self) -> RefreshTicket {
        let mut state = self.lock();
        state.latest_issued += 1;
        RefreshTicket(state.latest_issued)
    }

    /// Offer the result of the refresh holding `ticket`.
    ///
    /// The snapshot replaces the cached one only if `ticket` is newer than the
    /// cached snapshot's ticket and was issued after the last invalidation.
    /// The snapshot is returned either way so the caller can still use it.
    pub fn complete_refresh(
        &self,
        ticket: RefreshTicket,
        snapshot: RecordSnapshot,
    ) -> Arc<RecordSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut state = self.lock();

        let newer_than_committed = state
            .committed
            .as_ref()
            .is_none_or(|(committed, _)| ticket > *committed);
        let after_invalidation = ticket.0 > state.invalidated_at;

        if newer_than_committed && after_invalidation {
            state.committed = Some((ticket, snapshot.clone()));
        } else {
            tracing::debug!("Discarding stale snapshot from refresh {}", ticket.0);
        }

        snapshot
    }

    /// Drop the cached snapshot and reject every refresh already in flight.
    ///
    /// Call after a write to the database has finished.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.latest_issued += 1;
        state.invalidated_at = state.latest_issued;
        state.committed = None;
    }
}

/// Get the cached snapshot, reading it from the database if needed.
///
/// # Errors
/// Returns a:
/// - [Error::DatabaseLockError] if the database lock is poisoned,
/// - or [Error::SqlError] if the records could not be read.
pub fn load_snapshot(
    db_connection: &Mutex<Connection>,
    cache: &SnapshotCache,
) -> Result<Arc<RecordSnapshot>, Error> {
    if let Some(snapshot) = cache.current() {
        return Ok(snapshot);
    }

    let ticket = cache.begin_refresh();

    let snapshot = {
        let connection = db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        RecordSnapshot {
            transactions: list_transactions(&connection)?,
            budgets: list_budgets(&connection)?,
        }
    };

    Ok(cache.complete_refresh(ticket, snapshot))
}
