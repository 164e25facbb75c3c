//! Table invalidation tracking and live queries.
//!
//! SQLite's update hook reports every row written through the connection.
//! The tracker turns those reports into per-table wakeups, and a
//! [`LiveQuery`] re-runs its query after each wakeup.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::DbResult;

struct Observer {
    tables: Vec<&'static str>,
    wakeup: SyncSender<()>,
}

/// Fans table change notifications out to registered observers.
#[derive(Default)]
pub struct InvalidationTracker {
    observers: Mutex<Vec<Observer>>,
}

impl InvalidationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in a set of tables.
    ///
    /// The returned receiver holds at most one pending wakeup, so bursts of
    /// writes collapse into a single notification.
    pub fn register(&self, tables: &[&'static str]) -> Receiver<()> {
        let (wakeup, receiver) = mpsc::sync_channel(1);
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Observer {
                tables: tables.to_vec(),
                wakeup,
            });
        receiver
    }

    /// Notify observers of `table`. Observers whose receiver is gone are dropped.
    pub fn invalidate(&self, table: &str) {
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        observers.retain(|observer| {
            if !observer.tables.iter().any(|t| *t == table) {
                return true;
            }
            match observer.wakeup.try_send(()) {
                Ok(()) | Err(TrySendError::Full(())) => true,
                Err(TrySendError::Disconnected(())) => false,
            }
        });
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

type QueryFn<T> = Box<dyn FnMut() -> DbResult<T> + Send>;

/// A query whose result is re-emitted whenever an observed table changes.
///
/// The first call to [`Iterator::next`] yields the current result at once.
/// Each later call blocks until a write touches an observed table, then runs
/// the query again. Dropping the live query ends the subscription.
pub struct LiveQuery<T> {
    query: QueryFn<T>,
    changes: Receiver<()>,
    started: bool,
}

impl<T> LiveQuery<T> {
    pub(crate) fn new<F>(changes: Receiver<()>, query: F) -> Self
    where
        F: FnMut() -> DbResult<T> + Send + 'static,
    {
        Self {
            query: Box::new(query),
            changes,
            started: false,
        }
    }

    /// Run the query now without consuming a pending change.
    pub fn current(&mut self) -> DbResult<T> {
        (self.query)()
    }

    /// Emit a fresh result if something changed since the last emission.
    ///
    /// Never blocks. The first call always emits.
    pub fn try_next(&mut self) -> Option<DbResult<T>> {
        if let Some(initial) = self.start() {
            return Some(initial);
        }
        match self.changes.try_recv() {
            Ok(()) => Some(self.current()),
            Err(_) => None,
        }
    }

    /// Wait up to `timeout` for a change and emit the fresh result.
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<DbResult<T>> {
        if let Some(initial) = self.start() {
            return Some(initial);
        }
        match self.changes.recv_timeout(timeout) {
            Ok(()) => Some(self.current()),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Transform each emitted result.
    pub fn map<U, F>(self, mut f: F) -> LiveQuery<U>
    where
        T: 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        let mut query = self.query;
        LiveQuery {
            query: Box::new(move || query().map(&mut f)),
            changes: self.changes,
            started: self.started,
        }
    }

    fn start(&mut self) -> Option<DbResult<T>> {
        if self.started {
            return None;
        }
        self.started = true;
        // The first result already reflects anything written so far.
        while self.changes.try_recv().is_ok() {}
        Some(self.current())
    }
}

impl<T> Iterator for LiveQuery<T> {
    type Item = DbResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(initial) = self.start() {
            return Some(initial);
        }
        match self.changes.recv() {
            Ok(()) => Some(self.current()),
            Err(_) => None,
        }
    }
}
