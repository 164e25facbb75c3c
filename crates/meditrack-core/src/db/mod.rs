//! Database layer for MediTrack.

mod dao;
mod live;
mod profiles;
mod records;
mod schema;
mod vault_users;

pub use dao::*;
pub use live::*;
pub use schema::*;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::hooks::Action;
use rusqlite::Connection;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: i64, supported: i64 },

    #[error("Stored timestamp out of range in column {column}: {value}")]
    InvalidTimestamp { column: &'static str, value: i64 },

    #[error("Database lock poisoned")]
    LockPoisoned,
}

pub type DbResult<T> = Result<T, DbError>;

struct Inner {
    conn: Mutex<Connection>,
    tracker: Arc<InvalidationTracker>,
    kind: SchemaKind,
}

/// Shared database handle.
///
/// Cloning is cheap; every clone talks to the same connection. Construct one
/// at application start and hand clones to whatever needs storage.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P, kind: SchemaKind) -> DbResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), ?kind, "opening database");
        Self::initialize(conn, kind)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory(kind: SchemaKind) -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn, kind)
    }

    /// Check the stored version, create the schema and install the change hook.
    fn initialize(conn: Connection, kind: SchemaKind) -> DbResult<Self> {
        let found: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if found > SCHEMA_VERSION {
            return Err(DbError::UnsupportedVersion {
                found,
                supported: SCHEMA_VERSION,
            });
        }

        conn.execute_batch(kind.sql())?;
        if found < SCHEMA_VERSION {
            tracing::info!(from = found, to = SCHEMA_VERSION, "migrating schema");
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        let tracker = Arc::new(InvalidationTracker::new());
        let hook_tracker = Arc::clone(&tracker);
        conn.update_hook(Some(
            move |_action: Action, _db: &str, table: &str, _rowid: i64| {
                hook_tracker.invalidate(table);
            },
        ));

        Ok(Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                tracker,
                kind,
            }),
        })
    }

    /// Lock the connection (for advanced queries).
    pub fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.inner.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Schema this database was opened with.
    pub fn kind(&self) -> SchemaKind {
        self.inner.kind
    }

    /// Stored schema version.
    pub fn schema_version(&self) -> DbResult<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Build a live query that re-runs `query` whenever one of `tables` changes.
    pub fn observe<T, F>(&self, tables: &[&'static str], query: F) -> LiveQuery<T>
    where
        F: FnMut() -> DbResult<T> + Send + 'static,
    {
        LiveQuery::new(self.inner.tracker.register(tables), query)
    }

    /// Number of live queries still registered.
    pub fn live_query_count(&self) -> usize {
        self.inner.tracker.observer_count()
    }
}

/// Handle to a MediTrack database (family profiles).
#[derive(Clone)]
pub struct MediTrackDatabase {
    db: Database,
}

impl MediTrackDatabase {
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Ok(Self {
            db: Database::open(path, SchemaKind::MediTrack)?,
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            db: Database::open_in_memory(SchemaKind::MediTrack)?,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Handle to a MediVault database (vault users and medical records).
#[derive(Clone)]
pub struct MediVaultDatabase {
    db: Database,
}

impl MediVaultDatabase {
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Ok(Self {
            db: Database::open(path, SchemaKind::MediVault)?,
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            db: Database::open_in_memory(SchemaKind::MediVault)?,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Read a stored millisecond timestamp column.
pub(crate) fn read_timestamp(
    column: &'static str,
    value: i64,
) -> DbResult<chrono::DateTime<chrono::Utc>> {
    crate::convert::timestamp_to_date(value).ok_or(DbError::InvalidTimestamp { column, value })
}

/// Escape `LIKE` wildcards so user input matches literally (with `ESCAPE '\'`).
pub(crate) fn like_contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(db: &Database) -> Vec<String> {
        db.conn()
            .unwrap()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_open_in_memory() {
        assert!(Database::open_in_memory(SchemaKind::MediTrack).is_ok());
        assert!(Database::open_in_memory(SchemaKind::MediVault).is_ok());
    }

    #[test]
    fn test_meditrack_tables() {
        let db = MediTrackDatabase::open_in_memory().unwrap();
        let tables = table_names(db.database());
        assert!(tables.contains(&"user_profiles".to_string()));
        assert!(!tables.contains(&"medical_records".to_string()));
    }

    #[test]
    fn test_medivault_tables() {
        let db = MediVaultDatabase::open_in_memory().unwrap();
        let tables = table_names(db.database());
        assert!(tables.contains(&"user_profiles".to_string()));
        assert!(tables.contains(&"medical_records".to_string()));
    }

    #[test]
    fn test_schema_version_is_current() {
        let db = Database::open_in_memory(SchemaKind::MediVault).unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(db.kind(), SchemaKind::MediVault);
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
                .unwrap();
        }

        let result = Database::open(&path, SchemaKind::MediTrack);
        assert!(matches!(
            result,
            Err(DbError::UnsupportedVersion { found, .. }) if found == SCHEMA_VERSION + 1
        ));
    }

    #[test]
    fn test_raw_write_invalidates() {
        let db = Database::open_in_memory(SchemaKind::MediVault).unwrap();
        let mut live = db.observe(&[MEDICAL_RECORDS_TABLE], || Ok(()));
        live.try_next();

        db.conn()
            .unwrap()
            .execute(
                "INSERT INTO medical_records (id, userId, type, title, date) VALUES ('r', 'u', 'DIAGNOSIS', 't', 0)",
                [],
            )
            .unwrap();
        assert!(live.try_next().is_some());
    }

    #[test]
    fn test_dropped_live_query_released_on_next_write() {
        let db = Database::open_in_memory(SchemaKind::MediVault).unwrap();
        let records = db.observe(&[MEDICAL_RECORDS_TABLE], || Ok(()));
        let users = db.observe(&[USER_PROFILES_TABLE], || Ok(()));
        assert_eq!(db.live_query_count(), 2);

        drop(records);
        assert_eq!(db.live_query_count(), 2);

        db.conn()
            .unwrap()
            .execute(
                "INSERT INTO medical_records (id, userId, type, title, date) VALUES ('r', 'u', 'DIAGNOSIS', 't', 0)",
                [],
            )
            .unwrap();
        assert_eq!(db.live_query_count(), 1);
        drop(users);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_contains_pattern("an"), "%an%");
        assert_eq!(like_contains_pattern("50%_x"), "%50\\%\\_x%");
        assert_eq!(like_contains_pattern("a\\b"), "%a\\\\b%");
    }
}
