// src/store/sqlite.rs

//! SQLite-backed persistence for observation records.
//!
//! A single shared connection behind a mutex serializes commits, so every
//! append from either pipeline is one atomic unit. Clones of a
//! [`FingerprintStore`] share the same connection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{Connection, params};
use thiserror::Error;
use tracing::{debug, info};

use crate::store::record::{Observation, RecordId};

/// Errors from opening or writing the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not open or create the backing database.
    #[error("connection error: {0}")]
    Connection(String),

    /// Schema initialization failed.
    #[error("schema error: {0}")]
    Schema(String),

    /// A record insert failed.
    #[error("insert error: {0}")]
    Insert(String),

    /// Any other underlying SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Table layout is shared with earlier deployments; column names are
/// load-bearing and must not change.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS file_analysis (
    id                 INTEGER PRIMARY KEY,
    file_hash          TEXT NOT NULL,
    binary_type        TEXT NOT NULL,
    file_size          INTEGER NOT NULL,
    analysis_timestamp TEXT NOT NULL
);
";

/// Append-only store of observation records.
#[derive(Clone)]
pub struct FingerprintStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl FingerprintStore {
    /// Open (or create) a file-backed store and make sure the schema exists.
    ///
    /// Missing parent directories are created. Safe to call repeatedly and
    /// from several processes pointed at the same file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Connection(format!("creating directory {parent:?}: {e}"))
                })?;
            }
        }

        let conn = Connection::open(&path)
            .map_err(|e| StoreError::Connection(format!("opening {path:?}: {e}")))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.clone()),
        };
        store.initialize()?;
        info!(path = ?path, "fingerprint store ready");
        Ok(store)
    }

    /// Open an in-memory store. Used by tests; clones still share the
    /// single underlying connection.
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Connection(format!("opening in-memory database: {e}")))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Path of the backing database file, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert one observation record, returning its assigned id.
    pub fn append(&self, obs: &Observation) -> StoreResult<RecordId> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO file_analysis (file_hash, binary_type, file_size, analysis_timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                // SQLite integers are i64; sizes convert at this boundary only.
                params![
                    obs.fingerprint,
                    obs.source.label(),
                    obs.byte_size as i64,
                    obs.observed_at
                ],
            )
            .map_err(|e| StoreError::Insert(e.to_string()))?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Number of records currently stored.
    pub fn record_count(&self) -> StoreResult<u64> {
        self.with_connection(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM file_analysis", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }

    /// Execute a closure with exclusive access to the underlying connection.
    pub fn with_connection<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Apply pragmas and create the table if it does not exist.
    fn initialize(&self) -> StoreResult<()> {
        self.with_connection(|conn| {
            configure_pragmas(conn)?;
            conn.execute_batch(SCHEMA)
                .map_err(|e| StoreError::Schema(e.to_string()))?;
            debug!("fingerprint store schema ready");
            Ok(())
        })
    }
}

fn configure_pragmas(conn: &Connection) -> StoreResult<()> {
    // WAL so a reader (or a second instance) never blocks the writers.
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
    Ok(())
}
