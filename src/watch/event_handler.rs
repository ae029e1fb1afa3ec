// src/watch/event_handler.rs

//! Event processing logic for local file changes.
//!
//! Each modify event turns into at most one observation record. Failures
//! here are logged and contained; they never stop the watch loop.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::fingerprint::compute_file_fingerprint;
use crate::store::{FINGERPRINT_ERROR, FingerprintStore, Observation, ObservationSource, RecordId};

/// What a single modify event turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// A record was appended.
    Recorded(RecordId),
    /// Directory or store-owned file; nothing written on purpose.
    Skipped,
    /// Metadata or insert failure; logged and dropped.
    Dropped,
}

/// Identifies the store's own files so the watcher never observes them.
///
/// Only relevant when the database lives directly inside the watched
/// directory; every append would otherwise re-trigger the watcher.
#[derive(Debug, Clone)]
pub struct StoreGuard {
    db_name: String,
}

impl StoreGuard {
    pub fn new(db_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
        }
    }

    /// True for the database file itself and its SQLite sidecars.
    pub fn matches(&self, file_name: &str) -> bool {
        let Some(rest) = file_name.strip_prefix(self.db_name.as_str()) else {
            return false;
        };
        matches!(rest, "" | "-wal" | "-shm" | "-journal")
    }
}

/// Process a single modify event and append an observation record.
///
/// This function:
/// 1. Skips the store's own files and directories.
/// 2. Reads the file size first, so a file that vanishes before the
///    content read still gets a sentinel record with the size seen here.
/// 3. Fingerprints the content, substituting [`FINGERPRINT_ERROR`] when
///    the content cannot be read.
/// 4. Appends the record.
///
/// Blocking; callers run it on a blocking task.
pub fn process_modify_event(
    store: &FingerprintStore,
    path: &Path,
    guard: Option<&StoreGuard>,
) -> EventOutcome {
    if let Some(guard) = guard {
        let own_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| guard.matches(n));
        if own_file {
            debug!(path = ?path, "ignoring store-owned file");
            return EventOutcome::Skipped;
        }
    }

    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            warn!(path = ?path, error = %err, "dropping event: could not read metadata");
            return EventOutcome::Dropped;
        }
    };

    if meta.is_dir() {
        debug!(path = ?path, "ignoring directory event");
        return EventOutcome::Skipped;
    }

    let fingerprint = match compute_file_fingerprint(path) {
        Ok(digest) => digest,
        Err(err) => {
            warn!(path = ?path, error = %err, "content unreadable; recording error sentinel");
            FINGERPRINT_ERROR.to_string()
        }
    };

    let obs = Observation::now(fingerprint, ObservationSource::LocalFile, meta.len());
    match store.append(&obs) {
        Ok(id) => {
            info!(
                record_id = id,
                path = ?path,
                size = obs.byte_size,
                fingerprint = %obs.fingerprint,
                "logged local file change"
            );
            EventOutcome::Recorded(id)
        }
        Err(err) => {
            warn!(path = ?path, error = %err, "failed to append observation record");
            EventOutcome::Dropped
        }
    }
}
