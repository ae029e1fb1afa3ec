// src/store/record.rs

//! The observation record model.

use chrono::Local;

/// Identifier assigned to a record by the store on insert.
pub type RecordId = i64;

/// Sentinel stored in place of a digest when content could not be read.
pub const FINGERPRINT_ERROR: &str = "Error";

/// Marker stored in the `binary_type` column for locally watched files.
pub const LOCAL_LABEL: &str = "binary";

/// Wall-clock format for `analysis_timestamp`: `Sun Aug 23 14:03:07 2026`.
/// Existing databases hold exactly this shape, so it must not change.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Where an observed byte stream came from.
///
/// The persisted table flattens this into the `binary_type` column: local
/// files store the fixed marker `"binary"`, remote assets store their
/// reported file name. The enum keeps the two apart everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationSource {
    /// A file in the watched local directory.
    LocalFile,
    /// A downloadable asset attached to a remote release.
    RemoteAsset { name: String },
}

impl ObservationSource {
    /// Value stored in the `binary_type` column.
    pub fn label(&self) -> &str {
        match self {
            ObservationSource::LocalFile => LOCAL_LABEL,
            ObservationSource::RemoteAsset { name } => name,
        }
    }
}

/// One fingerprinted file or asset, ready to be appended to the store.
///
/// Records are immutable once written; the store assigns the id.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Hex SHA-256 digest of the observed content, or [`FINGERPRINT_ERROR`].
    pub fingerprint: String,
    /// Origin of the observed bytes.
    pub source: ObservationSource,
    /// Size in bytes, as reported by the filesystem or the download.
    pub byte_size: u64,
    /// Human-readable wall-clock capture time.
    pub observed_at: String,
}

impl Observation {
    /// Build an observation stamped with the current wall-clock time.
    pub fn now(fingerprint: impl Into<String>, source: ObservationSource, byte_size: u64) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            source,
            byte_size,
            observed_at: current_timestamp(),
        }
    }
}

/// Current local time rendered in [`TIMESTAMP_FORMAT`].
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
