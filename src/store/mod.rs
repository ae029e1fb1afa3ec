// src/store/mod.rs

//! Observation record model and its SQLite persistence.

pub mod record;
pub mod sqlite;

pub use record::{
    FINGERPRINT_ERROR, LOCAL_LABEL, Observation, ObservationSource, RecordId, TIMESTAMP_FORMAT,
    current_timestamp,
};
pub use sqlite::{FingerprintStore, StoreError, StoreResult};
