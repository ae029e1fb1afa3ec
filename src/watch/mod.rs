// src/watch/mod.rs

//! Local file watching.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) over one
//!   directory, non-recursively.
//! - Turning each content modification into an observation record.
//!
//! It does **not** know about the remote poller; both pipelines only meet
//! at the fingerprint store.

pub mod event_handler;
pub mod watcher;

pub use event_handler::{EventOutcome, StoreGuard, process_modify_event};
pub use watcher::{WatcherHandle, spawn_watcher};
