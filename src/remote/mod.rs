// src/remote/mod.rs

//! Remote release polling.
//!
//! This module is responsible for:
//! - Talking to the release listing API for one configured project.
//! - Downloading each release asset and fingerprinting its content.
//! - Running the above on a fixed interval, forever.
//!
//! Network and parse failures are observations that did not happen, not
//! errors that stop the daemon.

pub mod api;
pub mod poller;

pub use api::{Release, ReleaseAsset, ReleaseClient, RemoteError};
pub use poller::{poll_once, spawn_poller};
