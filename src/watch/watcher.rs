// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::store::FingerprintStore;
use crate::watch::event_handler::{StoreGuard, process_modify_event};

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping it stops file watching outright;
/// [`WatcherHandle::shutdown`] stops it and waits for events already picked
/// up to finish processing.
pub struct WatcherHandle {
    watcher: RecommendedWatcher,
    dispatcher: JoinHandle<()>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

impl WatcherHandle {
    /// Stop the subscription, then wait for in-flight event processing.
    ///
    /// Dropping the watcher drops the notify callback and with it the
    /// sending half of the event channel; the dispatch loop drains what is
    /// left and exits.
    pub async fn shutdown(self) {
        drop(self.watcher);
        if let Err(err) = self.dispatcher.await {
            warn!(error = %err, "watch dispatcher ended abnormally");
        }
    }
}

/// Spawn a filesystem watcher that observes the direct entries of `dir` and
/// appends an observation record for every content modification.
///
/// - Watching is non-recursive; changes under subdirectories are not seen.
/// - Only modify events are considered, and directory paths are skipped.
/// - When the store's database file lives inside `dir`, its files are
///   excluded so appends do not feed back into the watcher.
pub fn spawn_watcher(dir: impl Into<PathBuf>, store: FingerprintStore) -> Result<WatcherHandle> {
    let dir = dir.into();
    // Canonicalize once so we have a stable base path.
    let dir = dir.canonicalize().unwrap_or_else(|_| dir.clone());

    let guard = build_store_guard(&dir, &store);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        {
            let event_tx = event_tx.clone();
            move |res: notify::Result<Event>| {
                match res {
                    Ok(event) => {
                        if let Err(err) = event_tx.send(event) {
                            // We can't log via tracing here easily, so fallback to stderr.
                            eprintln!("hashwatch: failed to forward notify event: {err}");
                        }
                    }
                    Err(err) => {
                        eprintln!("hashwatch: file watch error: {err}");
                    }
                }
            }
        },
        Config::default(),
    )?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching directory {dir:?}"))?;

    info!("file watcher started on {:?} (non-recursive)", dir);

    // Async task that consumes notify events and fans each changed path out
    // to a blocking task that hashes and appends.
    let dispatcher = tokio::spawn(async move {
        let mut in_flight: JoinSet<()> = JoinSet::new();

        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            if !matches!(event.kind, EventKind::Modify(_)) {
                continue;
            }

            for path in event.paths {
                let store = store.clone();
                let guard = guard.clone();
                in_flight.spawn_blocking(move || {
                    process_modify_event(&store, &path, guard.as_ref());
                });
            }

            // Reap finished tasks without blocking the dispatch loop.
            while in_flight.try_join_next().is_some() {}
        }

        // Subscription stopped; finish whatever is still hashing or writing.
        while in_flight.join_next().await.is_some() {}
        debug!("watch dispatcher finished");
    });

    Ok(WatcherHandle {
        watcher,
        dispatcher,
    })
}

/// Build the self-observation guard when the store file sits in `dir`.
fn build_store_guard(dir: &Path, store: &FingerprintStore) -> Option<StoreGuard> {
    let store_path = store.path()?;
    let canonical = store_path.canonicalize().ok()?;
    if canonical.parent() != Some(dir) {
        return None;
    }
    let name = canonical.file_name()?.to_str()?.to_string();
    debug!(file = %name, "store lives inside the watched directory; its files are ignored");
    Some(StoreGuard::new(name))
}
