// src/supervisor.rs

//! Process lifecycle: owns both pipeline tasks and the termination wait.

use std::future::Future;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::watch::WatcherHandle;

/// Owns the long-lived pipeline tasks and decides when the process ends.
///
/// The two pipelines run independently until an interrupt arrives, then
/// shut down in order:
/// 1. the watch subscription stops and in-flight events finish,
/// 2. the poll loop is aborted (a tick in progress is abandoned).
pub struct Supervisor {
    watcher: Option<WatcherHandle>,
    poller: Option<JoinHandle<()>>,
}

impl Supervisor {
    pub fn new(watcher: Option<WatcherHandle>, poller: Option<JoinHandle<()>>) -> Self {
        Self { watcher, poller }
    }

    /// Block until Ctrl+C (or SIGTERM on unix), then shut down in order.
    pub async fn run(self) {
        self.run_until(terminate_signal()).await;
    }

    /// Like [`Supervisor::run`], but with an injectable shutdown trigger.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        shutdown.await;

        if let Some(watcher) = self.watcher {
            watcher.shutdown().await;
            info!("watch pipeline stopped");
        }

        if let Some(poller) = self.poller {
            poller.abort();
            info!("release poller stopped");
        }
    }
}

/// Resolves when the process is asked to stop.
async fn terminate_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C; shutting down"),
        () = terminate => info!("received SIGTERM; shutting down"),
    }
}
