// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod logging;
pub mod remote;
pub mod store;
pub mod supervisor;
pub mod watch;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::config::model::ConfigFile;
use crate::errors::{HashwatchError, Result};
use crate::remote::{ReleaseClient, poll_once, spawn_poller};
use crate::store::FingerprintStore;
use crate::supervisor::Supervisor;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the fingerprint store
/// - the local watch pipeline
/// - the remote poll pipeline (when configured)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let store = FingerprintStore::open(&cfg.store.path)?;
    let records = store.record_count()?;
    info!(records, "fingerprint store opened");

    // --once: a single poll tick, no watcher, then exit.
    if args.once {
        let Some(remote_cfg) = &cfg.remote else {
            return Err(HashwatchError::ConfigError(
                "--once needs a [remote] section in the config".to_string(),
            ));
        };
        let client = ReleaseClient::new(remote_cfg)?;
        let appended = poll_once(&client, &store).await;
        info!(appended, "single poll finished");
        return Ok(());
    }

    let watcher = watch::spawn_watcher(&cfg.watch.dir, store.clone())?;

    let poller = match &cfg.remote {
        Some(remote_cfg) => {
            let client = ReleaseClient::new(remote_cfg)?;
            Some(spawn_poller(client, store.clone(), remote_cfg.interval()))
        }
        None => {
            info!("no [remote] section configured; release polling disabled");
            None
        }
    };

    Supervisor::new(Some(watcher), poller).run().await;
    Ok(())
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("hashwatch dry-run");
    println!("  watch.dir  = {:?}", cfg.watch.dir);
    println!("  store.path = {:?}", cfg.store.path);
    println!();

    match &cfg.remote {
        Some(remote) => {
            println!("  remote.project       = {}", remote.project);
            println!("  remote.api_url       = {}", remote.api_url);
            println!("  remote.interval_secs = {}", remote.interval_secs);
            println!(
                "  remote.token         = {}",
                if remote.bearer_token().is_some() {
                    "<set>"
                } else {
                    "<not set>"
                }
            );
        }
        None => println!("  remote: not configured (release polling disabled)"),
    }

    debug!("dry-run complete (nothing started)");
}
