// src/config/validate.rs

use crate::config::model::{ConfigFile, RemoteSection};
use crate::errors::{HashwatchError, Result};

/// Run basic semantic validation over a loaded configuration.
///
/// Checks:
/// - `[watch].dir` and `[store].path` are non-empty,
/// - `[remote].project` looks like `owner/name`,
/// - `[remote].api_url` is an http(s) URL,
/// - `[remote].interval_secs` is at least one second.
///
/// It deliberately does not check that the watched directory exists;
/// that surfaces with a clearer error when the watcher starts.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    if cfg.watch.dir.as_os_str().is_empty() {
        return Err(HashwatchError::ConfigError(
            "[watch].dir must not be empty".to_string(),
        ));
    }

    if cfg.store.path.as_os_str().is_empty() {
        return Err(HashwatchError::ConfigError(
            "[store].path must not be empty".to_string(),
        ));
    }

    if let Some(remote) = &cfg.remote {
        validate_remote(remote)?;
    }

    Ok(())
}

fn validate_remote(remote: &RemoteSection) -> Result<()> {
    match remote.project.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {}
        _ => {
            return Err(HashwatchError::ConfigError(format!(
                "[remote].project must be of the form owner/name (got '{}')",
                remote.project
            )));
        }
    }

    if !remote.api_url.starts_with("http://") && !remote.api_url.starts_with("https://") {
        return Err(HashwatchError::ConfigError(format!(
            "[remote].api_url must be an http(s) URL (got '{}')",
            remote.api_url
        )));
    }

    if remote.interval_secs == 0 {
        return Err(HashwatchError::ConfigError(
            "[remote].interval_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}
