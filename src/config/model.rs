// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from `Hashwatch.toml`.
///
/// ```toml
/// [watch]
/// dir = "/srv/builds"
///
/// [store]
/// path = "/var/lib/hashwatch/hashwatch.db"
///
/// [remote]
/// project = "ggml-org/llama.cpp"
/// interval_secs = 3600
/// ```
///
/// Every section is optional. Without `[remote]` the release poller stays
/// off and only the local watcher runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub remote: Option<RemoteSection>,
}

/// `[watch]` section: the local directory to observe.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory whose direct entries are observed. Non-recursive; changes
    /// under subdirectories are not seen.
    #[serde(default = "default_watch_dir")]
    pub dir: PathBuf,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dir: default_watch_dir(),
        }
    }
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from(".")
}

/// `[store]` section: where observation records live.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// SQLite database file. Created (parent directories included) on
    /// first start.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("hashwatch.db")
}

/// `[remote]` section: the release feed to poll.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSection {
    /// Project identifier on the release host, `owner/name`.
    pub project: String,

    /// Base URL of the listing API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token for the listing request. Falls back to the
    /// `HASHWATCH_TOKEN` environment variable when unset.
    #[serde(default)]
    pub token: Option<String>,

    /// Seconds between poll ticks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_interval_secs() -> u64 {
    3600
}

impl RemoteSection {
    /// Effective bearer token: the config value wins over the
    /// `HASHWATCH_TOKEN` environment variable.
    pub fn bearer_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var("HASHWATCH_TOKEN").ok())
    }

    /// Poll period as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
