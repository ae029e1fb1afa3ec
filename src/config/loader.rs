// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::errors::Result;

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; it does **not** perform
/// semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: ConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks basic sanity of the `[remote]` section.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Resolve the effective configuration for startup.
///
/// - With an explicit path, the file must exist and validate.
/// - Without one, `Hashwatch.toml` in the current working directory is
///   used when present; otherwise the built-in defaults apply (watch the
///   current directory, store in `hashwatch.db`, no remote polling).
pub fn load_or_default(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_and_validate(path),
        None => {
            let default = default_config_path();
            if default.exists() {
                load_and_validate(default)
            } else {
                debug!("no Hashwatch.toml found; using built-in defaults");
                Ok(ConfigFile::default())
            }
        }
    }
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Hashwatch.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Hashwatch.toml")
}
