//! Application-level configuration loading: score floor and archive location.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    dao::archive_store::DEFAULT_ARCHIVE_KEY,
    state::store::{DEFAULT_MINIMUM_SCORE, StoreOptions},
};

/// Default location on disk where the ledger looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "KABOO_LEDGER_CONFIG_PATH";
/// Directory holding the archive file when none is configured.
const DEFAULT_ARCHIVE_DIR: &str = "data";
/// Capacity of the change-event broadcast channel.
const DEFAULT_EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Floor applied to every explicit score update.
    pub minimum_score: i32,
    /// Directory used by the file-backed archive store.
    pub archive_dir: PathBuf,
    /// Logical key the archive is stored under.
    pub archive_key: String,
    /// Buffer size of the change-event channel.
    pub event_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        minimum_score = config.minimum_score,
                        archive_dir = %config.archive_dir.display(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document; omitted fields keep their default values.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Store options derived from this configuration.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            archive_key: self.archive_key.clone(),
            minimum_score: self.minimum_score,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    minimum_score: Option<i32>,
    archive_dir: Option<PathBuf>,
    archive_key: Option<String>,
    event_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            minimum_score: value.minimum_score.unwrap_or(DEFAULT_MINIMUM_SCORE),
            archive_dir: value
                .archive_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_DIR)),
            archive_key: value
                .archive_key
                .filter(|key| !key.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ARCHIVE_KEY.into()),
            event_capacity: value
                .event_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
