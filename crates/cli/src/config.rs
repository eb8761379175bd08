use anyhow::{Context, Result};
use dump_client::ClientConfig;
use dump_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings for every subcommand, read from an optional TOML file.
///
/// ```toml
/// [store]
/// root = "/data/bumble-db"
///
/// [client]
/// timeout_secs = 10
///
/// [scan]
/// per_location = 500
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub client: ClientConfig,
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Encounters collected at one location before moving on.
    pub per_location: usize,
    /// Pause after a failed request, in seconds.
    pub backoff_secs: u64,
    pub photo_workers: usize,
    pub max_photos_per_user: usize,
    /// Photos waiting for a download worker.
    pub photo_queue: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            per_location: 1000,
            backoff_secs: 60,
            photo_workers: 8,
            max_photos_per_user: 2,
            photo_queue: 16,
        }
    }
}

impl ScanConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }
}

impl AppConfig {
    /// Defaults, then `path` when given, then `BUMBLE_DB` / `BUMBLE_IMAGES`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(Self {
            store: config.store.with_env_overrides(),
            ..config
        })
    }
}
