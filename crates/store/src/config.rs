use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DB_ENV: &str = "BUMBLE_DB";
pub const IMAGES_ENV: &str = "BUMBLE_IMAGES";

/// Where the store keeps its records and downloaded photos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding profile, photo and location records.
    pub root: PathBuf,
    /// Directory holding photo bytes (`<id>.jpg`).
    pub images_path: PathBuf,
    /// Records buffered between a cursor's reader thread and its consumer.
    pub cursor_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./bumble-db"),
            images_path: PathBuf::from("./photos"),
            cursor_buffer: 64,
        }
    }
}

impl StoreConfig {
    /// Apply `BUMBLE_DB` / `BUMBLE_IMAGES` when set and non-empty.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(root) = non_empty_env(DB_ENV) {
            self.root = PathBuf::from(root);
        }
        if let Some(images) = non_empty_env(IMAGES_ENV) {
            self.images_path = PathBuf::from(images);
        }
        self
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"root":"/data/db"}"#).unwrap();
        assert_eq!(config.root, PathBuf::from("/data/db"));
        assert_eq!(config.images_path, PathBuf::from("./photos"));
        assert_eq!(config.cursor_buffer, 64);
    }
}
