use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GEOCODE_URL: &str = "https://www.mapdevelopers.com/data.php?operation=geocode";
pub const DEFAULT_GEOCODE_REFERER: &str = "https://www.mapdevelopers.com/geocode_tool.php";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Scheme prepended to protocol-relative photo URLs (`//cdn...`).
    pub photo_scheme: String,
    pub geocode_url: String,
    pub geocode_referer: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            photo_scheme: "https:".to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            geocode_referer: DEFAULT_GEOCODE_REFERER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder().timeout(self.timeout()).build()
    }
}
