use crate::config::ClientConfig;
use crate::error::Result;
use dump_protocol::Photo;
use reqwest::Client;

/// Downloads profile photos from the CDN. Needs no session.
#[derive(Debug, Clone)]
pub struct PhotoFetcher {
    http: Client,
    scheme: String,
}

impl PhotoFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            scheme: config.photo_scheme.clone(),
        })
    }

    /// Bytes of the photo's large version.
    pub async fn fetch(&self, photo: &Photo) -> Result<Vec<u8>> {
        let url = photo_url(&self.scheme, &photo.large_url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let data = response.bytes().await?;
        log::debug!("Downloaded photo {} ({} bytes)", photo.id, data.len());
        Ok(data.to_vec())
    }
}

/// Photo URLs come protocol-relative (`//cdn/...`).
fn photo_url(scheme: &str, url: &str) -> String {
    if url.starts_with("//") {
        format!("{scheme}{url}")
    } else {
        url.to_string()
    }
}
