use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use reqwest::header::REFERER;
use reqwest::Client;
use serde::Deserialize;

/// Looks up coordinates for place names through a public geocoding form.
#[derive(Debug, Clone)]
pub struct Geocoder {
    http: Client,
    url: String,
    referer: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    data: Option<GeocodeData>,
}

#[derive(Debug, Deserialize)]
struct GeocodeData {
    lat: f64,
    lng: f64,
}

impl Geocoder {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            url: config.geocode_url.clone(),
            referer: config.geocode_referer.clone(),
        })
    }

    /// `(lat, lon)` of `name`.
    pub async fn lookup(&self, name: &str) -> Result<(f64, f64)> {
        let bytes = self
            .http
            .post(&self.url)
            .header(REFERER, &self.referer)
            .form(&[("address", name)])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        decode_geocode(&bytes, name)
    }
}

fn decode_geocode(bytes: &[u8], name: &str) -> Result<(f64, f64)> {
    let response: GeocodeResponse = serde_json::from_slice(bytes)?;
    match response.data {
        Some(data) => Ok((data.lat, data.lng)),
        None => Err(ClientError::ServerError(format!(
            "No coordinates for {name}"
        ))),
    }
}
