use crate::config::ClientConfig;
use crate::encounters::decode_encounters;
use crate::error::{ClientError, Result};
use chrono::Utc;
use dump_protocol::User;
use dump_template::{ApiTemplates, PreparedRequest};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};

/// Replays the captured calls against the dating service.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct DumpClient {
    http: Client,
    api: ApiTemplates,
}

impl DumpClient {
    pub fn new(api: ApiTemplates, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            api,
        })
    }

    /// Next page of profiles around the current location.
    pub async fn get_encounters(&self) -> Result<Vec<User>> {
        let bytes = self.send(self.api.encounters_request()?).await?;
        let users = decode_encounters(&bytes, Utc::now())?;
        log::debug!("Received {} encounters", users.len());
        Ok(users)
    }

    pub async fn dislike(&self, user_id: &str) -> Result<()> {
        self.send(self.api.dislike_request(user_id)?).await?;
        Ok(())
    }

    pub async fn update_location(&self, lat: f64, lon: f64) -> Result<()> {
        self.send(self.api.update_location_request(lat, lon)?)
            .await?;
        log::debug!("Moved to {lat:.4},{lon:.4}");
        Ok(())
    }

    async fn send(&self, request: PreparedRequest) -> Result<Vec<u8>> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|err| {
            ClientError::InvalidHeader {
                name: ":method".to_string(),
                reason: err.to_string(),
            }
        })?;
        let headers = header_map(&request.headers)?;
        log::trace!("{} {}", request.method, request.url);
        let response = self
            .http
            .request(method, &request.url)
            .headers(headers)
            .body(request.body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let invalid = |reason: String| ClientError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| invalid(err.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|err| invalid(err.to_string()))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}
