//! Import of browser HAR captures.
//!
//! The user records a HAR file while using the web client (changing
//! location, browsing encounters and swiping once); the three service calls
//! are picked out of it by URL.

use crate::call::{ApiCalls, CallKind, CapturedCall};
use crate::error::{Result, TemplateError};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct Har {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    #[serde(default)]
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
struct HarEntry {
    request: HarRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarRequest {
    url: String,
    #[serde(default)]
    headers: Vec<HarHeader>,
    #[serde(default)]
    post_data: Option<HarPostData>,
}

#[derive(Debug, Deserialize)]
struct HarHeader {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct HarPostData {
    #[serde(default)]
    text: String,
}

/// Extract the captured calls from HAR JSON text. When a call appears more
/// than once, the last capture wins.
pub fn api_from_har(text: &str) -> Result<ApiCalls> {
    let har: Har = serde_json::from_str(text)
        .map_err(|err| TemplateError::InvalidHar(err.to_string()))?;

    let mut found: HashMap<CallKind, CapturedCall> = HashMap::new();
    for entry in har.log.entries {
        let request = entry.request;
        let Some(kind) = classify(&request.url) else {
            continue;
        };
        log::debug!("Captured {kind} call: {}", request.url);
        let call = CapturedCall {
            url: request.url,
            headers: request
                .headers
                .into_iter()
                .map(|header| (header.name, header.value))
                .collect(),
            post_body: request.post_data.map(|data| data.text).unwrap_or_default(),
        };
        found.insert(kind, call);
    }

    let missing: Vec<CallKind> = CallKind::ALL
        .into_iter()
        .filter(|kind| !found.contains_key(kind))
        .collect();
    if !missing.is_empty() {
        return Err(TemplateError::MissingCalls(missing));
    }

    let mut take = |kind: CallKind| found.remove(&kind).unwrap_or_default();
    Ok(ApiCalls {
        get_encounters: take(CallKind::GetEncounters),
        dislike: take(CallKind::Dislike),
        update_location: take(CallKind::UpdateLocation),
    })
}

fn classify(url: &str) -> Option<CallKind> {
    CallKind::ALL
        .into_iter()
        .find(|kind| url.contains(kind.url_marker()))
}
