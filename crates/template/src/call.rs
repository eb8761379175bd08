use crate::error::Result;
use crate::node::DocumentNode;
use crate::substitute::{substitute, substitutions, SubstitutionSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Headers the HTTP client computes itself; replaying the captured values
/// would contradict the rebuilt body or the negotiated encoding.
const CLIENT_MANAGED_HEADERS: &[&str] = &["accept-encoding", "content-length", "host"];

/// Vote value the service uses for "not interested".
pub const DISLIKE_VOTE: i64 = 3;

/// A request exactly as it was recorded from the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedCall {
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub post_body: String,
}

/// Everything needed to send one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A captured call with its body parsed once, ready to be replayed with
/// different field values.
#[derive(Debug, Clone, PartialEq)]
pub struct CallTemplate {
    call: CapturedCall,
    body: DocumentNode,
}

impl CallTemplate {
    /// Fails when the captured body is not valid JSON, including an empty
    /// or blank body.
    pub fn from_captured(call: CapturedCall) -> Result<Self> {
        let body = DocumentNode::parse(&call.post_body)?;
        Ok(Self { call, body })
    }

    pub fn captured(&self) -> &CapturedCall {
        &self.call
    }

    pub fn body(&self) -> &DocumentNode {
        &self.body
    }

    /// Rebuild the request with `subs` applied to the body.
    ///
    /// With no substitutions the captured body is sent verbatim.
    pub fn build_request(&self, subs: &SubstitutionSet) -> Result<PreparedRequest> {
        let body = if subs.is_empty() {
            self.call.post_body.clone().into_bytes()
        } else {
            substitute(&self.body, subs).encode()?.into_bytes()
        };

        let headers = self
            .call
            .headers
            .iter()
            .filter(|(name, _)| replayable_header(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(PreparedRequest {
            method: "POST",
            url: self.call.url.clone(),
            headers,
            body,
        })
    }
}

fn replayable_header(name: &str) -> bool {
    // HTTP/2 pseudo-headers (`:authority`, ...) show up in HAR exports.
    !name.starts_with(':')
        && !CLIENT_MANAGED_HEADERS
            .iter()
            .any(|managed| managed.eq_ignore_ascii_case(name))
}

/// The three service operations the scanner replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    GetEncounters,
    Dislike,
    UpdateLocation,
}

impl CallKind {
    pub const ALL: [CallKind; 3] = [Self::UpdateLocation, Self::GetEncounters, Self::Dislike];

    /// URL fragment identifying the call in a browser capture.
    pub const fn url_marker(self) -> &'static str {
        match self {
            Self::GetEncounters => "unified-api.phtml?SERVER_GET_ENCOUNTERS",
            Self::Dislike => "unified-api.phtml?SERVER_ENCOUNTERS_VOTE",
            Self::UpdateLocation => "unified-api.phtml?SERVER_UPDATE_LOCATION",
        }
    }

    /// What to do in the browser so the capture contains this call.
    pub const fn capture_hint(self) -> &'static str {
        match self {
            Self::GetEncounters => "Missing encounters request.",
            Self::Dislike => "Missing dislike request. Make sure to swipe someone.",
            Self::UpdateLocation => {
                "Missing location update request. Try updating your location in settings \
                 and allowing your browser to provide your location to the website."
            }
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GetEncounters => "get_encounters",
            Self::Dislike => "dislike",
            Self::UpdateLocation => "update_location",
        };
        f.write_str(name)
    }
}

/// The captured calls as stored in the api file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCalls {
    pub get_encounters: CapturedCall,
    pub dislike: CapturedCall,
    pub update_location: CapturedCall,
}

impl ApiCalls {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parsed templates for the three operations.
#[derive(Debug, Clone)]
pub struct ApiTemplates {
    get_encounters: CallTemplate,
    dislike: CallTemplate,
    update_location: CallTemplate,
}

impl ApiTemplates {
    pub fn load(calls: ApiCalls) -> Result<Self> {
        let templates = Self {
            get_encounters: CallTemplate::from_captured(calls.get_encounters)?,
            dislike: CallTemplate::from_captured(calls.dislike)?,
            update_location: CallTemplate::from_captured(calls.update_location)?,
        };
        log::debug!("Loaded captured call templates");
        Ok(templates)
    }

    pub fn encounters_request(&self) -> Result<PreparedRequest> {
        self.get_encounters.build_request(&SubstitutionSet::new())
    }

    pub fn dislike_request(&self, user_id: &str) -> Result<PreparedRequest> {
        self.dislike.build_request(&substitutions([
            ("person_id", DocumentNode::from(user_id)),
            ("vote", DocumentNode::from(DISLIKE_VOTE)),
        ]))
    }

    pub fn update_location_request(&self, lat: f64, lon: f64) -> Result<PreparedRequest> {
        self.update_location
            .build_request(&substitutions([("latitude", lat), ("longitude", lon)]))
    }
}
