//! Parsing of inbound proxy requests
//!
//! A proxy request lives at `/api/upstash/{action}/{key...}?endpoint=<url>`.
//! Key segments are percent-decoded one at a time so an encoded `/` inside a
//! segment stays part of that segment.

use crate::domain::{Action, BackendEndpoint, PROXY_BASE_PATH};
use crate::proxy::endpoint::EndpointPolicy;
use crate::proxy::types::{ProxyError, ProxyResult};
use axum::extract::Query;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Uri};
use serde::Deserialize;

/// Query string of a proxy request
#[derive(Debug, Default, Deserialize)]
pub struct EndpointQuery {
    pub endpoint: Option<String>,
}

/// Decoded key path, one entry per path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Parse a raw (still percent-encoded) `a/b/c` path tail
    pub fn from_raw(raw: &str) -> ProxyResult<Self> {
        let segments = raw
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(|decoded| decoded.into_owned())
                    .map_err(|_| ProxyError::InvalidKey(segment.to_string()))
            })
            .collect::<ProxyResult<Vec<_>>>()?;

        if segments.is_empty() {
            return Err(ProxyError::MissingKey);
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Segments re-encoded and joined with `/`
    pub fn encoded(&self) -> String {
        self.0
            .iter()
            .map(|segment| urlencoding::encode(segment))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// A validated proxy request, minus its body and credentials
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    action: String,
    key: KeyPath,
    endpoint: BackendEndpoint,
}

impl ProxyRequest {
    /// Validate the endpoint, then split the path into action and key
    pub fn parse(uri: &Uri, policy: &EndpointPolicy) -> ProxyResult<Self> {
        let query: Query<EndpointQuery> =
            Query::try_from_uri(uri).map_err(|e| ProxyError::InvalidEndpoint(e.body_text()))?;
        let endpoint = policy.validate(query.endpoint.as_deref())?;

        let tail = uri
            .path()
            .strip_prefix(PROXY_BASE_PATH)
            .unwrap_or(uri.path())
            .trim_start_matches('/');
        let (raw_action, raw_key) = tail.split_once('/').ok_or(ProxyError::MissingKey)?;
        let action = urlencoding::decode(raw_action)
            .map_err(|_| ProxyError::InvalidKey(raw_action.to_string()))?
            .into_owned();

        Ok(Self {
            action,
            key: KeyPath::from_raw(raw_key)?,
            endpoint,
        })
    }

    /// The action as written in the path
    pub fn action_name(&self) -> &str {
        &self.action
    }

    /// The action, if it is one the proxy knows
    pub fn action(&self) -> Option<Action> {
        self.action.parse().ok()
    }

    pub fn key(&self) -> &KeyPath {
        &self.key
    }

    pub fn endpoint(&self) -> &BackendEndpoint {
        &self.endpoint
    }

    /// Backend URL for `action` on this request's key
    pub fn target_url(&self, action: Action) -> String {
        format!("{}/{action}/{}", self.endpoint, self.key.encoded())
    }
}

/// The caller's `Authorization` header, relayed verbatim
pub fn authorization(headers: &HeaderMap) -> ProxyResult<HeaderValue> {
    let mut value = headers
        .get(AUTHORIZATION)
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or(ProxyError::MissingAuthorization)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Extract the value to store from a `set` request body
///
/// JSON bodies must be objects with a `value` member; strings pass through
/// and any other JSON value is re-serialized. Other content types are taken
/// as raw text, which must not be empty.
pub fn set_value(headers: &HeaderMap, body: &[u8]) -> ProxyResult<String> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains("application/json"));

    if is_json {
        let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
        return match parsed.as_ref().and_then(|json| json.get("value")) {
            Some(serde_json::Value::String(value)) => Ok(value.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(ProxyError::MissingValue),
        };
    }

    let text = std::str::from_utf8(body).map_err(|_| ProxyError::InvalidBodyEncoding)?;
    if text.is_empty() {
        return Err(ProxyError::EmptyBody);
    }
    Ok(text.to_string())
}
