//! Upstream forwarding
//!
//! Calls the backend's REST interface on behalf of a proxy caller and relays
//! whatever comes back, status and body, without interpretation.

use crate::domain::Action;
use crate::proxy::headers::{content_types, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use crate::proxy::request::ProxyRequest;
use crate::proxy::types::{ProxyError, ProxyResult, JSON_UTF8};
use crate::sync::types::SetRequest;
use axum::response::{IntoResponse, Response};
use http::HeaderValue;
use std::time::Duration;
use tracing::info;

/// HTTP client used to reach the backend
#[derive(Clone, Debug)]
pub struct UpstreamForwarder {
    client: reqwest::Client,
}

impl UpstreamForwarder {
    pub fn new(timeout: Duration) -> ProxyResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Relay a `get` for the request's key
    pub async fn get(
        &self,
        request: &ProxyRequest,
        authorization: HeaderValue,
    ) -> ProxyResult<Response> {
        let target_url = request.target_url(Action::Get);
        let upstream = self
            .client
            .get(&target_url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, content_types::JSON)
            .send()
            .await?;

        relay(&target_url, upstream).await
    }

    /// Relay a `set` for the request's key, re-wrapping the value as
    /// `{"value": ...}`
    pub async fn set(
        &self,
        request: &ProxyRequest,
        authorization: HeaderValue,
        value: &str,
    ) -> ProxyResult<Response> {
        let target_url = request.target_url(Action::Set);
        let body = serde_json::to_vec(&SetRequest { value })
            .map_err(|e| ProxyError::Internal(e.to_string()))?;
        let upstream = self
            .client
            .post(&target_url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, content_types::JSON)
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(body)
            .send()
            .await?;

        relay(&target_url, upstream).await
    }
}

/// Build the proxy response from an upstream response, keeping its status
/// and body verbatim
async fn relay(target_url: &str, upstream: reqwest::Response) -> ProxyResult<Response> {
    let status = upstream.status();
    info!(
        target_url,
        status = status.as_u16(),
        status_text = status.canonical_reason().unwrap_or(""),
        "Upstream responded"
    );

    let body = upstream.bytes().await?;
    Ok((
        status,
        [(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
        body,
    )
        .into_response())
}
