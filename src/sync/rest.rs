//! HTTP backend speaking the Upstash-style REST protocol
//!
//! Requests go straight to the backend endpoint, or through a forwarding
//! proxy when one is configured:
//!
//! - direct: `GET {endpoint}/get/{key}`, `POST {endpoint}/set/{key}`
//! - proxied: `{proxy}/api/upstash/{action}/{key}?endpoint={endpoint}`

use crate::domain::{Action, BackendEndpoint, BearerToken, ProxyUrl, PROXY_BASE_PATH};
use crate::sync::backend::KvBackend;
use crate::sync::types::{GetResponse, SetRequest, SyncError, SyncResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, error, info};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// [`KvBackend`] over HTTP
#[derive(Clone)]
pub struct RestBackend {
    client: reqwest::Client,
    endpoint: BackendEndpoint,
    authorization: HeaderValue,
    proxy_url: Option<ProxyUrl>,
}

impl RestBackend {
    /// Create a backend with a default HTTP client
    pub fn new(endpoint: BackendEndpoint, token: &BearerToken) -> SyncResult<Self> {
        Self::with_client(reqwest::Client::new(), endpoint, token)
    }

    /// Create a backend that reuses an existing HTTP client
    pub fn with_client(
        client: reqwest::Client,
        endpoint: BackendEndpoint,
        token: &BearerToken,
    ) -> SyncResult<Self> {
        let mut authorization = HeaderValue::from_str(&token.header_value())
            .map_err(|_| SyncError::InvalidConfig("api key is not a valid header value".into()))?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            endpoint,
            authorization,
            proxy_url: None,
        })
    }

    /// Route every request through the forwarding proxy at `proxy_url`
    pub fn via_proxy(mut self, proxy_url: ProxyUrl) -> Self {
        self.proxy_url = Some(proxy_url);
        self
    }

    pub fn endpoint(&self) -> &BackendEndpoint {
        &self.endpoint
    }

    pub fn proxy_url(&self) -> Option<&ProxyUrl> {
        self.proxy_url.as_ref()
    }

    /// Headers sent with every request
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// URL for `action` on `key`; the key is percent-encoded as one path segment
    pub fn url(&self, action: Action, key: &str) -> String {
        let segment = format!("{action}/{}", urlencoding::encode(key));
        match &self.proxy_url {
            None => format!("{}/{segment}", self.endpoint),
            Some(proxy) => format!(
                "{proxy}{PROXY_BASE_PATH}/{segment}?endpoint={}",
                urlencoding::encode(self.endpoint.as_ref())
            ),
        }
    }
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("endpoint", &self.endpoint)
            .field("proxy_url", &self.proxy_url)
            .finish_non_exhaustive()
    }
}

/// Turn a non-success response into a [`SyncError::Backend`]
async fn backend_error(operation: Action, key: &str, response: reqwest::Response) -> SyncError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    SyncError::Backend {
        operation,
        key: key.to_string(),
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    }
}

#[async_trait]
impl KvBackend for RestBackend {
    async fn get(&self, key: &str) -> SyncResult<Option<String>> {
        let url = self.url(Action::Get, key);
        let response = self.client.get(&url).headers(self.headers()).send().await?;
        let status = response.status();

        debug!(key, url = %url, status = status.as_u16(), "GET");

        if !status.is_success() {
            return Err(backend_error(Action::Get, key, response).await);
        }

        let body = response.text().await?;
        let value = serde_json::from_str::<GetResponse>(&body)?.into_value();

        if let Some(value) = &value {
            debug!(
                key,
                char_len = value.chars().count(),
                byte_len = value.len(),
                "GET result"
            );
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        let url = self.url(Action::Set, key);
        let body = serde_json::to_string(&SetRequest { value })?;
        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        let status = response.status();

        debug!(
            key,
            char_len = value.chars().count(),
            byte_len = value.len(),
            url = %url,
            status = status.as_u16(),
            "SET"
        );

        if !status.is_success() {
            return Err(backend_error(Action::Set, key, response).await);
        }

        Ok(())
    }

    async fn check(&self, key: &str) -> bool {
        let url = self.url(Action::Get, key);
        match self.client.get(&url).headers(self.headers()).send().await {
            Ok(response) => {
                let status = response.status();
                info!(status = status.as_u16(), url = %url, "Backend check");
                status.is_success()
            }
            Err(e) => {
                error!(url = %url, error = %e, "Failed to check backend");
                false
            }
        }
    }
}
