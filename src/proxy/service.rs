//! Main proxy service implementation
//!
//! `ProxyService` exposes the backend's `get`/`set` REST calls behind
//! `/api/upstash/{action}/{*key}?endpoint=<url>` so clients that cannot call
//! the backend directly (browser CORS, restricted networks) can still sync.
//!
//! ## Service Lifecycle
//!
//! ```rust,ignore
//! use kv_chunk_sync::proxy::{ProxyConfig, ProxyService};
//!
//! let service = ProxyService::new(ProxyConfig::default())?;
//! let router = service.into_router();
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```
//!
//! Every request is checked in the same order: endpoint allow-list, key
//! path, action, `Authorization`, body. Nothing reaches the network until
//! all of those pass.

use crate::domain::Action;
use crate::proxy::error_response::ErrorResponseExt;
use crate::proxy::forward::UpstreamForwarder;
use crate::proxy::headers::paths;
use crate::proxy::middleware_stack::ProxyMiddlewareStack;
use crate::proxy::request::{self, ProxyRequest};
use crate::proxy::{endpoint::EndpointPolicy, types::*};
use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{error, warn};

/// Forwarding proxy for the backend's REST interface
#[derive(Debug)]
pub struct ProxyService {
    policy: EndpointPolicy,
    forwarder: UpstreamForwarder,
    config: ProxyConfig,
}

impl ProxyService {
    /// Create a proxy service with its own HTTP client
    pub fn new(config: ProxyConfig) -> ProxyResult<Self> {
        let forwarder = UpstreamForwarder::new(config.request_timeout)?;
        Ok(Self::from_parts(config, forwarder))
    }

    /// Create a proxy service around an existing HTTP client
    pub fn with_client(config: ProxyConfig, client: reqwest::Client) -> Self {
        Self::from_parts(config, UpstreamForwarder::with_client(client))
    }

    fn from_parts(config: ProxyConfig, forwarder: UpstreamForwarder) -> Self {
        Self {
            policy: EndpointPolicy::new(config.trusted_domain_suffix.clone()),
            forwarder,
            config,
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Create an Axum router for the proxy service with middleware
    pub fn into_router(self) -> Router {
        let max_request_size = self.config.max_request_size;

        let router = Router::new()
            .route(paths::HEALTH, get(health_handler))
            .route(
                paths::PROXY_ROUTE,
                get(get_handler).post(post_handler).options(options_handler),
            )
            .fallback(fallback_handler)
            .with_state(Arc::new(self));

        ProxyMiddlewareStack::new(max_request_size).apply_to_router(router)
    }

    async fn forward_get(
        &self,
        request: &ProxyRequest,
        headers: &HeaderMap,
    ) -> ProxyResult<Response> {
        let authorization = request::authorization(headers)?;
        self.forwarder.get(request, authorization).await
    }

    async fn forward_set(
        &self,
        request: &ProxyRequest,
        headers: &HeaderMap,
        body: &[u8],
    ) -> ProxyResult<Response> {
        let authorization = request::authorization(headers)?;
        let value = request::set_value(headers, body)?;
        self.forwarder.set(request, authorization, &value).await
    }
}

/// `GET` only serves the `get` action
async fn get_handler(
    State(proxy): State<Arc<ProxyService>>,
    uri: Uri,
    headers: HeaderMap,
) -> ProxyResult<Response> {
    let request = ProxyRequest::parse(&uri, &proxy.policy)?;
    match request.action() {
        Some(Action::Get) => proxy.forward_get(&request, &headers).await,
        _ => Err(ProxyError::MethodNotAllowed {
            action: request.action_name().to_string(),
        }),
    }
}

/// `POST` serves `set`, with `get` accepted as an alias
async fn post_handler(
    State(proxy): State<Arc<ProxyService>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ProxyResult<Response> {
    let request = ProxyRequest::parse(&uri, &proxy.policy)?;
    match request.action() {
        Some(Action::Get) => proxy.forward_get(&request, &headers).await,
        Some(Action::Set) => proxy.forward_set(&request, &headers, &body).await,
        None => Err(ProxyError::ForbiddenAction {
            action: request.action_name().to_string(),
        }),
    }
}

async fn options_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "body": "OK" }))
}

/// Health check handler
async fn health_handler() -> &'static str {
    "OK"
}

async fn fallback_handler(uri: Uri) -> ProxyError {
    ProxyError::NotFound(uri.path().to_string())
}

/// Error conversion for Axum responses using the standard envelope
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Proxy request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Proxy request rejected");
        }

        self.to_error_envelope().into_response_with_status(status)
    }
}
