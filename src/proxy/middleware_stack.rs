//! Middleware stack builder for clean composition

use crate::domain::config_types::RequestSizeLimit;
use crate::proxy::middleware::*;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use tower_http::limit::RequestBodyLimitLayer;

/// Builder for composing the proxy middleware stack
pub struct ProxyMiddlewareStack {
    max_request_size: RequestSizeLimit,
}

impl ProxyMiddlewareStack {
    pub fn new(max_request_size: RequestSizeLimit) -> Self {
        Self { max_request_size }
    }

    /// Apply the complete middleware stack to a router
    ///
    /// Outer to inner: request ID, logging, body size limit. Oversized
    /// bodies are rejected with 413 before any handler runs.
    pub fn apply_to_router<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.max_request_size.into_inner()))
            .layer(from_fn(logging_middleware))
            .layer(from_fn(request_id_middleware))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::headers::X_REQUEST_ID;
    use axum::{body::Body, http::StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        async fn handler(body: axum::body::Bytes) -> String {
            body.len().to_string()
        }

        let router = Router::new().route("/test", axum::routing::post(handler));
        ProxyMiddlewareStack::new(RequestSizeLimit::try_new(16).unwrap()).apply_to_router(router)
    }

    #[tokio::test]
    async fn test_middleware_stack_adds_request_id() {
        let response = router()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/test")
                    .body(Body::from("small"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_middleware_stack_rejects_large_bodies() {
        let response = router()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/test")
                    .body(Body::from("x".repeat(64)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }
}
