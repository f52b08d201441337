//! Middleware implementations for the proxy service

use crate::proxy::types::*;
use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Request ID middleware - ensures every request has a unique ID for tracing
///
/// A caller-supplied ID is kept when it parses as a UUID; otherwise a fresh
/// v7 ID is generated.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::now_v7);

    // Hyphenated UUIDs are plain ASCII
    let header_value = HeaderValue::from_str(&request_id.to_string()).ok();

    if let Some(value) = header_value.clone() {
        request.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let mut response = next.run(request).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Logging middleware - logs request/response details with timing
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    info!(
        request_id = request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let response = next.run(request).await;
    let duration = start.elapsed();

    info!(
        request_id = request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware::from_fn;
    use tower::ServiceExt;

    fn echo_request_id() -> axum::Router {
        async fn handler(request: Request) -> Response {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("missing")
                .to_string();
            Response::builder()
                .status(StatusCode::OK)
                .body(Body::from(request_id))
                .unwrap()
        }

        axum::Router::new()
            .route("/test", axum::routing::get(handler))
            .layer(from_fn(logging_middleware))
            .layer(from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn test_request_id_generation() {
        let request = Request::builder()
            .method("GET")
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        let response = echo_request_id().oneshot(request).await.unwrap();
        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        let uuid = Uuid::parse_str(&header).unwrap();
        assert_eq!(uuid.get_version_num(), 7);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, header.as_bytes());
    }

    #[tokio::test]
    async fn test_existing_request_id_is_kept() {
        let existing = Uuid::now_v7().to_string();
        let request = Request::builder()
            .uri("/test")
            .header(REQUEST_ID_HEADER, &existing)
            .body(Body::empty())
            .unwrap();

        let response = echo_request_id().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], existing.as_str());
    }

    #[tokio::test]
    async fn test_invalid_request_id_is_replaced() {
        let request = Request::builder()
            .uri("/test")
            .header(REQUEST_ID_HEADER, "not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let response = echo_request_id().oneshot(request).await.unwrap();
        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert_ne!(header, "not-a-uuid");
        assert!(Uuid::parse_str(header).is_ok());
    }
}
