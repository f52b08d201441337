//! Unified error response handling for the proxy service
//!
//! Every proxy-generated failure is a JSON envelope `{"error": true, "msg": ...}`.
//! The request ID header is added by the middleware stack, not here.

use crate::proxy::types::ProxyError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Standard error response format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: bool,
    pub msg: String,
}

impl ErrorEnvelope {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: true,
            msg: msg.into(),
        }
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Extension trait for consistent error formatting
pub trait ErrorResponseExt {
    /// Convert to the standard error envelope
    fn to_error_envelope(&self) -> ErrorEnvelope;

    /// Get the appropriate HTTP status code
    fn status_code(&self) -> StatusCode;
}

impl ErrorResponseExt for ProxyError {
    fn to_error_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        use ProxyError::*;

        match self {
            MissingEndpoint | InvalidEndpoint(_) | MissingKey | InvalidKey(_) | MissingValue
            | EmptyBody | InvalidBodyEncoding => StatusCode::BAD_REQUEST,
            ForbiddenEndpoint { .. } | ForbiddenAction { .. } => StatusCode::FORBIDDEN,
            MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            MissingAuthorization => StatusCode::UNAUTHORIZED,
            NotFound(_) => StatusCode::NOT_FOUND,
            Upstream(_) | Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
