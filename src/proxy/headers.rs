//! HTTP header constants and well-known paths for the proxy service

use ::http::header;

/// Header name for request ID used for tracing and correlation
pub const X_REQUEST_ID: &str = "x-request-id";

/// Standard header re-exports for convenience
pub use header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

/// Well-known paths
pub mod paths {
    /// Health check endpoint path
    pub const HEALTH: &str = "/health";

    /// Proxy route; `action` is the first path segment, the rest is the key
    pub const PROXY_ROUTE: &str = "/api/upstash/{action}/{*key}";
}

/// Content types the proxy produces
pub mod content_types {
    pub const JSON: &str = "application/json";
    pub const JSON_UTF8: &str = "application/json; charset=utf-8";
}
