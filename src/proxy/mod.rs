//! Forwarding proxy for the backend's `get`/`set` REST calls
//!
//! Requests are validated locally (trusted endpoint, key path, action,
//! credentials, body) and then relayed upstream. Backend responses come back
//! verbatim; local failures use the `{"error": true, "msg": ...}` envelope.

pub mod endpoint;
pub mod error_response;
pub mod forward;
pub mod headers;
pub mod middleware;
pub mod middleware_stack;
pub mod request;
pub mod service;
pub mod test_utils;
pub mod types;


pub use endpoint::EndpointPolicy;
pub use service::ProxyService;
pub use types::{ProxyConfig, ProxyError, ProxyResult};
