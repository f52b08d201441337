//! Type definitions for the proxy module

use crate::config::ProxySettings;
use crate::domain::config_types::RequestSizeLimit;
use crate::domain::TrustedDomainSuffix;
use std::time::Duration;
use thiserror::Error;

/// Content type of every relayed backend response
pub use crate::proxy::headers::content_types::JSON_UTF8;

/// Header name for request ID
pub use crate::proxy::headers::X_REQUEST_ID as REQUEST_ID_HEADER;

/// Proxy configuration
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    /// Hostname suffix a forwarded endpoint must end with
    pub trusted_domain_suffix: TrustedDomainSuffix,
    /// Maximum request size in bytes
    pub max_request_size: RequestSizeLimit,
    /// Timeout for each upstream call
    pub request_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            trusted_domain_suffix: TrustedDomainSuffix::default(),
            max_request_size: RequestSizeLimit::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&ProxySettings> for ProxyConfig {
    fn from(settings: &ProxySettings) -> Self {
        Self {
            trusted_domain_suffix: settings.trusted_domain_suffix.clone(),
            max_request_size: settings.max_request_size,
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
        }
    }
}

/// Errors that can occur in the proxy
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Missing query param: endpoint")]
    MissingEndpoint,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("forbidden endpoint: {host}")]
    ForbiddenEndpoint { host: String },

    #[error("GET only supports action \"get\", got \"{action}\"")]
    MethodNotAllowed { action: String },

    #[error("forbidden action \"{action}\"")]
    ForbiddenAction { action: String },

    #[error("Missing key path")]
    MissingKey,

    #[error("Invalid key path: {0}")]
    InvalidKey(String),

    #[error("JSON body must include {{ value }}")]
    MissingValue,

    #[error("Request body is empty")]
    EmptyBody,

    #[error("Request body must be valid UTF-8")]
    InvalidBodyEncoding,

    #[error("Missing Authorization header")]
    MissingAuthorization,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for proxy operations
pub type ProxyResult<T> = Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_config_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.trusted_domain_suffix.as_ref(), ".upstash.io");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_request_size.into_inner(), 4 * 1024 * 1024);
    }

    #[test]
    fn test_proxy_config_from_settings() {
        let settings = ProxySettings {
            trusted_domain_suffix: TrustedDomainSuffix::try_new(".example.net".to_string())
                .unwrap(),
            max_request_size: RequestSizeLimit::try_new(1024).unwrap(),
            request_timeout_secs: 5,
        };

        let config = ProxyConfig::from(&settings);

        assert_eq!(config.trusted_domain_suffix.as_ref(), ".example.net");
        assert_eq!(config.max_request_size.into_inner(), 1024);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ProxyError::MissingValue.to_string(),
            "JSON body must include { value }"
        );
        assert_eq!(
            ProxyError::MethodNotAllowed {
                action: "set".to_string()
            }
            .to_string(),
            r#"GET only supports action "get", got "set""#
        );
        assert_eq!(
            ProxyError::ForbiddenEndpoint {
                host: "evil.com".to_string()
            }
            .to_string(),
            "forbidden endpoint: evil.com"
        );
    }
}
