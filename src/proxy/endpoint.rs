//! Trusted endpoint validation
//!
//! The proxy only forwards to hosts under the provider's domain. Without this
//! check it would be an open relay for whatever `Authorization` header a
//! caller supplies.

use crate::domain::{BackendEndpoint, TrustedDomainSuffix};
use crate::proxy::types::{ProxyError, ProxyResult};
use http::Uri;

/// Allow-list predicate over endpoint hostnames
#[derive(Clone, Debug, Default)]
pub struct EndpointPolicy {
    trusted_suffix: TrustedDomainSuffix,
}

impl EndpointPolicy {
    pub fn new(trusted_suffix: TrustedDomainSuffix) -> Self {
        Self { trusted_suffix }
    }

    /// Whether `host` ends with the trusted suffix (case-insensitive)
    pub fn is_trusted_host(&self, host: &str) -> bool {
        host.to_ascii_lowercase()
            .ends_with(self.trusted_suffix.as_ref())
    }

    /// Validate the `endpoint` query parameter
    ///
    /// Accepts only absolute `http`/`https` URLs whose hostname is trusted and
    /// returns the endpoint with trailing slashes removed.
    pub fn validate(&self, endpoint: Option<&str>) -> ProxyResult<BackendEndpoint> {
        let raw = endpoint
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ProxyError::MissingEndpoint)?;

        let uri: Uri = raw
            .parse()
            .map_err(|_| ProxyError::InvalidEndpoint(raw.to_string()))?;

        if !matches!(uri.scheme_str(), Some("http" | "https")) {
            return Err(ProxyError::InvalidEndpoint(raw.to_string()));
        }

        let host = uri
            .host()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| ProxyError::InvalidEndpoint(raw.to_string()))?;

        if !self.is_trusted_host(host) {
            return Err(ProxyError::ForbiddenEndpoint {
                host: host.to_string(),
            });
        }

        BackendEndpoint::try_new(raw.to_string())
            .map_err(|e| ProxyError::InvalidEndpoint(format!("{raw}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://abc.upstash.io", "https://abc.upstash.io")]
    #[case("https://abc.upstash.io/", "https://abc.upstash.io")]
    #[case("https://abc.upstash.io///", "https://abc.upstash.io")]
    #[case("https://eu1-fancy-cat-1234.upstash.io", "https://eu1-fancy-cat-1234.upstash.io")]
    #[case("https://ABC.Upstash.IO", "https://ABC.Upstash.IO")]
    #[case("http://abc.upstash.io:8080", "http://abc.upstash.io:8080")]
    fn test_accepts_trusted_endpoints(#[case] endpoint: &str, #[case] expected: &str) {
        let accepted = EndpointPolicy::default().validate(Some(endpoint)).unwrap();
        assert_eq!(accepted.as_ref(), expected);
    }

    #[rstest]
    #[case("https://evil.com", "evil.com")]
    #[case("https://upstash.io.evil.com", "upstash.io.evil.com")]
    #[case("https://upstash.io", "upstash.io")]
    #[case("https://notupstash.io", "notupstash.io")]
    #[case("https://abc.upstash.io@evil.com", "evil.com")]
    fn test_rejects_untrusted_hosts(#[case] endpoint: &str, #[case] host: &str) {
        let error = EndpointPolicy::default()
            .validate(Some(endpoint))
            .unwrap_err();
        match &error {
            ProxyError::ForbiddenEndpoint { host: rejected } => assert_eq!(rejected, host),
            other => panic!("expected forbidden endpoint, got {other:?}"),
        }
        assert_eq!(error.to_string(), format!("forbidden endpoint: {host}"));
    }

    #[rstest]
    #[case("abc.upstash.io")]
    #[case("ftp://abc.upstash.io")]
    #[case("/relative/path")]
    #[case("https://")]
    fn test_rejects_malformed_endpoints(#[case] endpoint: &str) {
        let error = EndpointPolicy::default()
            .validate(Some(endpoint))
            .unwrap_err();
        assert!(matches!(error, ProxyError::InvalidEndpoint(_)), "{error:?}");
    }

    #[test]
    fn test_missing_endpoint() {
        let policy = EndpointPolicy::default();
        assert!(matches!(
            policy.validate(None),
            Err(ProxyError::MissingEndpoint)
        ));
        assert!(matches!(
            policy.validate(Some("  ")),
            Err(ProxyError::MissingEndpoint)
        ));
    }

    #[test]
    fn test_custom_suffix() {
        let policy =
            EndpointPolicy::new(TrustedDomainSuffix::try_new(".example.net".to_string()).unwrap());
        assert!(policy.validate(Some("https://kv.example.net")).is_ok());
        assert!(policy.validate(Some("https://abc.upstash.io")).is_err());
    }
}
