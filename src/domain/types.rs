//! Validated domain types shared by the sync client and the proxy
//!
//! Credentials, endpoints and size limits are wrapped in newtypes so that
//! validation happens once, at the configuration or request boundary.

use derive_more::Display;
use nutype::nutype;
use std::fmt;
use std::str::FromStr;

/// Storage key used when no username is configured
pub const DEFAULT_STORAGE_KEY: &str = "kv-chunk-sync-state";

/// Default maximum chunk size in bytes (900 KiB)
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 900 * 1024;

/// Default trusted provider domain suffix
pub const DEFAULT_TRUSTED_DOMAIN_SUFFIX: &str = ".upstash.io";

/// Path prefix under which the forwarding proxy is mounted
pub const PROXY_BASE_PATH: &str = "/api/upstash";

/// The two primitive operations understood by the backend and the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Action {
    #[display("get")]
    Get,
    #[display("set")]
    Set,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Action::Get),
            "set" => Ok(Action::Set),
            _ => Err(format!("unknown action: {s}")),
        }
    }
}

/// Base key under which a logical document is stored
#[nutype(
    validate(not_empty, len_char_max = 512),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct StorageKey(String);

impl StorageKey {
    /// Use the username as the base key, or the default key when it is blank
    pub fn from_username(username: &str) -> Self {
        Self::try_new(username.to_string()).unwrap_or_default()
    }
}

impl Default for StorageKey {
    fn default() -> Self {
        Self::try_new(DEFAULT_STORAGE_KEY.to_string()).expect("Default storage key is valid")
    }
}

/// Bearer token for the backend REST API (secured)
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Clone, PartialEq, Eq, Serialize, Deserialize, AsRef)
)]
pub struct BearerToken(String);

impl BearerToken {
    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.as_ref())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(***)")
    }
}

/// Base URL of the backend REST API, without trailing slashes
#[nutype(
    sanitize(trim, with = |s: String| s.trim_end_matches('/').to_string()),
    validate(predicate = |s: &str| s.starts_with("http://") || s.starts_with("https://")),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct BackendEndpoint(String);

/// Base URL of a deployed forwarding proxy, without trailing slashes
#[nutype(
    sanitize(trim, with = |s: String| s.trim_end_matches('/').to_string()),
    validate(predicate = |s: &str| s.starts_with("http://") || s.starts_with("https://")),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct ProxyUrl(String);

/// Upper bound on the UTF-8 byte length of a single chunk
#[nutype(
    validate(predicate = |bytes| *bytes > 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct MaxChunkBytes(usize);

impl Default for MaxChunkBytes {
    fn default() -> Self {
        Self::try_new(DEFAULT_MAX_CHUNK_BYTES).expect("Default chunk size is valid")
    }
}

/// Domain suffix a proxied endpoint's hostname must end with, e.g. `.upstash.io`
///
/// The leading dot is required so that `upstash.io.evil.com` style hosts
/// and the bare apex cannot match.
#[nutype(
    sanitize(trim, lowercase),
    validate(predicate = |s: &str| s.len() > 1 && s.starts_with('.')),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct TrustedDomainSuffix(String);

impl Default for TrustedDomainSuffix {
    fn default() -> Self {
        Self::try_new(DEFAULT_TRUSTED_DOMAIN_SUFFIX.to_string())
            .expect("Default trusted suffix is valid")
    }
}
