use crate::domain::config_types::{Host, LogLevel, Port, RequestSizeLimit};
use crate::domain::{
    MaxChunkBytes, TrustedDomainSuffix, DEFAULT_MAX_CHUNK_BYTES, DEFAULT_TRUSTED_DOMAIN_SUFFIX,
};
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;

const ENV_PREFIX: &str = "KV_CHUNK_SYNC";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub proxy: ProxySettings,
    #[serde(default)]
    pub sync: SyncSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: Host,
    pub port: Port,
    pub environment: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProxySettings {
    /// Hostname suffix every forwarded endpoint must carry
    pub trusted_domain_suffix: TrustedDomainSuffix,
    /// Largest inbound request body accepted, in bytes
    pub max_request_size: RequestSizeLimit,
    /// Timeout applied to each upstream call
    pub request_timeout_secs: u64,
}

/// Options for the chunk-store client
///
/// Credentials are kept as raw strings here and validated when a
/// [`crate::sync::ChunkStore`] is built from them.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct SyncSettings {
    /// Backend REST endpoint, e.g. `https://eu1-example.upstash.io`
    pub endpoint: String,
    /// Backend bearer token
    pub api_key: String,
    /// Base key for the document; blank selects the default key
    pub username: String,
    /// Route requests through `proxy_url`
    pub use_proxy: bool,
    pub proxy_url: String,
    pub max_chunk_bytes: MaxChunkBytes,
    /// Timeout applied to each backend call
    pub request_timeout_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            username: String::new(),
            use_proxy: false,
            proxy_url: String::new(),
            max_chunk_bytes: MaxChunkBytes::default(),
            request_timeout_secs: 30,
        }
    }
}

impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("username", &self.username)
            .field("use_proxy", &self.use_proxy)
            .field("proxy_url", &self.proxy_url)
            .field("max_chunk_bytes", &self.max_chunk_bytes)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: LogLevel,
}

impl Settings {
    /// Load layered settings: defaults, `config/` files, then environment
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Self::defaults(&environment)?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load settings from defaults plus one explicit file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::defaults("development")?
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("application.environment", environment)?
            .set_default("proxy.trusted_domain_suffix", DEFAULT_TRUSTED_DOMAIN_SUFFIX)?
            .set_default("proxy.max_request_size", 4 * 1024 * 1024)?
            .set_default("proxy.request_timeout_secs", 30)?
            .set_default("sync.endpoint", "")?
            .set_default("sync.api_key", "")?
            .set_default("sync.username", "")?
            .set_default("sync.use_proxy", false)?
            .set_default("sync.proxy_url", "")?
            .set_default("sync.max_chunk_bytes", DEFAULT_MAX_CHUNK_BYTES as u64)?
            .set_default("sync.request_timeout_secs", 30)?
            .set_default("logging.level", "info")
    }

    /// Address the proxy server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}
