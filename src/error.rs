use crate::proxy::ProxyError;
use crate::sync::SyncError;
use thiserror::Error;

/// Crate-level error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    #[error("Application error: {message}")]
    Application { message: String },
}

impl Error {
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions_keep_messages() {
        let error = Error::from(ProxyError::MissingEndpoint);
        assert_eq!(
            error.to_string(),
            "Proxy error: Missing query param: endpoint"
        );

        let error = Error::from(SyncError::MissingChunk {
            key: "doc-chunk-1".to_string(),
        });
        assert!(error.to_string().starts_with("Sync error: "));

        assert_eq!(
            Error::application("bind failed").to_string(),
            "Application error: bind failed"
        );
    }
}
