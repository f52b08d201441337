//! Type definitions for the sync module

use crate::domain::Action;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or writing a chunked document
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{operation} {key} failed: {status} {status_text} {body}")]
    Backend {
        operation: Action,
        key: String,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Chunk {key} is missing from the backend")]
    MissingChunk { key: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid backend response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    /// HTTP status reported by the backend, if the failure came from one
    pub fn backend_status(&self) -> Option<u16> {
        match self {
            SyncError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Body returned by the backend for `GET /get/<key>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl GetResponse {
    /// Stored value; strings pass through, other JSON values are re-serialized
    pub fn into_value(self) -> Option<String> {
        match self.result? {
            serde_json::Value::Null => None,
            serde_json::Value::String(value) => Some(value),
            other => Some(other.to_string()),
        }
    }
}

/// Body sent to the backend for `POST /set/<key>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRequest<'a> {
    pub value: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_values() {
        let string: GetResponse = serde_json::from_str(r#"{"result":"abc"}"#).unwrap();
        assert_eq!(string.into_value().as_deref(), Some("abc"));

        let null: GetResponse = serde_json::from_str(r#"{"result":null}"#).unwrap();
        assert_eq!(null.into_value(), None);

        let missing: GetResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.into_value(), None);

        let number: GetResponse = serde_json::from_str(r#"{"result":3}"#).unwrap();
        assert_eq!(number.into_value().as_deref(), Some("3"));
    }

    #[test]
    fn test_set_request_shape() {
        let body = serde_json::to_value(SetRequest { value: "42" }).unwrap();
        assert_eq!(body, serde_json::json!({ "value": "42" }));
    }

    #[test]
    fn test_backend_error_message_carries_diagnostics() {
        let error = SyncError::Backend {
            operation: Action::Set,
            key: "doc-chunk-0".to_string(),
            status: 500,
            status_text: "Internal Server Error".to_string(),
            body: "boom".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "set doc-chunk-0 failed: 500 Internal Server Error boom"
        );
        assert_eq!(error.backend_status(), Some(500));
    }
}
