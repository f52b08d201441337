//! Key-value backend abstraction

use crate::sync::types::SyncResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

/// A key-value store offering single-key `get` and `set`
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Read a key; `None` when the key holds no value
    async fn get(&self, key: &str) -> SyncResult<Option<String>>;

    /// Write a key, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> SyncResult<()>;

    /// Best-effort reachability probe; never fails
    async fn check(&self, key: &str) -> bool {
        match self.get(key).await {
            Ok(_) => true,
            Err(e) => {
                error!(key, error = %e, "Backend check failed");
                false
            }
        }
    }
}

#[async_trait]
impl<T: KvBackend + ?Sized> KvBackend for Arc<T> {
    async fn get(&self, key: &str) -> SyncResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        (**self).set(key, value).await
    }

    async fn check(&self, key: &str) -> bool {
        (**self).check(key).await
    }
}
