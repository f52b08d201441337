//! In-process key-value backend

use crate::sync::backend::KvBackend;
use crate::sync::types::SyncResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// [`KvBackend`] holding every key in memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all stored entries
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get(&self, key: &str) -> SyncResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let backend = MemoryBackend::new();
        assert!(backend.is_empty());
        assert_eq!(backend.get("k").await.unwrap(), None);

        backend.set("k", "v1").await.unwrap();
        backend.set("k", "v2").await.unwrap();

        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(backend.len(), 1);
        assert!(backend.check("anything").await);
    }
}
