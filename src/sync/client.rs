//! Chunk-store client
//!
//! Persists one logical document as a [`ChunkSet`]: the document is split
//! with [`chunks`], each chunk is written to its own indexed key, and the
//! chunk count is written last. Readers only trust chunks up to the stored
//! count, so an interrupted write never advertises chunks it did not store.

use crate::chunking::chunks;
use crate::config::SyncSettings;
use crate::domain::{BackendEndpoint, BearerToken, MaxChunkBytes, ProxyUrl, StorageKey};
use crate::sync::backend::KvBackend;
use crate::sync::chunk_set::ChunkSet;
use crate::sync::rest::RestBackend;
use crate::sync::types::{SyncError, SyncResult};
use futures_util::future::try_join_all;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Reads and writes a chunked document through a [`KvBackend`]
#[derive(Debug, Clone)]
pub struct ChunkStore<B> {
    backend: B,
    chunk_set: ChunkSet,
    max_chunk_bytes: MaxChunkBytes,
}

impl<B: KvBackend> ChunkStore<B> {
    pub fn new(backend: B, base: StorageKey, max_chunk_bytes: MaxChunkBytes) -> Self {
        Self {
            backend,
            chunk_set: ChunkSet::new(base),
            max_chunk_bytes,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn chunk_set(&self) -> &ChunkSet {
        &self.chunk_set
    }

    pub fn max_chunk_bytes(&self) -> MaxChunkBytes {
        self.max_chunk_bytes
    }

    /// Probe the backend by reading the base key
    #[instrument(skip(self), fields(base = %self.chunk_set.base()))]
    pub async fn check(&self) -> bool {
        self.backend.check(self.chunk_set.base().as_ref()).await
    }

    /// Reassemble the stored document
    ///
    /// Returns an empty string when no valid chunk count is stored. All chunks
    /// are fetched concurrently; the first failed read fails the whole call.
    #[instrument(skip(self), fields(base = %self.chunk_set.base()))]
    pub async fn get(&self) -> SyncResult<String> {
        let raw_count = self.backend.get(&self.chunk_set.count_key()).await?;
        let Some(count) = ChunkSet::parse_count(raw_count.as_deref()) else {
            warn!(raw_count = ?raw_count, "Invalid chunk count, treating document as empty");
            return Ok(String::new());
        };

        info!(count, "Reading chunks");

        let reads = self.chunk_set.chunk_keys(count).map(move |key| async move {
            match self.backend.get(&key).await? {
                Some(chunk) => Ok(chunk),
                None => Err(SyncError::MissingChunk { key }),
            }
        });
        let parts = try_join_all(reads).await?;

        for (index, part) in parts.iter().enumerate() {
            debug!(
                index,
                char_len = part.chars().count(),
                byte_len = part.len(),
                "Chunk read"
            );
        }

        let document = parts.concat();
        info!(
            char_len = document.chars().count(),
            byte_len = document.len(),
            "Document reassembled"
        );
        Ok(document)
    }

    /// Store `value`, replacing the previous document
    ///
    /// Chunks are written one at a time in index order and the count key is
    /// written only after every chunk succeeded.
    #[instrument(skip(self, value), fields(base = %self.chunk_set.base()))]
    pub async fn set(&self, value: &str) -> SyncResult<()> {
        let parts: Vec<&str> = chunks(value, self.max_chunk_bytes).collect();
        info!(total_parts = parts.len(), byte_len = value.len(), "Writing chunks");

        for (index, part) in parts.iter().enumerate() {
            self.backend
                .set(&self.chunk_set.chunk_key(index), part)
                .await?;
        }

        let count_key = self.chunk_set.count_key();
        self.backend
            .set(&count_key, &parts.len().to_string())
            .await?;
        info!(count_key = %count_key, count = parts.len(), "Chunk count committed");

        Ok(())
    }
}

impl ChunkStore<RestBackend> {
    /// Build an HTTP-backed store from sync settings
    pub fn from_settings(settings: &SyncSettings) -> SyncResult<Self> {
        let endpoint = BackendEndpoint::try_new(settings.endpoint.clone())
            .map_err(|e| SyncError::InvalidConfig(format!("endpoint: {e}")))?;
        let token = BearerToken::try_new(settings.api_key.clone())
            .map_err(|e| SyncError::InvalidConfig(format!("api_key: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        let mut backend = RestBackend::with_client(client, endpoint, &token)?;
        if settings.use_proxy && !settings.proxy_url.trim().is_empty() {
            let proxy_url = ProxyUrl::try_new(settings.proxy_url.clone())
                .map_err(|e| SyncError::InvalidConfig(format!("proxy_url: {e}")))?;
            backend = backend.via_proxy(proxy_url);
        }

        Ok(Self::new(
            backend,
            StorageKey::from_username(&settings.username),
            settings.max_chunk_bytes,
        ))
    }
}
