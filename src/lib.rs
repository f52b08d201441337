//! kv_chunk_sync - chunked document sync over a REST key-value store
//!
//! A document too large for one value is split into size-bounded chunks on
//! UTF-8 boundaries and stored under indexed keys plus a count key. The
//! [`proxy`] module relays the store's `get`/`set` calls for clients that
//! cannot reach it directly, restricted to trusted endpoints.

pub mod application;
pub mod chunking;
pub mod config;
pub mod domain;
pub mod error;
pub mod proxy;
pub mod sync;

pub use application::Application;
pub use chunking::{chunks, Chunks};
pub use error::{Error, Result};
pub use sync::{ChunkStore, KvBackend, MemoryBackend, RestBackend, SyncError};
