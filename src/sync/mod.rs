//! Chunked document sync over a key-value backend
//!
//! A logical document is stored as a chunk count plus indexed chunk keys.
//! [`ChunkStore`] owns that policy; the backend only ever sees single-key
//! `get` and `set` calls.

pub mod backend;
pub mod chunk_set;
pub mod client;
pub mod memory;
pub mod rest;
pub mod test_utils;
pub mod types;



pub use backend::KvBackend;
pub use chunk_set::ChunkSet;
pub use client::ChunkStore;
pub use memory::MemoryBackend;
pub use rest::RestBackend;
pub use types::{SyncError, SyncResult};
