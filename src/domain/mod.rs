//! Domain types for chunked document sync
//!
//! Validated newtypes for keys, credentials, endpoints and limits, plus the
//! configuration value types used by [`crate::config`].

pub mod config_types;
pub mod types;

pub use types::*;
