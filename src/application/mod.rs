//! Server application wiring
//!
//! Loads settings, builds the proxy router and serves it.

pub mod app;

pub use app::Application;
