//! Test utilities for proxy module testing
//!
//! The proxy only forwards to trusted hostnames, so tests point a trusted
//! name at the local mock server through the HTTP client's resolver.
