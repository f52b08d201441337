//! Test utilities for sync module testing
//!
//! Provides a scriptable backend that can delay reads, fail selected keys
//! and record every call it receives.
