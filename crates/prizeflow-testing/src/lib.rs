//! Test utilities for Prizeflow services.
//!
//! Import from `[dev-dependencies]` only, never in production code.

pub mod actor;
