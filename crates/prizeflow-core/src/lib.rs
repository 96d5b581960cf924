//! Shared service plumbing for Prizeflow services: configuration loading,
//! tracing, request ids, health probes, and gateway identity extraction.

pub mod actor;
pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
