//! Cross-cutting plumbing shared by campus services: health probes,
//! request ids, tracing setup, env configuration and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
