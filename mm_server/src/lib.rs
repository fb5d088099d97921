//! Tournament matchmaking server library.
//!
//! The binary in `main.rs` wires these modules together; they are exposed
//! as a library so integration tests can build the router directly.

/// HTTP API: application state, router, and endpoint handlers.
pub mod api;
/// Environment/CLI configuration.
pub mod config;
/// Structured logging setup.
pub mod logging;
/// Prometheus metrics.
pub mod metrics;
