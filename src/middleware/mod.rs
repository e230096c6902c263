//! HTTP middleware for the gateway.

mod tracing;

pub use tracing::request_tracing;
