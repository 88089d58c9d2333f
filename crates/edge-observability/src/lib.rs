//! Observability for the storefront.
//!
//! This crate provides:
//! - `StructuredLogger` - Request-scoped structured logging
//! - `init_tracing` - Global subscriber setup (JSON or human output)

mod logging;
mod subscriber;

pub use logging::*;
pub use subscriber::*;

// Re-export RequestId and TimingContext from edge-core for convenience
pub use edge_core::{RequestId, TimingContext};
