//! Core abstractions for the storefront.
//!
//! This crate provides the fundamental types and traits:
//! - `StorefrontConfig` - Storefront configuration loaded from TOML
//! - `WorkloadManifest` - Workload configuration
//! - `RequestContext` - Request path, locale and query
//! - `LifecyclePhase` - Request lifecycle tracking, including the
//!   critical and deferred data tiers

mod config;
mod context;
mod lifecycle;
mod workload;

pub use config::*;
pub use context::*;
pub use lifecycle::*;
pub use workload::*;
