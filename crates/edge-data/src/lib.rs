//! Catalog access layer with dependency tagging and timeouts.
//!
//! This crate provides:
//! - `CatalogClient` - Transport to the catalog backend
//! - `Storefront` - Locale-aware catalog access with automatic timeout/retry
//! - `StorefrontQuery` - Operations and their query documents
//! - `MemoryCatalog` - In-process backend with canned responses
//! - `DependencyTag` - Semantic dependency categories
//! - `TimeoutConfig` - Per-dependency timeouts
//! - `RetryPolicy` - Retry strategies

mod client;
mod dependency;
mod error;
mod memory;
mod query;
mod retry;
mod timeout;

pub use client::*;
pub use dependency::*;
pub use error::*;
pub use memory::*;
pub use query::*;
pub use retry::*;
pub use timeout::*;
