//! Tiered execution of page data loading.
//!
//! This crate splits a page's data into tiers:
//! - `TieredPageLoader` - Awaits critical data, hands back deferred data in flight
//! - `PageLoader` - Per-page critical and deferred fetches
//! - `FallbackStrategy` - What a deferred section renders when its data fails

mod fallback;
mod loader;

pub use fallback::*;
pub use loader::*;
