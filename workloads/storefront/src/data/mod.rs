//! Catalog data for the storefront pages.

mod catalog;
mod wire;

pub use catalog::*;
