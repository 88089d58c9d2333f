//! Dependency tagging for semantic categorization.

use std::time::Duration;

/// Catalog dependencies a storefront page reads from.
///
/// Each tag carries a default timeout, retry budget and tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Product with its option and variant graph.
    Product,
    /// Paged collection listing.
    Collection,
    /// Home page featured collection.
    FeaturedCollection,
    /// Recommended products grid.
    Recommendations,
    /// Cart mutations.
    Cart,
    /// Custom dependency with name.
    Custom(&'static str),
}

impl DependencyTag {
    /// Get the default timeout for this dependency type.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Product | Self::Collection => Duration::from_millis(1500),
            Self::FeaturedCollection => Duration::from_millis(1000),
            Self::Recommendations => Duration::from_millis(2000),
            Self::Cart => Duration::from_millis(3000),
            Self::Custom(_) => Duration::from_millis(1000),
        }
    }

    /// Get the default max retries for this dependency type.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            Self::Product | Self::Collection | Self::FeaturedCollection => 1,
            // Mutations are not idempotent.
            Self::Cart => 0,
            Self::Recommendations | Self::Custom(_) => 0,
        }
    }

    /// Check if this dependency is critical (should block render).
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Product | Self::Collection | Self::FeaturedCollection)
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &str {
        match self {
            Self::Product => "product",
            Self::Collection => "collection",
            Self::FeaturedCollection => "featured_collection",
            Self::Recommendations => "recommendations",
            Self::Cart => "cart",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
