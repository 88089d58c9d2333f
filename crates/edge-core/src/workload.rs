//! Workload definition.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RouteConfig};
use crate::context::RouteParams;

/// Workload manifest - explicit configuration for a deployable unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadManifest {
    /// Unique name for this workload.
    pub name: String,
    /// Semantic version.
    pub version: String,
    /// Routes this workload handles.
    pub routes: Vec<RouteConfig>,
}

impl WorkloadManifest {
    /// Create a new workload manifest.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            routes: Vec::new(),
        }
    }

    /// Add a route to this workload.
    pub fn with_route(mut self, route: RouteConfig) -> Self {
        self.routes.push(route);
        self
    }

    /// First route matching the method and path.
    pub fn route(&self, method: &str, path: &str) -> Option<(&RouteConfig, RouteParams)> {
        self.routes
            .iter()
            .filter(|r| r.accepts(method))
            .find_map(|r| r.matches(path).map(|params| (r, params)))
    }
}

/// Error type for workload operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    #[error("Shell not sent before sections")]
    ShellNotSent,

    #[error("Streaming error: {0}")]
    StreamError(String),

    #[error("Section '{0}' failed: {1}")]
    SectionFailed(String, String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_routing() {
        let manifest = WorkloadManifest::new("storefront", "0.1.0")
            .with_route(RouteConfig::new("/", "home"))
            .with_route(RouteConfig::new("/products/:handle", "product"));

        let (route, params) = manifest.route("GET", "/products/tee").unwrap();
        assert_eq!(route.handler, "product");
        assert_eq!(params["handle"], "tee");
        assert!(manifest.route("POST", "/products/tee").is_none());
        assert!(manifest.route("GET", "/pages/about").is_none());
    }
}
