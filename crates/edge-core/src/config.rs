//! Route and storefront configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::{Locale, RouteParams};

/// Configuration for a single route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Route pattern (e.g., "/products/:handle").
    pub pattern: String,
    /// Handler function name.
    pub handler: String,
    /// HTTP methods this route accepts.
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

impl RouteConfig {
    /// Create a new route configuration.
    pub fn new(pattern: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            handler: handler.into(),
            methods: default_methods(),
        }
    }

    /// Set allowed HTTP methods.
    pub fn with_methods(mut self, methods: Vec<&str>) -> Self {
        self.methods = methods.into_iter().map(String::from).collect();
        self
    }

    /// Match a path against the pattern, extracting `:name` segments.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let pattern: Vec<&str> = self.pattern.split('/').filter(|s| !s.is_empty()).collect();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (expected, actual) in pattern.iter().zip(&segments) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), actual.to_string());
                }
                None if expected == actual => {}
                None => return None,
            }
        }
        Some(params)
    }

    /// Whether the route accepts this method.
    pub fn accepts(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Storefront settings.
///
/// Every field has a default, so a config file only lists what it changes:
///
/// ```toml
/// catalog_endpoint = "https://shop.example.com/api/2024-10/graphql.json"
/// recommended_product_count = 8
///
/// [default_locale]
/// language = "EN"
/// country = "CA"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Workload name used in logs.
    pub name: String,
    /// Catalog API endpoint.
    pub catalog_endpoint: String,
    /// Locale for paths without a locale prefix.
    pub default_locale: Locale,
    /// Collections shown in the home page hero.
    pub featured_collection_count: u32,
    /// Products in the home page recommendations grid.
    pub recommended_product_count: u32,
    /// Products per collection page.
    pub collection_page_size: u32,
    /// Total budget for critical fetches, including retries.
    pub critical_timeout_ms: u64,
    /// Total budget for deferred fetches, including retries.
    pub deferred_timeout_ms: u64,
    /// Retries after the first critical attempt.
    pub critical_retries: u32,
    /// Retries after the first deferred attempt.
    pub deferred_retries: u32,
    /// Minimum log level ("trace" through "error").
    pub log_level: String,
    /// Log output, "json" or "pretty".
    pub log_format: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            name: "storefront".to_string(),
            catalog_endpoint: "http://localhost:3000/api/graphql.json".to_string(),
            default_locale: Locale::default(),
            featured_collection_count: 1,
            recommended_product_count: 4,
            collection_page_size: 8,
            critical_timeout_ms: 3_000,
            deferred_timeout_ms: 5_000,
            critical_retries: 1,
            deferred_retries: 0,
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("featured_collection_count", self.featured_collection_count as u64),
            ("recommended_product_count", self.recommended_product_count as u64),
            ("collection_page_size", self.collection_page_size as u64),
            ("critical_timeout_ms", self.critical_timeout_ms),
            ("deferred_timeout_ms", self.deferred_timeout_ms),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        if self.collection_page_size > 250 {
            return Err(ConfigError::Invalid {
                field: "collection_page_size",
                reason: format!("{} exceeds the catalog maximum of 250", self.collection_page_size),
            });
        }
        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            return Err(ConfigError::Invalid {
                field: "log_format",
                reason: format!("expected \"json\" or \"pretty\", got {:?}", self.log_format),
            });
        }
        Ok(())
    }

    pub fn critical_timeout(&self) -> Duration {
        Duration::from_millis(self.critical_timeout_ms)
    }

    pub fn deferred_timeout(&self) -> Duration {
        Duration::from_millis(self.deferred_timeout_ms)
    }
}
