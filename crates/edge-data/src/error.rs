//! Catalog error type.

use std::time::Duration;

/// Error type for catalog operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {status} for {operation}")]
    Http { status: u16, operation: String },

    #[error("Timeout after {after:?} for {operation}")]
    Timeout { operation: String, after: Duration },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("{operation} returned errors: {}", .messages.join("; "))]
    GraphQl {
        operation: String,
        messages: Vec<String>,
    },

    #[error("Could not decode {operation} response: {message}")]
    Decode { operation: String, message: String },

    #[error("{resource} not found: {handle}")]
    NotFound { resource: &'static str, handle: String },
}

impl CatalogError {
    /// HTTP status, when the backend returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn decode(operation: &str, error: serde_json::Error) -> Self {
        Self::Decode {
            operation: operation.to_string(),
            message: error.to_string(),
        }
    }
}
