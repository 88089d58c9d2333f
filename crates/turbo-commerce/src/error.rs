//! Commerce error types.

use thiserror::Error;

/// Errors raised by storefront domain helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Amount string from the catalog could not be parsed.
    #[error("Invalid amount '{amount}' for {currency}")]
    InvalidAmount { amount: String, currency: String },

    /// Currency code that is not three ASCII letters.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}
