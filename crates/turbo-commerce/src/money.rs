//! Money type for representing monetary values.
//!
//! Amounts are kept in the currency's minor unit as integers. The catalog
//! reports prices as decimal strings plus an ISO currency code; those are
//! parsed exactly, never through a float.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;

/// An ISO 4217 currency.
///
/// The common storefront currencies get their own symbol and minor unit;
/// any other three-letter code is carried as-is, shown by its code and
/// assumed to have two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    /// Any other alphabetic code, stored uppercased.
    Other([u8; 3]),
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            // Only ASCII letters are ever stored.
            Currency::Other(code) => std::str::from_utf8(code).unwrap_or("XXX"),
        }
    }

    /// Get the currency symbol (e.g., "$"). Unknown currencies use their code.
    pub fn symbol(&self) -> &str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::Other(_) => self.code(),
        }
    }

    /// Number of digits in the minor unit.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    ///
    /// Any three ASCII letters are accepted, in either case.
    pub fn from_code(code: &str) -> Option<Self> {
        let upper = code.trim().to_ascii_uppercase();
        match upper.as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            other => {
                let bytes: [u8; 3] = other.as_bytes().try_into().ok()?;
                bytes
                    .iter()
                    .all(u8::is_ascii_uppercase)
                    .then_some(Currency::Other(bytes))
            }
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = CommerceError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Currency::from_code(&code).ok_or(CommerceError::UnsupportedCurrency(code))
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Parse a catalog amount such as `"49.9"` with a currency code.
    ///
    /// ```
    /// use turbo_commerce::money::{Currency, Money};
    /// let price = Money::parse("49.9", "USD").unwrap();
    /// assert_eq!(price, Money::new(4990, Currency::USD));
    /// ```
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, CommerceError> {
        let currency = Currency::from_code(currency_code)
            .ok_or_else(|| CommerceError::UnsupportedCurrency(currency_code.to_string()))?;
        let invalid = || CommerceError::InvalidAmount {
            amount: amount.to_string(),
            currency: currency_code.to_string(),
        };

        let trimmed = amount.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let places = currency.decimal_places() as usize;

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        // Extra fractional digits are accepted only when they are zeros.
        if fraction.len() > places && fraction[places..].bytes().any(|b| b != b'0') {
            return Err(invalid());
        }

        let mut minor: String = fraction.chars().take(places).collect();
        while minor.len() < places {
            minor.push('0');
        }

        let scale = 10_i64.pow(currency.decimal_places());
        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let minor: i64 = if minor.is_empty() {
            0
        } else {
            minor.parse().map_err(|_| invalid())?
        };
        let cents = whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(minor))
            .ok_or(CommerceError::Overflow)?;

        Ok(Self::new(if negative { -cents } else { cents }, currency))
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Convert to a decimal value (display only).
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{}{:.places$}", self.currency.symbol(), self.to_decimal())
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Smallest of a set of amounts in one currency.
    ///
    /// Returns an error when the amounts do not share a currency.
    pub fn try_min<'a>(
        amounts: impl IntoIterator<Item = &'a Money>,
    ) -> Result<Option<Money>, CommerceError> {
        let mut min: Option<Money> = None;
        for amount in amounts {
            match min {
                Some(current) if current.currency != amount.currency => {
                    return Err(CommerceError::CurrencyMismatch {
                        expected: current.currency.code().to_string(),
                        got: amount.currency.code().to_string(),
                    });
                }
                Some(current) if current.amount_cents <= amount.amount_cents => {}
                _ => min = Some(*amount),
            }
        }
        Ok(min)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_parse() {
        assert_eq!(Money::parse("49.99", "USD").unwrap().amount_cents, 4999);
        assert_eq!(Money::parse("10", "EUR").unwrap().amount_cents, 1000);
        assert_eq!(Money::parse("10.5", "usd").unwrap().amount_cents, 1050);
        assert_eq!(Money::parse("1200.0", "JPY").unwrap().amount_cents, 1200);
        assert_eq!(Money::parse("5.000", "USD").unwrap().amount_cents, 500);
    }

    #[test]
    fn test_money_parse_rejects_garbage() {
        assert!(matches!(
            Money::parse("abc", "USD"),
            Err(CommerceError::InvalidAmount { .. })
        ));
        assert!(matches!(
            Money::parse("1.234", "USD"),
            Err(CommerceError::InvalidAmount { .. })
        ));
        assert!(matches!(
            Money::parse("1.00", "US"),
            Err(CommerceError::UnsupportedCurrency(_))
        ));
        assert!(matches!(
            Money::parse("1.00", "U5D"),
            Err(CommerceError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_any_iso_currency() {
        let chf = Money::parse("39.90", "chf").unwrap();
        assert_eq!(chf.currency.code(), "CHF");
        assert_eq!(chf.amount_cents, 3990);
        assert_eq!(chf.display(), "CHF39.90");
        assert_eq!(Money::parse("120", "SEK").unwrap().display(), "SEK120.00");

        let mixed = [chf, Money::new(1, Currency::from_code("MXN").unwrap())];
        assert!(matches!(
            Money::try_min(&mixed),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_currency_serializes_as_code() {
        let chf = Currency::from_code("CHF").unwrap();
        assert_eq!(serde_json::to_string(&chf).unwrap(), "\"CHF\"");
        assert_eq!(serde_json::from_str::<Currency>("\"chf\"").unwrap(), chf);
        assert_eq!(serde_json::from_str::<Currency>("\"USD\"").unwrap(), Currency::USD);
        assert!(serde_json::from_str::<Currency>("\"US\"").is_err());
    }

    #[test]
    fn test_money_multiply_overflow() {
        let m = Money::new(1000, Currency::USD);
        assert_eq!(m.try_multiply(3).unwrap().amount_cents, 3000);
        assert!(Money::new(i64::MAX, Currency::USD).try_multiply(2).is_none());
    }

    #[test]
    fn test_money_min() {
        let prices = [
            Money::new(3000, Currency::USD),
            Money::new(1500, Currency::USD),
            Money::new(2000, Currency::USD),
        ];
        assert_eq!(Money::try_min(&prices).unwrap(), Some(prices[1]));
        assert_eq!(Money::try_min(&[]).unwrap(), None);

        let mixed = [Money::new(1, Currency::USD), Money::new(1, Currency::EUR)];
        assert!(Money::try_min(&mixed).is_err());
    }
}
