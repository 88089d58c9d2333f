//! The URL query contract for selected variants.
//!
//! A variant is addressed as `/products/{handle}?{query}` where the query is a
//! list of `key=value` pairs. Keys are option names lower-cased with spaces
//! turned into `-`; values are percent-encoded option values. Options with a
//! single value are auto-resolved and left out, and pairs follow the product's
//! option order, so every variant has exactly one canonical query.
//!
//! Resolution goes the other way: keys are matched case-insensitively against
//! the product's options, unrelated parameters are ignored, and a missing
//! selection falls back to the first available variant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ProductVariant, VariantOption};

/// An ordered list of decoded `key=value` pairs from a URL query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VariantQuery {
    pairs: Vec<(String, String)>,
}

impl VariantQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (with or without the leading `?`).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs = raw
            .split('&')
            .filter(|part| !part.is_empty())
            .filter_map(|part| {
                let (key, value) = part.split_once('=').unwrap_or((part, ""));
                let key = decode_component(key);
                if key.is_empty() {
                    None
                } else {
                    Some((key, decode_component(value)))
                }
            })
            .collect();
        Self { pairs }
    }

    /// Canonical query for an option selection on a product.
    ///
    /// Only options the product offers as a choice are encoded.
    pub fn for_selection(product: &Product, selection: &[VariantOption]) -> Self {
        let pairs = product
            .options
            .iter()
            .filter(|option| option.is_selectable())
            .filter_map(|option| {
                selection
                    .iter()
                    .find(|s| s.name.eq_ignore_ascii_case(&option.name))
                    .map(|s| (option_key(&option.name), s.value.clone()))
            })
            .collect();
        Self { pairs }
    }

    /// Canonical query for a variant of `product`.
    pub fn for_variant(product: &Product, variant: &ProductVariant) -> Self {
        Self::for_selection(product, &variant.options)
    }

    /// Query carrying every assignment of a variant.
    ///
    /// Used for variants of another product resource, whose option
    /// declarations are not known here.
    pub fn from_options(options: &[VariantOption]) -> Self {
        Self {
            pairs: options
                .iter()
                .map(|o| (option_key(&o.name), o.value.clone()))
                .collect(),
        }
    }

    /// Append a pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Value for a key, compared as an option key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let wanted = option_key(key);
        self.pairs
            .iter()
            .find(|(k, _)| option_key(k) == wanted)
            .map(|(_, v)| v.as_str())
    }

    /// Whether both queries select the same values, comparing keys as
    /// option keys and ignoring pair order.
    pub fn same_selection(&self, other: &VariantQuery) -> bool {
        self.pairs.len() == other.pairs.len()
            && self
                .pairs
                .iter()
                .all(|(key, value)| other.get(key) == Some(value.as_str()))
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Option assignments named by this query, in product option order.
    ///
    /// Values are normalized to the product's spelling when they match a
    /// declared value; unknown values are kept so they resolve to nothing.
    pub fn selected_options(&self, product: &Product) -> Vec<VariantOption> {
        product
            .options
            .iter()
            .filter_map(|option| {
                let raw = self.get(&option.name)?;
                let value = option.canonical_value(raw).unwrap_or(raw);
                Some(VariantOption::new(option.name.clone(), value))
            })
            .collect()
    }
}

impl fmt::Display for VariantQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", encode_component(key), encode_component(value))?;
        }
        Ok(())
    }
}

/// URL key for an option name: `"Frame Color"` becomes `"frame-color"`.
pub fn option_key(name: &str) -> String {
    name.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Resolve the variant a query selects on `product`.
///
/// Returns `None` when the query names a combination that does not exist.
pub fn resolve_variant<'a>(product: &'a Product, query: &VariantQuery) -> Option<&'a ProductVariant> {
    let selection = query.selected_options(product);
    if selection.is_empty() {
        return product.selected_or_first_available_variant();
    }

    let mut candidates = product.own_variants().filter(|v| v.matches(&selection));
    let first = candidates.next()?;
    if first.available_for_sale {
        return Some(first);
    }
    Some(candidates.find(|v| v.available_for_sale).unwrap_or(first))
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
