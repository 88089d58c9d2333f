//! Request context with locale and typed parameters.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::lifecycle::TimingContext;

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = format!(
            "{:x}-{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        Self(id)
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extracted route parameters (e.g., `:handle` from `/products/:handle`).
pub type RouteParams = HashMap<String, String>;

/// HTTP headers.
pub type Headers = HashMap<String, String>;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl From<&http::Method> for Method {
    fn from(method: &http::Method) -> Self {
        match *method {
            http::Method::POST => Method::Post,
            http::Method::PUT => Method::Put,
            http::Method::DELETE => Method::Delete,
            http::Method::PATCH => Method::Patch,
            http::Method::HEAD => Method::Head,
            http::Method::OPTIONS => Method::Options,
            _ => Method::Get,
        }
    }
}

/// Buyer locale: catalog language and country codes.
///
/// Codes are stored upper-case (`"FR"`, `"CA"`); the URL prefix is the
/// lower-case pair, `/fr-ca`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub country: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("EN", "US")
    }
}

impl Locale {
    pub fn new(language: &str, country: &str) -> Self {
        Self {
            language: language.to_uppercase(),
            country: country.to_uppercase(),
        }
    }

    /// Parse a `{language}-{country}` path segment such as `fr-ca`.
    pub fn from_segment(segment: &str) -> Option<Self> {
        let (language, country) = segment.split_once('-')?;
        let is_code = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_alphabetic());
        if is_code(language) && is_code(country) {
            Some(Self::new(language, country))
        } else {
            None
        }
    }

    /// Split a leading locale segment off a path.
    ///
    /// `/fr-ca/products/tee` gives `(Some(fr-CA), "/products/tee")`; a path
    /// without a locale segment is returned unchanged.
    pub fn split_path(path: &str) -> (Option<Self>, &str) {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let (first, rest) = match trimmed.find('/') {
            Some(i) => (&trimmed[..i], &trimmed[i..]),
            None => (trimmed, ""),
        };
        match Self::from_segment(first) {
            Some(locale) if rest.is_empty() => (Some(locale), "/"),
            Some(locale) => (Some(locale), rest),
            None => (None, path),
        }
    }

    /// URL prefix for this locale, e.g. `/fr-ca`.
    pub fn path_prefix(&self) -> String {
        format!("/{}-{}", self.language.to_lowercase(), self.country.to_lowercase())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.language.to_lowercase(), self.country)
    }
}

/// Typed request context passed to page handlers.
#[derive(Debug)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request path with any locale prefix removed.
    pub path: String,
    /// Buyer locale.
    pub locale: Locale,
    /// Prefix for links generated on this page ("" or e.g. "/fr-ca").
    pub path_prefix: String,
    /// Raw query string, without the leading `?`.
    pub raw_query: String,
    /// Extracted route parameters.
    pub params: RouteParams,
    /// HTTP headers.
    pub headers: Headers,
    /// Timing context for observability.
    pub timing: TimingContext,
}

impl RequestContext {
    /// Create a context for a path, which may carry a query string and a
    /// locale prefix.
    pub fn new(method: Method, url: &str, default_locale: &Locale) -> Self {
        let (path, raw_query) = match url.split_once('?') {
            Some((path, query)) => (path, query.to_string()),
            None => (url, String::new()),
        };
        let (locale, path) = Locale::split_path(path);
        let path_prefix = locale.as_ref().map(Locale::path_prefix).unwrap_or_default();

        Self {
            request_id: RequestId::generate(),
            method,
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            locale: locale.unwrap_or_else(|| default_locale.clone()),
            path_prefix,
            raw_query,
            params: HashMap::new(),
            headers: HashMap::new(),
            timing: TimingContext::new(),
        }
    }

    /// Attach a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Prefix a site path with this request's locale prefix.
    pub fn localized(&self, path: &str) -> String {
        format!("{}{}", self.path_prefix, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_segment() {
        assert_eq!(Locale::from_segment("fr-ca"), Some(Locale::new("FR", "CA")));
        assert_eq!(Locale::from_segment("products"), None);
        assert_eq!(Locale::from_segment("fra-ca"), None);
        assert_eq!(Locale::new("fr", "ca").path_prefix(), "/fr-ca");
    }

    #[test]
    fn test_split_path() {
        assert_eq!(
            Locale::split_path("/fr-ca/products/tee"),
            (Some(Locale::new("fr", "ca")), "/products/tee")
        );
        assert_eq!(Locale::split_path("/fr-ca"), (Some(Locale::new("fr", "ca")), "/"));
        assert_eq!(Locale::split_path("/products/tee"), (None, "/products/tee"));
        assert_eq!(Locale::split_path("/"), (None, "/"));
    }

    #[test]
    fn test_context_from_url() {
        let ctx = RequestContext::new(Method::Get, "/de-de/products/tee?color=Blue", &Locale::default());
        assert_eq!(ctx.path, "/products/tee");
        assert_eq!(ctx.locale, Locale::new("DE", "DE"));
        assert_eq!(ctx.raw_query, "color=Blue");
        assert_eq!(ctx.localized("/collections/all"), "/de-de/collections/all");

        let ctx = RequestContext::new(Method::Get, "/", &Locale::default());
        assert_eq!(ctx.locale, Locale::default());
        assert_eq!(ctx.path_prefix, "");
        assert_eq!(ctx.localized("/"), "/");
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::generate(), RequestId::generate());
    }

    #[test]
    fn test_header_lookup() {
        let ctx = RequestContext::new(Method::Get, "/", &Locale::default()).with_header("X-Request-Id", "abc");
        assert_eq!(ctx.header("x-request-id"), Some("abc"));
    }
}
