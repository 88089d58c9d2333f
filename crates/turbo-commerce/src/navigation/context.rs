//! Navigation context abstraction.
//!
//! The navigator never reaches for a global history object. Whatever owns the
//! location (a browser shim, a test harness) implements [`NavigationContext`].

use crate::catalog::VariantQuery;

/// Path and raw query (without `?`) of a location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub search: String,
}

impl Location {
    pub fn new(path: impl Into<String>, search: impl Into<String>) -> Self {
        let search = search.into();
        Self {
            path: path.into(),
            search: search.strip_prefix('?').map(str::to_string).unwrap_or(search),
        }
    }

    /// Path and query as a URL reference.
    pub fn href(&self) -> String {
        if self.search.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.search)
        }
    }
}

/// How a query update is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing one.
    pub replace: bool,
    /// Keep the scroll position.
    pub prevent_scroll_reset: bool,
}

impl NavigateOptions {
    /// Options for an in-page variant switch.
    pub fn in_place() -> Self {
        Self {
            replace: true,
            prevent_scroll_reset: true,
        }
    }
}

/// Owner of the current location and history.
pub trait NavigationContext {
    fn location(&self) -> &Location;

    /// Set the query of the current path.
    fn replace(&mut self, query: &VariantQuery, options: NavigateOptions);
}

/// In-process history stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
    scroll_y: u32,
    replacements: usize,
}

impl MemoryHistory {
    pub fn new(path: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            entries: vec![Location::new(path, search)],
            index: 0,
            scroll_y: 0,
            replacements: 0,
        }
    }

    /// Number of history entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    /// How many times the query was changed.
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    pub fn scroll_position(&self) -> u32 {
        self.scroll_y
    }

    pub fn set_scroll_position(&mut self, y: u32) {
        self.scroll_y = y;
    }
}

impl NavigationContext for MemoryHistory {
    fn location(&self) -> &Location {
        &self.entries[self.index]
    }

    fn replace(&mut self, query: &VariantQuery, options: NavigateOptions) {
        let next = Location::new(self.location().path.clone(), query.to_string());
        if options.replace {
            self.entries[self.index] = next;
        } else {
            self.entries.truncate(self.index + 1);
            self.entries.push(next);
            self.index = self.entries.len() - 1;
        }
        if !options.prevent_scroll_reset {
            self.scroll_y = 0;
        }
        self.replacements += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_overwrites_entry() {
        let mut history = MemoryHistory::new("/products/tee", "?color=Red");
        assert_eq!(history.location().search, "color=Red");
        history.replace(&VariantQuery::parse("color=Blue"), NavigateOptions::in_place());
        assert_eq!(history.len(), 1);
        assert_eq!(history.location().href(), "/products/tee?color=Blue");
    }

    #[test]
    fn test_push_and_scroll_reset() {
        let mut history = MemoryHistory::new("/products/tee", "");
        history.set_scroll_position(300);
        history.replace(&VariantQuery::parse("color=Blue"), NavigateOptions::default());
        assert_eq!(history.len(), 2);
        assert_eq!(history.scroll_position(), 0);
        assert_eq!(history.entries()[0].href(), "/products/tee");
    }
}
