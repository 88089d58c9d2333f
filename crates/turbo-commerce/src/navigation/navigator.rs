//! Navigation actions for option value clicks.

use serde::{Deserialize, Serialize};

use crate::catalog::{OptionValue, VariantQuery};
use crate::navigation::{NavigateOptions, NavigationContext};

/// Where a cross-resource link points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantLocator {
    pub handle: String,
    pub query: VariantQuery,
}

impl VariantLocator {
    pub fn new(handle: impl Into<String>, query: VariantQuery) -> Self {
        Self {
            handle: handle.into(),
            query,
        }
    }

    /// Canonical product path with the variant query.
    pub fn href(&self) -> String {
        self.href_in("")
    }

    /// Same as [`href`](Self::href) under a path prefix such as `/fr-ca`.
    pub fn href_in(&self, prefix: &str) -> String {
        let prefix = prefix.trim_end_matches('/');
        if self.query.is_empty() {
            format!("{}/products/{}", prefix, self.handle)
        } else {
            format!("{}/products/{}?{}", prefix, self.handle, self.query)
        }
    }
}

/// What clicking an option value does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationAction {
    /// Already selected, or nothing to go to.
    NoOp,
    /// Rendered as a real hyperlink to another product resource.
    CrossResourceLink(VariantLocator),
    /// Replace the query of the current location.
    InPlaceQueryUpdate(VariantQuery),
}

/// Decide the action for a classified option value.
pub fn navigate(value: &OptionValue) -> NavigationAction {
    if value.selected || !value.exists {
        NavigationAction::NoOp
    } else if value.is_different_resource {
        NavigationAction::CrossResourceLink(VariantLocator::new(
            value.handle.clone(),
            value.target_locator.clone(),
        ))
    } else {
        NavigationAction::InPlaceQueryUpdate(value.target_locator.clone())
    }
}

/// Result of applying a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Nothing changed.
    Unchanged,
    /// The current entry now carries this query.
    QueryReplaced(VariantQuery),
    /// The caller follows this link like any anchor.
    FollowLink(String),
}

/// Intent-driven prefetch of a same-resource variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefetchRequest {
    pub handle: String,
    pub query: VariantQuery,
}

/// Applies navigation actions to an injected context.
pub struct VariantNavigator<C> {
    context: C,
}

impl<C: NavigationContext> VariantNavigator<C> {
    pub fn new(context: C) -> Self {
        Self { context }
    }

    /// Apply a click on `value`.
    ///
    /// In-place updates replace the current entry and keep the scroll
    /// position; firing the same update twice replaces once.
    pub fn select(&mut self, value: &OptionValue) -> NavigationOutcome {
        match navigate(value) {
            NavigationAction::NoOp => NavigationOutcome::Unchanged,
            NavigationAction::CrossResourceLink(locator) => NavigationOutcome::FollowLink(locator.href()),
            NavigationAction::InPlaceQueryUpdate(query) => {
                let current = VariantQuery::parse(&self.context.location().search);
                if current.same_selection(&query) {
                    return NavigationOutcome::Unchanged;
                }
                self.context.replace(&query, NavigateOptions::in_place());
                NavigationOutcome::QueryReplaced(query)
            }
        }
    }

    /// Prefetch request for hover or focus on `value`, if worthwhile.
    pub fn prefetch(&self, value: &OptionValue) -> Option<PrefetchRequest> {
        match navigate(value) {
            NavigationAction::InPlaceQueryUpdate(query) => Some(PrefetchRequest {
                handle: value.handle.clone(),
                query,
            }),
            _ => None,
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::MemoryHistory;

    fn value(name: &str) -> OptionValue {
        OptionValue {
            name: name.to_string(),
            handle: "tee".to_string(),
            target_locator: VariantQuery::new().with("color", name),
            selected: false,
            available: true,
            exists: true,
            is_different_resource: false,
            swatch: None,
        }
    }

    #[test]
    fn test_selected_is_noop() {
        let mut v = value("Red");
        v.selected = true;
        assert_eq!(navigate(&v), NavigationAction::NoOp);
    }

    #[test]
    fn test_missing_is_noop_even_if_available() {
        let mut v = value("Green");
        v.exists = false;
        v.available = true;
        assert_eq!(navigate(&v), NavigationAction::NoOp);
        v.is_different_resource = true;
        assert_eq!(navigate(&v), NavigationAction::NoOp);
    }

    #[test]
    fn test_different_resource_is_link() {
        let mut v = value("Glass");
        v.handle = "glass-mug".to_string();
        v.is_different_resource = true;
        v.available = false;
        match navigate(&v) {
            NavigationAction::CrossResourceLink(locator) => {
                assert_eq!(locator.href(), "/products/glass-mug?color=Glass");
                assert_eq!(locator.href_in("/fr-ca/"), "/fr-ca/products/glass-mug?color=Glass");
            }
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_value_still_navigates() {
        let mut v = value("Blue");
        v.available = false;
        assert_eq!(
            navigate(&v),
            NavigationAction::InPlaceQueryUpdate(VariantQuery::parse("color=Blue"))
        );
    }

    #[test]
    fn test_select_replaces_once() {
        let history = MemoryHistory::new("/products/tee", "color=Red");
        let mut navigator = VariantNavigator::new(history);
        let blue = value("Blue");

        assert_eq!(
            navigator.select(&blue),
            NavigationOutcome::QueryReplaced(VariantQuery::parse("color=Blue"))
        );
        assert_eq!(navigator.select(&blue), NavigationOutcome::Unchanged);

        let history = navigator.into_context();
        assert_eq!(history.len(), 1);
        assert_eq!(history.replacements(), 1);
        assert_eq!(history.location().search, "color=Blue");
        assert_eq!(history.location().path, "/products/tee");
    }

    #[test]
    fn test_select_matches_location_keys_loosely() {
        let history = MemoryHistory::new("/products/tee", "?Color=Blue");
        let mut navigator = VariantNavigator::new(history);
        assert_eq!(navigator.select(&value("Blue")), NavigationOutcome::Unchanged);
        assert_eq!(navigator.context().replacements(), 0);

        // Values stay exact.
        let history = MemoryHistory::new("/products/tee", "COLOR=blue");
        let mut navigator = VariantNavigator::new(history);
        assert_eq!(
            navigator.select(&value("Blue")),
            NavigationOutcome::QueryReplaced(VariantQuery::parse("color=Blue"))
        );
    }

    #[test]
    fn test_select_keeps_scroll_position() {
        let mut history = MemoryHistory::new("/products/tee", "");
        history.set_scroll_position(640);
        let mut navigator = VariantNavigator::new(history);
        navigator.select(&value("Blue"));
        assert_eq!(navigator.context().scroll_position(), 640);
    }

    #[test]
    fn test_select_link_does_not_touch_history() {
        let mut v = value("Glass");
        v.handle = "glass-mug".to_string();
        v.is_different_resource = true;
        let mut navigator = VariantNavigator::new(MemoryHistory::new("/products/mug-set", ""));
        assert_eq!(
            navigator.select(&v),
            NavigationOutcome::FollowLink("/products/glass-mug?color=Glass".to_string())
        );
        assert_eq!(navigator.context().replacements(), 0);
    }

    #[test]
    fn test_prefetch_only_same_resource() {
        let navigator = VariantNavigator::new(MemoryHistory::new("/products/tee", "color=Red"));
        let request = navigator.prefetch(&value("Blue")).unwrap();
        assert_eq!(request.handle, "tee");
        assert_eq!(request.query.to_string(), "color=Blue");

        let mut link = value("Glass");
        link.is_different_resource = true;
        assert!(navigator.prefetch(&link).is_none());

        let mut selected = value("Red");
        selected.selected = true;
        assert!(navigator.prefetch(&selected).is_none());
        assert_eq!(navigator.context().location().search, "color=Red");
    }
}
