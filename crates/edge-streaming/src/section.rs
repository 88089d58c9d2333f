//! Section abstraction for independently streamable page parts.

/// Which data tier a section renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionTier {
    /// Rendered in order, before the response continues.
    #[default]
    Critical,
    /// Rendered as a placeholder first and swapped in when its data settles.
    Deferred,
}

/// A section is a named, independently-streamable part of the page.
#[derive(Debug, Clone)]
pub struct Section {
    /// Section name (used for timing, ids and identification).
    pub name: String,
    pub tier: SectionTier,
    /// HTML shown until a deferred section arrives.
    pub placeholder: String,
}

impl Section {
    /// Create a critical section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tier: SectionTier::Critical,
            placeholder: String::new(),
        }
    }

    /// Create a deferred section with a loading placeholder.
    pub fn deferred(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tier: SectionTier::Deferred,
            placeholder: placeholder.into(),
        }
    }

    /// Create a section using the builder.
    pub fn builder(name: impl Into<String>) -> SectionBuilder {
        SectionBuilder::new(name)
    }

    /// DOM id of the section container.
    pub fn dom_id(&self) -> String {
        format!("section-{}", self.name)
    }

    /// Wrap rendered HTML in the section container.
    pub fn wrap(&self, html: &str) -> String {
        format!(
            r#"<div id="{}" data-section="{}">{}</div>"#,
            self.dom_id(),
            self.name,
            html
        )
    }

    /// Container holding the placeholder of a deferred section.
    pub fn placeholder_html(&self) -> String {
        format!(
            r#"<div id="{}" data-section="{}" data-pending="true">{}</div>"#,
            self.dom_id(),
            self.name,
            self.placeholder
        )
    }

    /// Late-arriving content for a deferred section, with the inline script
    /// that moves it into the placeholder's container.
    pub fn swap_html(&self, html: &str) -> String {
        let id = self.dom_id();
        format!(
            concat!(
                r#"<template id="{id}-content">{html}</template>"#,
                r#"<script>(function(){{var t=document.getElementById("{id}-content"),"#,
                r#"s=document.getElementById("{id}");if(t&&s){{s.replaceChildren(t.content);"#,
                r#"s.removeAttribute("data-pending");t.remove();}}}})();</script>"#
            ),
            id = id,
            html = html
        )
    }
}

/// Builder for ergonomic section definition.
pub struct SectionBuilder {
    name: String,
    tier: SectionTier,
    placeholder: String,
}

impl SectionBuilder {
    /// Create a new section builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tier: SectionTier::Critical,
            placeholder: String::new(),
        }
    }

    /// Render from deferred data.
    pub fn deferred(mut self) -> Self {
        self.tier = SectionTier::Deferred;
        self
    }

    /// Set placeholder HTML.
    pub fn with_placeholder(mut self, html: impl Into<String>) -> Self {
        self.placeholder = html.into();
        self
    }

    /// Build the section.
    pub fn build(self) -> Section {
        Section {
            name: self.name,
            tier: self.tier,
            placeholder: self.placeholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let section = Section::builder("recommended")
            .deferred()
            .with_placeholder("<p>Loading...</p>")
            .build();
        assert_eq!(section.tier, SectionTier::Deferred);
        assert_eq!(
            section.placeholder_html(),
            r#"<div id="section-recommended" data-section="recommended" data-pending="true"><p>Loading...</p></div>"#
        );
    }

    #[test]
    fn test_swap_targets_placeholder() {
        let section = Section::deferred("recommended", "");
        let html = section.swap_html("<ul></ul>");
        assert!(html.starts_with(r#"<template id="section-recommended-content"><ul></ul></template>"#));
        assert!(html.contains(r#"document.getElementById("section-recommended")"#));
    }
}
