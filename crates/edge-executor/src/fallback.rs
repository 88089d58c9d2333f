//! Fallback strategies for deferred sections whose data did not arrive.

/// What to render in place of a deferred section that resolved to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FallbackStrategy {
    /// Render fallback HTML.
    RenderFallback(String),

    /// Render the section empty.
    #[default]
    Skip,
}

impl FallbackStrategy {
    /// Create a fallback that renders custom HTML.
    pub fn html(html: impl Into<String>) -> Self {
        Self::RenderFallback(html.into())
    }

    /// Create a fallback that shows a short notice.
    pub fn message(message: &str) -> Self {
        Self::RenderFallback(format!(
            r#"<p class="section-notice">{}</p>"#,
            html_escape(message)
        ))
    }
}

/// Configuration for a deferred section's fallback behavior.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FallbackConfig {
    /// The fallback strategy.
    pub strategy: FallbackStrategy,
}

impl FallbackConfig {
    /// Create a new fallback configuration.
    pub fn new(strategy: FallbackStrategy) -> Self {
        Self { strategy }
    }
}

/// Result of applying a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackResult {
    /// Rendered fallback HTML.
    Rendered(String),
    /// Section is left empty.
    Skipped,
}

impl FallbackResult {
    /// HTML to stream for the section.
    pub fn into_html(self) -> String {
        match self {
            FallbackResult::Rendered(html) => html,
            FallbackResult::Skipped => String::new(),
        }
    }
}

/// Apply fallback strategy to get a result.
pub fn apply_fallback(config: &FallbackConfig) -> FallbackResult {
    match &config.strategy {
        FallbackStrategy::RenderFallback(html) => FallbackResult::Rendered(html.clone()),
        FallbackStrategy::Skip => FallbackResult::Skipped,
    }
}

/// Simple HTML escape for fallback messages.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
