//! Request lifecycle tracking.
//!
//! A page request runs two data tiers side by side:
//!
//! ```text
//! Start -> FetchingCritical -> CriticalReady | CriticalFailed (terminal)
//! Start -> FetchingDeferred -> DeferredReady | DeferredFailed
//! ```
//!
//! followed by the streaming phases once critical data is ready.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle phases for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Request received, processing started.
    Start,
    /// Critical fetches issued.
    FetchingCritical,
    /// All critical fetches succeeded.
    CriticalReady,
    /// A critical fetch failed; the request fails.
    CriticalFailed(String),
    /// Deferred fetch for a named section issued.
    FetchingDeferred(String),
    /// Deferred data for a section resolved.
    DeferredReady(String),
    /// Deferred data for a section failed and was replaced by nothing.
    DeferredFailed(String),
    /// Shell HTML has been flushed to client.
    ShellSent,
    /// A named section has been sent.
    SectionSent(String),
    /// Request completed successfully.
    Completion,
    /// An error occurred.
    Error(String),
}

impl LifecyclePhase {
    /// Short name for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            LifecyclePhase::Start => "start",
            LifecyclePhase::FetchingCritical => "fetching_critical",
            LifecyclePhase::CriticalReady => "critical_ready",
            LifecyclePhase::CriticalFailed(_) => "critical_failed",
            LifecyclePhase::FetchingDeferred(_) => "fetching_deferred",
            LifecyclePhase::DeferredReady(_) => "deferred_ready",
            LifecyclePhase::DeferredFailed(_) => "deferred_failed",
            LifecyclePhase::ShellSent => "shell_sent",
            LifecyclePhase::SectionSent(_) => "section_sent",
            LifecyclePhase::Completion => "completion",
            LifecyclePhase::Error(_) => "error",
        }
    }

    /// Phases after which the request produces no further output.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LifecyclePhase::CriticalFailed(_) | LifecyclePhase::Completion | LifecyclePhase::Error(_)
        )
    }
}

/// Timing context for observability.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Create a new timing context.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Mark section sent.
    pub fn mark_section_sent(&mut self, section: &str) {
        self.mark(&format!("section_{}_sent", section));
    }

    /// Get elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time from request start to a mark.
    pub fn since_start(&self, mark: &str) -> Option<Duration> {
        self.marks.get(mark).map(|t| t.duration_since(self.start))
    }

    /// Get time to shell flush.
    pub fn time_to_shell(&self) -> Option<Duration> {
        self.since_start("shell_sent")
    }

    /// Get time to first section.
    pub fn time_to_first_section(&self) -> Option<Duration> {
        self.marks
            .iter()
            .filter(|(k, _)| k.ends_with("_sent") && k.starts_with("section_"))
            .map(|(_, t)| t.duration_since(self.start))
            .min()
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer trait for lifecycle events.
pub trait LifecycleObserver: Send + Sync {
    /// Called when a lifecycle phase occurs.
    fn on_phase(&self, phase: LifecyclePhase, elapsed: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases() {
        assert!(LifecyclePhase::CriticalFailed("boom".into()).is_terminal());
        assert!(!LifecyclePhase::DeferredFailed("recommended".into()).is_terminal());
        assert_eq!(LifecyclePhase::FetchingDeferred("x".into()).name(), "fetching_deferred");
    }

    #[test]
    fn test_timing_marks() {
        let mut timing = TimingContext::new();
        assert!(timing.time_to_shell().is_none());
        timing.mark("shell_sent");
        timing.mark_section_sent("featured");
        assert!(timing.time_to_shell().is_some());
        assert!(timing.time_to_first_section().is_some());
        assert!(timing.since_start("missing").is_none());
    }
}
