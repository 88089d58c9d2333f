//! Platform-controlled streaming sink.

use std::fmt::Display;

use edge_core::{LifecyclePhase, TimingContext, WorkloadError};
use futures::{Sink, SinkExt};

use crate::section::Section;

/// State of the streaming sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    /// Initial state, shell not yet sent.
    Initial,
    /// Shell has been sent, sections can be streamed.
    ShellSent,
    /// Response has been completed.
    Completed,
}

/// Platform-controlled streaming sink that enforces the shell-first pattern.
///
/// Generic over the underlying sink so it works with any `Sink<Vec<u8>>`,
/// including Spin's `OutgoingBody` and a plain `Vec<Vec<u8>>` in tests.
///
/// Deferred sections are announced with [`send_placeholder`](Self::send_placeholder)
/// and must be settled with [`send_deferred`](Self::send_deferred) before the
/// response can complete, so a page never ends with a spinner in it.
pub struct StreamingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    inner: S,
    state: SinkState,
    timing: TimingContext,
    sections_sent: Vec<String>,
    pending: Vec<String>,
}

impl<S, E> StreamingSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    /// Create a new streaming sink.
    pub fn new(sink: S, timing: TimingContext) -> Self {
        Self {
            inner: sink,
            state: SinkState::Initial,
            timing,
            sections_sent: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Send the shell HTML. Must be called before any sections.
    pub async fn send_shell(&mut self, html: &str) -> Result<(), WorkloadError> {
        if self.state != SinkState::Initial {
            return Err(WorkloadError::StreamError(
                "Shell already sent or sink completed".to_string(),
            ));
        }

        self.timing.mark("shell_start");
        self.write(html.as_bytes().to_vec()).await?;
        self.timing.mark("shell_sent");
        self.state = SinkState::ShellSent;

        Ok(())
    }

    /// Send a rendered section. Shell must be sent first.
    pub async fn send_section(&mut self, section: &Section, html: &str) -> Result<(), WorkloadError> {
        self.ensure_streaming()?;

        self.write(section.wrap(html).into_bytes()).await?;
        self.timing.mark_section_sent(&section.name);
        self.sections_sent.push(section.name.clone());

        Ok(())
    }

    /// Send the placeholder of a deferred section.
    pub async fn send_placeholder(&mut self, section: &Section) -> Result<(), WorkloadError> {
        self.ensure_streaming()?;
        if self.pending.contains(&section.name) {
            return Err(WorkloadError::StreamError(format!(
                "Placeholder for {} already sent",
                section.name
            )));
        }

        self.write(section.placeholder_html().into_bytes()).await?;
        self.pending.push(section.name.clone());

        Ok(())
    }

    /// Send the settled content of a deferred section, replacing its placeholder.
    pub async fn send_deferred(&mut self, section: &Section, html: &str) -> Result<(), WorkloadError> {
        self.ensure_streaming()?;
        let Some(index) = self.pending.iter().position(|name| *name == section.name) else {
            return Err(WorkloadError::StreamError(format!(
                "No placeholder sent for {}",
                section.name
            )));
        };

        self.write(section.swap_html(html).into_bytes()).await?;
        self.pending.remove(index);
        self.timing.mark_section_sent(&section.name);
        self.sections_sent.push(section.name.clone());

        Ok(())
    }

    /// Send raw bytes. Shell must be sent first.
    pub async fn send_raw(&mut self, bytes: Vec<u8>) -> Result<(), WorkloadError> {
        self.ensure_streaming()?;
        self.write(bytes).await
    }

    /// Send the closing HTML and complete the response.
    pub async fn finish(&mut self, closing_html: &str) -> Result<(), WorkloadError> {
        self.ensure_streaming()?;
        if let Some(name) = self.pending.first() {
            return Err(WorkloadError::SectionFailed(
                name.clone(),
                "deferred section never settled".to_string(),
            ));
        }

        self.write(closing_html.as_bytes().to_vec()).await?;
        self.inner
            .close()
            .await
            .map_err(|e| WorkloadError::StreamError(e.to_string()))?;
        self.complete()
    }

    /// Mark the response complete.
    pub fn complete(&mut self) -> Result<(), WorkloadError> {
        self.state = SinkState::Completed;
        self.timing.mark("complete");
        Ok(())
    }

    /// Get the list of sections sent.
    pub fn sections_sent(&self) -> &[String] {
        &self.sections_sent
    }

    /// Deferred sections whose placeholder is still showing.
    pub fn pending_sections(&self) -> &[String] {
        &self.pending
    }

    /// Get the current lifecycle phase.
    pub fn phase(&self) -> LifecyclePhase {
        match self.state {
            SinkState::Initial => LifecyclePhase::Start,
            SinkState::ShellSent => match self.sections_sent.last() {
                Some(name) => LifecyclePhase::SectionSent(name.clone()),
                None => LifecyclePhase::ShellSent,
            },
            SinkState::Completed => LifecyclePhase::Completion,
        }
    }

    /// Get timing context reference.
    pub fn timing(&self) -> &TimingContext {
        &self.timing
    }

    /// Get mutable access to the underlying sink for advanced use.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the sink and return the inner value.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn ensure_streaming(&self) -> Result<(), WorkloadError> {
        match self.state {
            SinkState::Initial => Err(WorkloadError::ShellNotSent),
            SinkState::Completed => Err(WorkloadError::StreamError(
                "Sink already completed".to_string(),
            )),
            SinkState::ShellSent => Ok(()),
        }
    }

    async fn write(&mut self, bytes: Vec<u8>) -> Result<(), WorkloadError> {
        self.inner
            .send(bytes)
            .await
            .map_err(|e| WorkloadError::StreamError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> StreamingSink<Vec<Vec<u8>>, std::convert::Infallible> {
        StreamingSink::new(Vec::new(), TimingContext::new())
    }

    fn body(sink: StreamingSink<Vec<Vec<u8>>, std::convert::Infallible>) -> String {
        String::from_utf8(sink.into_inner().concat()).unwrap()
    }

    #[tokio::test]
    async fn test_section_before_shell_is_rejected() {
        let mut sink = sink();
        let err = sink.send_section(&Section::new("product"), "<h1>Tee</h1>").await.unwrap_err();
        assert!(matches!(err, WorkloadError::ShellNotSent));
        assert_eq!(sink.phase(), LifecyclePhase::Start);
    }

    #[tokio::test]
    async fn test_shell_then_sections_in_order() {
        let mut sink = sink();
        let deferred = Section::deferred("recommended", "<p>Loading</p>");
        sink.send_shell("<html>").await.unwrap();
        assert_eq!(sink.phase(), LifecyclePhase::ShellSent);

        sink.send_section(&Section::new("product"), "<h1>Tee</h1>").await.unwrap();
        sink.send_placeholder(&deferred).await.unwrap();
        assert_eq!(sink.pending_sections(), ["recommended".to_string()]);
        sink.send_deferred(&deferred, "<ul></ul>").await.unwrap();
        sink.finish("</html>").await.unwrap();

        assert_eq!(sink.phase(), LifecyclePhase::Completion);
        assert_eq!(sink.sections_sent(), ["product".to_string(), "recommended".to_string()]);
        assert!(sink.timing().time_to_shell().is_some());

        let html = body(sink);
        let shell = html.find("<html>").unwrap();
        let product = html.find("<h1>Tee</h1>").unwrap();
        let placeholder = html.find("<p>Loading</p>").unwrap();
        let late = html.find("<ul></ul>").unwrap();
        assert!(shell < product && product < placeholder && placeholder < late);
        assert!(html.ends_with("</html>"));
    }

    #[tokio::test]
    async fn test_unsettled_deferred_blocks_finish() {
        let mut sink = sink();
        sink.send_shell("<html>").await.unwrap();
        sink.send_placeholder(&Section::deferred("recommended", "")).await.unwrap();
        let err = sink.finish("</html>").await.unwrap_err();
        assert!(matches!(err, WorkloadError::SectionFailed(name, _) if name == "recommended"));
    }

    #[tokio::test]
    async fn test_deferred_without_placeholder_is_rejected() {
        let mut sink = sink();
        sink.send_shell("<html>").await.unwrap();
        let err = sink
            .send_deferred(&Section::deferred("recommended", ""), "<ul></ul>")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkloadError::StreamError(_)));
    }

    #[tokio::test]
    async fn test_shell_sent_twice() {
        let mut sink = sink();
        sink.send_shell("<html>").await.unwrap();
        assert!(sink.send_shell("<html>").await.is_err());
    }
}
