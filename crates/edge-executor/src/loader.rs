//! Tiered page data loading.
//!
//! A page splits its data into two tiers. Critical data is required before
//! the first byte of content and is awaited; if any of it fails the request
//! fails. Deferred data is started at the same moment but handed back as a
//! [`PendingDeferred`] that the renderer awaits later. A deferred failure is
//! caught here, logged, and turned into `None`, so it can never fail the
//! page.
//!
//! Nothing is spawned: both tiers are polled together on whatever executor
//! drives the request, which on Spin is the host's own executor.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::{pin, Pin};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use async_trait::async_trait;
use edge_core::{LifecycleObserver, LifecyclePhase, RequestId};
use edge_data::CatalogError;
use futures::future::{self, BoxFuture, Either};
use futures::FutureExt;
use http::StatusCode;

use crate::fallback::{apply_fallback, FallbackConfig, FallbackResult};

/// Failure of the critical tier. Fatal to the request.
#[derive(Debug, thiserror::Error)]
pub enum CriticalLoadError {
    #[error("Critical fetch failed: {0}")]
    Fetch(CatalogError),

    #[error("{resource} not found: {handle}")]
    NotFound { resource: &'static str, handle: String },
}

impl CriticalLoadError {
    pub fn not_found(resource: &'static str, handle: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            handle: handle.into(),
        }
    }

    /// Response status for the failed page.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl From<CatalogError> for CriticalLoadError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::NotFound { resource, handle } => Self::NotFound { resource, handle },
            other => Self::Fetch(other),
        }
    }
}

/// Failure of the deferred tier. Recovered at the loader boundary.
#[derive(Debug, thiserror::Error)]
pub enum DeferredLoadError {
    #[error("Deferred fetch failed: {0}")]
    Fetch(#[from] CatalogError),

    #[error("Deferred task panicked")]
    Panicked,

    #[error("{0}")]
    Other(String),
}

/// Future producing a page's deferred data.
pub type DeferredFuture<D> = BoxFuture<'static, Result<D, DeferredLoadError>>;

/// Data access for one page.
#[async_trait]
pub trait PageLoader: Send + Sync {
    type Critical: Send;
    type Deferred: Send + 'static;

    /// Name of the deferred section, for logs and lifecycle events.
    fn deferred_section(&self) -> &'static str {
        "deferred"
    }

    /// What to render when deferred data does not arrive.
    fn deferred_fallback(&self) -> FallbackConfig {
        FallbackConfig::default()
    }

    /// Fetch everything the first render needs. Fetches should run
    /// concurrently, e.g. with `futures::try_join!`.
    async fn critical(&self) -> Result<Self::Critical, CriticalLoadError>;

    /// Build the deferred computation. It is started before `critical`.
    fn deferred(&self) -> DeferredFuture<Self::Deferred>;
}

/// Critical data plus the in-flight deferred data.
pub struct PageLoadResult<C, D> {
    pub critical: C,
    pub deferred: PendingDeferred<D>,
}

enum Pending<D> {
    Running(BoxFuture<'static, Option<D>>),
    Ready(Option<D>),
    Taken,
}

/// Deferred data that is still loading.
///
/// Resolves to `None` when the deferred fetch failed; it never fails itself.
/// The fetch makes progress while this is polled. Dropping it cancels the
/// fetch.
pub struct PendingDeferred<D> {
    section: &'static str,
    fallback: FallbackConfig,
    state: Pending<D>,
}

// No field is structurally pinned.
impl<D> Unpin for PendingDeferred<D> {}

impl<D> PendingDeferred<D> {
    /// Already-resolved deferred data.
    pub fn ready(section: &'static str, value: Option<D>) -> Self {
        Self {
            section,
            fallback: FallbackConfig::default(),
            state: Pending::Ready(value),
        }
    }

    pub fn section(&self) -> &'static str {
        self.section
    }

    /// Fallback for the section when this resolves to `None`.
    pub fn fallback(&self) -> FallbackResult {
        apply_fallback(&self.fallback)
    }

    pub fn with_fallback(mut self, fallback: FallbackConfig) -> Self {
        self.fallback = fallback;
        self
    }
}

impl<D> Future for PendingDeferred<D> {
    type Output = Option<D>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            Pending::Running(fetch) => match fetch.as_mut().poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(value) => {
                    this.state = Pending::Taken;
                    Poll::Ready(value)
                }
            },
            Pending::Ready(value) => {
                let value = value.take();
                this.state = Pending::Taken;
                Poll::Ready(value)
            }
            Pending::Taken => Poll::Ready(None),
        }
    }
}

/// Runs a [`PageLoader`] with the tiering contract.
#[derive(Clone, Default)]
pub struct TieredPageLoader {
    observer: Option<Arc<dyn LifecycleObserver>>,
    request_id: Option<RequestId>,
}

impl TieredPageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report lifecycle phases to an observer.
    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Start the deferred tier, then await the critical tier.
    ///
    /// Both tiers are polled together until the critical tier settles. If
    /// the deferred tier finished first its value is handed back ready,
    /// otherwise the unfinished fetch is handed back to be awaited later.
    pub async fn load<L: PageLoader>(
        &self,
        loader: &L,
    ) -> Result<PageLoadResult<L::Critical, L::Deferred>, CriticalLoadError> {
        let started = Instant::now();
        let request_id = self.request_id.as_ref().map(|id| id.0.clone()).unwrap_or_default();
        let section = loader.deferred_section();
        Self::notify(&self.observer, LifecyclePhase::Start, started);

        let fetch = Self::observe_deferred(
            loader.deferred(),
            section,
            self.observer.clone(),
            request_id.clone(),
            started,
        );
        let critical = pin!(async {
            Self::notify(&self.observer, LifecyclePhase::FetchingCritical, started);
            loader.critical().await
        });

        // The deferred fetch is polled first so it always starts before the
        // critical tier does.
        let (critical, state) = match future::select(fetch, critical).await {
            Either::Left((value, critical)) => (critical.await, Pending::Ready(value)),
            Either::Right((critical, fetch)) => (critical, Pending::Running(fetch)),
        };

        match critical {
            Ok(critical) => {
                tracing::debug!(
                    request_id = %request_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "critical data ready"
                );
                Self::notify(&self.observer, LifecyclePhase::CriticalReady, started);
                let deferred = PendingDeferred {
                    section,
                    fallback: loader.deferred_fallback(),
                    state,
                };
                Ok(PageLoadResult { critical, deferred })
            }
            Err(e) => {
                tracing::debug!(request_id = %request_id, error = %e, "critical data failed");
                Self::notify(&self.observer, LifecyclePhase::CriticalFailed(e.to_string()), started);
                Err(e)
            }
        }
    }

    /// The deferred fetch with its failures, panics included, turned into
    /// `None` and reported.
    fn observe_deferred<D: Send + 'static>(
        fetch: DeferredFuture<D>,
        section: &'static str,
        observer: Option<Arc<dyn LifecycleObserver>>,
        request_id: String,
        started: Instant,
    ) -> BoxFuture<'static, Option<D>> {
        async move {
            Self::notify(&observer, LifecyclePhase::FetchingDeferred(section.to_string()), started);
            let outcome = AssertUnwindSafe(fetch)
                .catch_unwind()
                .await
                .unwrap_or(Err(DeferredLoadError::Panicked));
            match outcome {
                Ok(data) => {
                    Self::notify(&observer, LifecyclePhase::DeferredReady(section.to_string()), started);
                    Some(data)
                }
                Err(e) => {
                    tracing::warn!(
                        request_id = %request_id,
                        section,
                        error = %e,
                        "deferred load failed, section renders without data"
                    );
                    Self::notify(&observer, LifecyclePhase::DeferredFailed(section.to_string()), started);
                    None
                }
            }
        }
        .boxed()
    }

    fn notify(observer: &Option<Arc<dyn LifecycleObserver>>, phase: LifecyclePhase, started: Instant) {
        if let Some(observer) = observer {
            observer.on_phase(phase, started.elapsed());
        }
    }
}

/// Wrap any future as deferred data.
pub fn deferred<D, F>(future: F) -> DeferredFuture<D>
where
    F: Future<Output = Result<D, DeferredLoadError>> + Send + 'static,
{
    Box::pin(future)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use futures::channel::oneshot;
    use futures::executor::block_on;

    use super::*;

    fn server_error() -> CatalogError {
        CatalogError::Http {
            status: 502,
            operation: "RecommendedProducts".to_string(),
        }
    }

    fn explode() -> &'static str {
        panic!("renderer bug")
    }

    struct TestPage {
        critical: Result<u32, CatalogError>,
        deferred: fn() -> DeferredFuture<&'static str>,
    }

    #[async_trait]
    impl PageLoader for TestPage {
        type Critical = u32;
        type Deferred = &'static str;

        fn deferred_section(&self) -> &'static str {
            "recommended"
        }

        async fn critical(&self) -> Result<u32, CriticalLoadError> {
            Ok(self.critical.clone()?)
        }

        fn deferred(&self) -> DeferredFuture<&'static str> {
            (self.deferred)()
        }
    }

    #[derive(Default)]
    struct Phases(Mutex<Vec<LifecyclePhase>>);

    impl LifecycleObserver for Phases {
        fn on_phase(&self, phase: LifecyclePhase, _elapsed: Duration) {
            self.0.lock().unwrap().push(phase);
        }
    }

    #[tokio::test]
    async fn test_both_tiers_succeed() {
        let page = TestPage {
            critical: Ok(7),
            deferred: || deferred(async { Ok("recs") }),
        };
        let result = TieredPageLoader::new().load(&page).await.unwrap();
        assert_eq!(result.critical, 7);
        assert_eq!(result.deferred.section(), "recommended");
        assert_eq!(result.deferred.await, Some("recs"));
    }

    #[tokio::test]
    async fn test_deferred_failure_resolves_to_none() {
        let page = TestPage {
            critical: Ok(1),
            deferred: || deferred(async { Err(DeferredLoadError::Fetch(server_error())) }),
        };
        let result = TieredPageLoader::new().load(&page).await.unwrap();
        assert_eq!(result.critical, 1);
        assert_eq!(result.deferred.await, None);
    }

    #[tokio::test]
    async fn test_deferred_panic_resolves_to_none() {
        let page = TestPage {
            critical: Ok(1),
            deferred: || deferred(async { Ok(explode()) }),
        };
        let result = TieredPageLoader::new().load(&page).await.unwrap();
        assert_eq!(result.deferred.await, None);
    }

    #[tokio::test]
    async fn test_critical_failure_fails_load() {
        let page = TestPage {
            critical: Err(server_error()),
            deferred: || deferred(async { Ok("recs") }),
        };
        let err = TieredPageLoader::new().load(&page).await.err().unwrap();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_resource_is_not_found() {
        let page = TestPage {
            critical: Err(CatalogError::NotFound {
                resource: "Product",
                handle: "nope".to_string(),
            }),
            deferred: || deferred(async { Ok("recs") }),
        };
        let err = TieredPageLoader::new().load(&page).await.err().unwrap();
        assert!(matches!(err, CriticalLoadError::NotFound { .. }));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    struct RacePage {
        started: Mutex<Option<oneshot::Sender<()>>>,
        waiting: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl PageLoader for RacePage {
        type Critical = bool;
        type Deferred = ();

        async fn critical(&self) -> Result<bool, CriticalLoadError> {
            let rx = self.waiting.lock().unwrap().take().unwrap();
            // Only completes once the deferred fetch has run.
            Ok(rx.await.is_ok())
        }

        fn deferred(&self) -> DeferredFuture<()> {
            let tx = self.started.lock().unwrap().take();
            deferred(async move {
                if let Some(tx) = tx {
                    let _ = tx.send(());
                }
                Ok(())
            })
        }
    }

    // Plain executor, no tokio runtime: the loader must not depend on one.
    #[test]
    fn test_deferred_starts_before_critical_completes() {
        let (tx, rx) = oneshot::channel();
        let page = RacePage {
            started: Mutex::new(Some(tx)),
            waiting: Mutex::new(Some(rx)),
        };
        let result = block_on(TieredPageLoader::new().load(&page)).unwrap();
        assert!(result.critical, "critical tier finished without seeing deferred start");
        assert_eq!(block_on(result.deferred), Some(()));
    }

    struct GatedPage {
        gate: Mutex<Option<oneshot::Receiver<&'static str>>>,
    }

    #[async_trait]
    impl PageLoader for GatedPage {
        type Critical = u32;
        type Deferred = &'static str;

        async fn critical(&self) -> Result<u32, CriticalLoadError> {
            Ok(5)
        }

        fn deferred(&self) -> DeferredFuture<&'static str> {
            let gate = self.gate.lock().unwrap().take();
            deferred(async move {
                match gate {
                    Some(gate) => gate.await.map_err(|e| DeferredLoadError::Other(e.to_string())),
                    None => Err(DeferredLoadError::Other("no gate".into())),
                }
            })
        }
    }

    #[test]
    fn test_deferred_resolves_after_load_without_runtime() {
        let (tx, rx) = oneshot::channel();
        let page = GatedPage {
            gate: Mutex::new(Some(rx)),
        };
        let result = block_on(TieredPageLoader::new().load(&page)).unwrap();
        assert_eq!(result.critical, 5);

        tx.send("recs").unwrap();
        assert_eq!(block_on(result.deferred), Some("recs"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_pending_cancels_fetch() {
        static DONE: AtomicBool = AtomicBool::new(false);
        let page = TestPage {
            critical: Ok(1),
            deferred: || {
                deferred(async {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    DONE.store(true, Ordering::SeqCst);
                    Ok("late")
                })
            },
        };
        let result = TieredPageLoader::new().load(&page).await.unwrap();
        drop(result.deferred);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!DONE.load(Ordering::SeqCst));
    }

    /// Critical tier made of two independent 100 ms fetches.
    struct FanOutPage {
        failing: Option<&'static str>,
    }

    impl FanOutPage {
        async fn fetch(&self, name: &'static str, value: u32) -> Result<u32, CatalogError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if self.failing == Some(name) {
                return Err(CatalogError::Http {
                    status: 500,
                    operation: name.to_string(),
                });
            }
            Ok(value)
        }
    }

    #[async_trait]
    impl PageLoader for FanOutPage {
        type Critical = (u32, u32);
        type Deferred = ();

        async fn critical(&self) -> Result<(u32, u32), CriticalLoadError> {
            Ok(futures::try_join!(self.fetch("Product", 1), self.fetch("Collection", 2))?)
        }

        fn deferred(&self) -> DeferredFuture<()> {
            deferred(async { Ok(()) })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_critical_fetches_run_concurrently() {
        let started = tokio::time::Instant::now();
        let result = TieredPageLoader::new()
            .load(&FanOutPage { failing: None })
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(result.critical, (1, 2));
        assert!(elapsed >= Duration::from_millis(100), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(200), "fetches ran one after another: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_any_critical_fetch_failure_fails_load() {
        for failing in ["Product", "Collection"] {
            let err = TieredPageLoader::new()
                .load(&FanOutPage { failing: Some(failing) })
                .await
                .err()
                .unwrap();
            assert!(matches!(&err, CriticalLoadError::Fetch(CatalogError::Http { operation, .. }) if operation == failing));
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn test_lifecycle_phases() {
        let phases = Arc::new(Phases::default());
        let loader = TieredPageLoader::new().with_observer(phases.clone());
        let page = TestPage {
            critical: Ok(1),
            deferred: || deferred(async { Err(DeferredLoadError::Other("down".into())) }),
        };
        let result = loader.load(&page).await.unwrap();
        assert_eq!(result.deferred.await, None);

        let seen = phases.0.lock().unwrap().clone();
        assert_eq!(seen[0], LifecyclePhase::Start);
        assert!(seen.contains(&LifecyclePhase::FetchingCritical));
        assert!(seen.contains(&LifecyclePhase::CriticalReady));
        assert!(seen.contains(&LifecyclePhase::DeferredFailed("recommended".to_string())));
        let deferred_at = seen
            .iter()
            .position(|p| *p == LifecyclePhase::FetchingDeferred("recommended".to_string()));
        let critical_at = seen.iter().position(|p| *p == LifecyclePhase::FetchingCritical);
        let ready_at = seen.iter().position(|p| *p == LifecyclePhase::CriticalReady);
        assert!(deferred_at.is_some() && deferred_at < critical_at);
        assert!(critical_at < ready_at);
    }

    #[tokio::test]
    async fn test_ready_pending_and_fallback() {
        let pending = PendingDeferred::ready("recommended", Some(3))
            .with_fallback(FallbackConfig::new(crate::FallbackStrategy::html("<p>later</p>")));
        assert_eq!(pending.fallback().into_html(), "<p>later</p>");
        assert_eq!(pending.await, Some(3));
    }
}
