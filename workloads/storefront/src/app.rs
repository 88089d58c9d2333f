//! Request handling: route, load, stream.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use edge_sdk::edge_core::{
    LifecycleObserver, LifecyclePhase, Method, RequestContext, StorefrontConfig, WorkloadError,
    WorkloadManifest,
};
use edge_sdk::edge_data::{CatalogClient, Storefront};
use edge_sdk::edge_executor::{CriticalLoadError, PageLoadResult, PageLoader, TieredPageLoader};
use edge_sdk::edge_observability::StructuredLogger;
use edge_sdk::edge_streaming::StreamingSink;
use futures::Sink;
use http::StatusCode;

use crate::pages::{CollectionPage, HomePage, PageResponse, ProductPage};
use crate::router::{self, Route};

/// Logs every lifecycle phase of a page load.
struct PhaseLogger(StructuredLogger);

impl LifecycleObserver for PhaseLogger {
    fn on_phase(&self, phase: LifecyclePhase, elapsed: Duration) {
        let builder = match &phase {
            LifecyclePhase::CriticalFailed(reason) | LifecyclePhase::Error(reason) => {
                self.0.warn_builder("page phase").field("reason", reason.as_str())
            }
            LifecyclePhase::FetchingDeferred(section)
            | LifecyclePhase::DeferredReady(section)
            | LifecyclePhase::DeferredFailed(section)
            | LifecyclePhase::SectionSent(section) => {
                self.0.debug_builder("page phase").field("section", section.as_str())
            }
            _ => self.0.debug_builder("page phase"),
        };
        builder
            .field("phase", phase.name())
            .duration_ms("elapsed_ms", elapsed)
            .emit();
    }
}

/// The storefront: configuration, catalog transport and route table.
pub struct StorefrontApp {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogClient>,
    manifest: WorkloadManifest,
}

impl StorefrontApp {
    pub fn new(config: StorefrontConfig, catalog: Arc<dyn CatalogClient>) -> Self {
        let manifest = router::manifest(&config.name);
        Self {
            config,
            catalog,
            manifest,
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn manifest(&self) -> &WorkloadManifest {
        &self.manifest
    }

    /// Request context for a method and URL, with the locale taken from the path.
    pub fn context(&self, method: Method, url: &str) -> RequestContext {
        RequestContext::new(method, url, &self.config.default_locale)
    }

    /// Request-scoped logger.
    pub fn logger(&self, ctx: &RequestContext) -> StructuredLogger {
        StructuredLogger::from_config(ctx.request_id.clone(), &self.config)
            .with_workload(self.config.name.as_str())
            .with_route(ctx.path.as_str())
    }

    /// Route the request and run its loader.
    ///
    /// Only the critical tier is awaited. A failure there, or a path with no
    /// route, yields an error response; the deferred tier never affects the
    /// status.
    pub async fn load(&self, ctx: &mut RequestContext, logger: &StructuredLogger) -> PageResponse {
        let Some(route) = router::resolve(&self.manifest, ctx) else {
            logger.info_builder("no route").field("path", ctx.path.as_str()).emit();
            return PageResponse::Error(StatusCode::NOT_FOUND);
        };

        let storefront = Storefront::new(self.catalog.clone(), ctx.locale.clone())
            .with_request_id(ctx.request_id.clone())
            .with_config(&self.config);
        let loader = TieredPageLoader::new()
            .with_observer(Arc::new(PhaseLogger(self.logger(ctx))))
            .with_request_id(ctx.request_id.clone());

        let config = &self.config;
        let result = match route {
            Route::Home => {
                let page = HomePage::new(
                    storefront,
                    config.featured_collection_count,
                    config.recommended_product_count,
                );
                run(&loader, &page).await.map(PageResponse::Home)
            }
            Route::Product { handle } => {
                let page = ProductPage::new(
                    storefront,
                    handle,
                    &ctx.raw_query,
                    config.recommended_product_count,
                );
                run(&loader, &page).await.map(PageResponse::Product)
            }
            Route::Collection { handle } => {
                let page = CollectionPage::new(storefront, handle, &ctx.raw_query, config.collection_page_size);
                run(&loader, &page).await.map(PageResponse::Collection)
            }
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                let status = e.status();
                let builder = if status.is_server_error() {
                    logger.error_builder("critical data failed")
                } else {
                    logger.warn_builder("critical data failed")
                };
                builder
                    .field("error", e.to_string())
                    .field_u64("status", u64::from(status.as_u16()))
                    .emit();
                PageResponse::Error(status)
            }
        }
    }

    /// Serve one request into `sink`.
    ///
    /// The status is settled before the first byte is written; the caller
    /// gets it back with the sink once the document is complete.
    pub async fn serve<S, E>(&self, method: Method, url: &str, sink: S) -> Result<(StatusCode, S), WorkloadError>
    where
        S: Sink<Vec<u8>, Error = E> + Unpin,
        E: Display,
    {
        let mut ctx = self.context(method, url);
        let logger = self.logger(&ctx);
        logger
            .info_builder("request started")
            .field("method", ctx.method.as_str())
            .field("locale", ctx.locale.to_string())
            .emit();

        let response = self.load(&mut ctx, &logger).await;
        let status = response.status();

        let mut sink = StreamingSink::new(sink, ctx.timing.clone());
        if let Err(e) = response.stream(&ctx, &mut sink).await {
            logger.error_builder("streaming failed").field("error", e.to_string()).emit();
            return Err(e);
        }

        let mut done = logger
            .info_builder("request completed")
            .field_u64("status", u64::from(status.as_u16()))
            .field_u64("sections", sink.sections_sent().len() as u64);
        if let Some(shell) = sink.timing().time_to_shell() {
            done = done.duration_ms("time_to_shell_ms", shell);
        }
        done.emit();

        Ok((status, sink.into_inner()))
    }
}

async fn run<L: PageLoader>(
    loader: &TieredPageLoader,
    page: &L,
) -> Result<PageLoadResult<L::Critical, L::Deferred>, CriticalLoadError> {
    loader.load(page).await
}
