//! Page loaders and their streaming renderers.

mod collection;
mod home;
mod product;

use std::fmt::Display;

use edge_sdk::edge_core::{RequestContext, WorkloadError};
use edge_sdk::edge_executor::{PageLoadResult, PendingDeferred};
use edge_sdk::edge_streaming::{HeadContent, Section, StreamingSink};
use futures::Sink;
use http::StatusCode;
use turbo_commerce::prelude::*;

use crate::sections::{page_shell, render_error, render_recommended};

pub use collection::*;
pub use home::*;
pub use product::*;

/// Name of the deferred recommendations section.
pub const RECOMMENDED_SECTION: &str = "recommended";

/// A loaded page, ready to stream.
pub enum PageResponse {
    Home(PageLoadResult<HomeData, Vec<ProductSummary>>),
    Product(PageLoadResult<ProductView, Vec<ProductSummary>>),
    Collection(PageLoadResult<CollectionView, ()>),
    /// The critical tier failed or no route matched.
    Error(StatusCode),
}

impl PageResponse {
    /// Response status. Known before any byte is streamed.
    pub fn status(&self) -> StatusCode {
        match self {
            PageResponse::Error(status) => *status,
            _ => StatusCode::OK,
        }
    }

    /// Stream the shell, the critical sections, then any deferred section.
    pub async fn stream<S, E>(self, ctx: &RequestContext, sink: &mut StreamingSink<S, E>) -> Result<(), WorkloadError>
    where
        S: Sink<Vec<u8>, Error = E> + Unpin,
        E: Display,
    {
        match self {
            PageResponse::Home(loaded) => render_home(ctx, loaded, sink).await,
            PageResponse::Product(loaded) => render_product_page(ctx, loaded, sink).await,
            PageResponse::Collection(loaded) => render_collection_page(ctx, loaded, sink).await,
            PageResponse::Error(status) => {
                let title = status.canonical_reason().unwrap_or("Error");
                let shell = page_shell(ctx, HeadContent::new(title));
                sink.send_shell(&shell.render_opening()).await?;
                sink.send_section(&Section::new("error"), &render_error(status, ctx))
                    .await?;
                sink.finish(&shell.render_closing()).await
            }
        }
    }
}

/// Placeholder now, products (or the fallback) once the deferred tier settles.
pub(crate) async fn stream_recommended<S, E>(
    ctx: &RequestContext,
    sink: &mut StreamingSink<S, E>,
    heading: &str,
    pending: PendingDeferred<Vec<ProductSummary>>,
) -> Result<(), WorkloadError>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    let section = Section::deferred(
        pending.section(),
        r#"<p class="loading">Finding products for you&hellip;</p>"#,
    );
    sink.send_placeholder(&section).await?;

    let fallback = pending.fallback().into_html();
    let products = pending.await;
    let html = render_recommended(ctx, heading, products.as_deref(), &fallback);
    sink.send_deferred(&section, &html).await
}
