//! Home page: featured collection (critical) and recommended products (deferred).

use std::fmt::Display;

use async_trait::async_trait;
use edge_sdk::edge_core::{RequestContext, WorkloadError};
use edge_sdk::edge_data::Storefront;
use edge_sdk::edge_executor::{
    deferred, CriticalLoadError, DeferredFuture, DeferredLoadError, PageLoadResult, PageLoader,
};
use edge_sdk::edge_streaming::{HeadContent, Section, StreamingSink};
use futures::Sink;
use turbo_commerce::prelude::*;

use super::{stream_recommended, RECOMMENDED_SECTION};
use crate::data::{featured_collection, recommended_products};
use crate::sections::{page_shell, render_featured_collection, render_hero};

/// Critical data of the home page.
#[derive(Debug, Clone)]
pub struct HomeData {
    /// `None` when the shop has no collections.
    pub featured: Option<Collection>,
}

pub struct HomePage {
    storefront: Storefront,
    featured_count: u32,
    recommended_count: u32,
}

impl HomePage {
    pub fn new(storefront: Storefront, featured_count: u32, recommended_count: u32) -> Self {
        Self {
            storefront,
            featured_count,
            recommended_count,
        }
    }
}

#[async_trait]
impl PageLoader for HomePage {
    type Critical = HomeData;
    type Deferred = Vec<ProductSummary>;

    fn deferred_section(&self) -> &'static str {
        RECOMMENDED_SECTION
    }

    async fn critical(&self) -> Result<HomeData, CriticalLoadError> {
        let featured = featured_collection(&self.storefront, self.featured_count).await?;
        Ok(HomeData { featured })
    }

    fn deferred(&self) -> DeferredFuture<Vec<ProductSummary>> {
        let storefront = self.storefront.clone();
        let count = self.recommended_count;
        deferred(async move {
            recommended_products(&storefront, count)
                .await
                .map_err(DeferredLoadError::from)
        })
    }
}

pub async fn render_home<S, E>(
    ctx: &RequestContext,
    loaded: PageLoadResult<HomeData, Vec<ProductSummary>>,
    sink: &mut StreamingSink<S, E>,
) -> Result<(), WorkloadError>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    let shell = page_shell(ctx, HeadContent::new("Home"));
    sink.send_shell(&shell.render_opening()).await?;

    sink.send_section(&Section::new("hero"), &render_hero(ctx)).await?;
    sink.send_section(
        &Section::new("featured-collection"),
        &render_featured_collection(ctx, loaded.critical.featured.as_ref()),
    )
    .await?;

    stream_recommended(ctx, sink, "Recommended products", loaded.deferred).await?;
    sink.finish(&shell.render_closing()).await
}
