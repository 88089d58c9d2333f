//! Collection page: one page of products, no deferred data.

use std::fmt::Display;

use async_trait::async_trait;
use edge_sdk::edge_core::{RequestContext, WorkloadError};
use edge_sdk::edge_data::Storefront;
use edge_sdk::edge_executor::{deferred, CriticalLoadError, DeferredFuture, PageLoadResult, PageLoader};
use edge_sdk::edge_streaming::{HeadContent, Section, StreamingSink};
use futures::Sink;
use turbo_commerce::prelude::*;

use crate::data::{collection, CollectionPageArgs};
use crate::sections::{page_shell, render_collection};

#[derive(Debug, Clone)]
pub struct CollectionView {
    pub collection: Collection,
    pub args: CollectionPageArgs,
}

pub struct CollectionPage {
    storefront: Storefront,
    handle: String,
    args: CollectionPageArgs,
}

impl CollectionPage {
    pub fn new(storefront: Storefront, handle: impl Into<String>, raw_query: &str, page_size: u32) -> Self {
        Self {
            storefront,
            handle: handle.into(),
            args: CollectionPageArgs::from_query(raw_query, page_size),
        }
    }
}

#[async_trait]
impl PageLoader for CollectionPage {
    type Critical = CollectionView;
    type Deferred = ();

    async fn critical(&self) -> Result<CollectionView, CriticalLoadError> {
        let collection = collection(&self.storefront, &self.handle, &self.args).await?;
        Ok(CollectionView {
            collection,
            args: self.args.clone(),
        })
    }

    fn deferred(&self) -> DeferredFuture<()> {
        deferred(async { Ok(()) })
    }
}

pub async fn render_collection_page<S, E>(
    ctx: &RequestContext,
    loaded: PageLoadResult<CollectionView, ()>,
    sink: &mut StreamingSink<S, E>,
) -> Result<(), WorkloadError>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    let view = &loaded.critical;
    let collection = &view.collection;

    let head = HeadContent::new(collection.title.as_str()).with_canonical(&ctx.localized(&collection.url()));
    let shell = page_shell(ctx, head);
    sink.send_shell(&shell.render_opening()).await?;

    let html = render_collection(ctx, collection, view.args.sort, view.args.reverse);
    sink.send_section(&Section::new("collection"), &html).await?;

    sink.finish(&shell.render_closing()).await
}
