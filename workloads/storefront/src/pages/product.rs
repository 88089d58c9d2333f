//! Product page: the option graph (critical) and recommendations (deferred).

use std::fmt::Display;

use async_trait::async_trait;
use edge_sdk::edge_core::{RequestContext, WorkloadError};
use edge_sdk::edge_data::Storefront;
use edge_sdk::edge_executor::{
    deferred, CriticalLoadError, DeferredFuture, DeferredLoadError, FallbackConfig, FallbackStrategy,
    PageLoadResult, PageLoader,
};
use edge_sdk::edge_streaming::{HeadContent, Section, StreamingSink};
use futures::Sink;
use turbo_commerce::prelude::*;

use super::{stream_recommended, RECOMMENDED_SECTION};
use crate::data::{product, recommended_products};
use crate::sections::{page_shell, render_product, OPTION_SCRIPT};

/// Critical data of a product page.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub product: Product,
    /// Variant selection from the URL.
    pub query: VariantQuery,
}

impl ProductView {
    /// Variant the URL selects, or the first available one when it selects none.
    pub fn selected_variant(&self) -> Option<&ProductVariant> {
        resolve_variant(&self.product, &self.query)
    }

    /// Option controls for the selected variant.
    pub fn options(&self) -> Vec<ProductOption> {
        let variant = self.selected_variant();
        classify_options(&map_product_options(&self.product, variant), variant)
    }
}

pub struct ProductPage {
    storefront: Storefront,
    handle: String,
    query: VariantQuery,
    recommended_count: u32,
}

impl ProductPage {
    pub fn new(storefront: Storefront, handle: impl Into<String>, raw_query: &str, recommended_count: u32) -> Self {
        Self {
            storefront,
            handle: handle.into(),
            query: VariantQuery::parse(raw_query),
            recommended_count,
        }
    }
}

#[async_trait]
impl PageLoader for ProductPage {
    type Critical = ProductView;
    type Deferred = Vec<ProductSummary>;

    fn deferred_section(&self) -> &'static str {
        RECOMMENDED_SECTION
    }

    fn deferred_fallback(&self) -> FallbackConfig {
        FallbackConfig::new(FallbackStrategy::message("Recommendations are unavailable right now."))
    }

    async fn critical(&self) -> Result<ProductView, CriticalLoadError> {
        let product = product(&self.storefront, &self.handle).await?;
        Ok(ProductView {
            product,
            query: self.query.clone(),
        })
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

pub async fn render_product_page<S, E>(
    ctx: &RequestContext,
    loaded: PageLoadResult<ProductView, Vec<ProductSummary>>,
    sink: &mut StreamingSink<S, E>,
) -> Result<(), WorkloadError>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    let view = &loaded.critical;
    let product = &view.product;
    let variant = view.selected_variant();

    let mut head = HeadContent::new(product.title.as_str())
        .with_canonical(&ctx.localized(&format!("/products/{}", product.handle)))
        .with_script(OPTION_SCRIPT);
    if let Some(description) = &product.description {
        head = head.with_meta("description", description);
    }
    let shell = page_shell(ctx, head);
    sink.send_shell(&shell.render_opening()).await?;

    let html = render_product(ctx, product, variant, &view.options(), &CartForm::new());
    sink.send_section(&Section::new("product"), &html).await?;

    stream_recommended(ctx, sink, "You may also like", loaded.deferred).await?;
    sink.finish(&shell.render_closing()).await
}
