//! Storefront workload.
//!
//! Serves the home, product and collection pages. Each page splits its data
//! into a critical tier, awaited before the response status is chosen, and a
//! deferred tier that streams into a placeholder after the critical sections:
//!
//! - **Home**: featured collection (critical), recommended products (deferred)
//! - **Product**: product with its option graph (critical), recommendations (deferred)
//! - **Collection**: one page of products (critical), nothing deferred
//!
//! Paths may start with a `/{language}-{country}` segment selecting the
//! catalog locale.

pub mod app;
pub mod cart;
pub mod data;
pub mod pages;
pub mod router;
pub mod sections;

pub use app::StorefrontApp;
pub use cart::{add_to_cart, CartError};
pub use pages::PageResponse;
pub use router::Route;

#[cfg(target_arch = "wasm32")]
mod component {
    use std::sync::Arc;

    use anyhow::Context;
    use edge_sdk::edge_core::{Method, StorefrontConfig};
    use edge_sdk::edge_data::SpinCatalogClient;
    use edge_sdk::edge_observability::{init_tracing, LogFormat};
    use spin_sdk::http::{Fields, IncomingRequest, OutgoingResponse, ResponseOutparam};
    use spin_sdk::http_component;

    use crate::StorefrontApp;

    fn config() -> anyhow::Result<StorefrontConfig> {
        let mut config = StorefrontConfig::default();
        if let Ok(endpoint) = spin_sdk::variables::get("catalog_endpoint") {
            config.catalog_endpoint = endpoint;
        }
        if let Ok(level) = spin_sdk::variables::get("log_level") {
            config.log_level = level;
        }
        if let Ok(format) = spin_sdk::variables::get("log_format") {
            config.log_format = format;
        }
        config.validate().context("invalid storefront configuration")?;
        Ok(config)
    }

    fn method(method: spin_sdk::http::Method) -> Method {
        match method {
            spin_sdk::http::Method::Head => Method::Head,
            spin_sdk::http::Method::Post => Method::Post,
            spin_sdk::http::Method::Put => Method::Put,
            spin_sdk::http::Method::Delete => Method::Delete,
            spin_sdk::http::Method::Patch => Method::Patch,
            spin_sdk::http::Method::Options => Method::Options,
            _ => Method::Get,
        }
    }

    /// Spin drives this future on its own executor, so outbound catalog
    /// requests make progress only while the request is awaited here.
    #[http_component]
    async fn handle(req: IncomingRequest, response_out: ResponseOutparam) {
        if let Err(e) = serve(req, response_out).await {
            tracing::error!(target: edge_sdk::edge_observability::LOG_TARGET, error = %e, "request failed");
        }
    }

    async fn serve(req: IncomingRequest, response_out: ResponseOutparam) -> anyhow::Result<()> {
        let config = config()?;
        init_tracing(&config.log_level, LogFormat::from_config_str(&config.log_format).unwrap_or_default());

        let mut catalog = SpinCatalogClient::new(config.catalog_endpoint.as_str());
        if let Ok(token) = spin_sdk::variables::get("storefront_access_token") {
            catalog = catalog.with_access_token(token);
        }
        let app = StorefrontApp::new(config, Arc::new(catalog));

        let url = req.path_with_query().unwrap_or_else(|| "/".to_string());
        let method = method(req.method());

        let mut ctx = app.context(method, &url);
        let logger = app.logger(&ctx);
        let response = app.load(&mut ctx, &logger).await;

        let headers = Fields::from_list(&[
            ("content-type".to_owned(), b"text/html; charset=utf-8".to_vec()),
            ("x-request-id".to_owned(), ctx.request_id.to_string().into_bytes()),
        ])
        .map_err(|e| anyhow::anyhow!("invalid response headers: {:?}", e))?;
        let outgoing = OutgoingResponse::new(headers);
        outgoing
            .set_status_code(response.status().as_u16())
            .map_err(|_| anyhow::anyhow!("invalid status {}", response.status()))?;

        let body = outgoing.take_body();
        response_out.set(outgoing);

        let mut sink = edge_sdk::edge_streaming::StreamingSink::new(body, ctx.timing.clone());
        response.stream(&ctx, &mut sink).await?;
        Ok(())
    }
}
