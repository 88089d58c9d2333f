//! Public SDK for the storefront edge runtime.
//!
//! This crate re-exports all platform functionality:
//!
//! ```ignore
//! use edge_sdk::prelude::*;
//!
//! async fn render<S, E>(ctx: RequestContext, page: &ProductPage, sink: &mut StreamingSink<S, E>)
//! -> Result<(), WorkloadError> {
//!     let logger = StructuredLogger::new(ctx.request_id.clone());
//!     let loaded = TieredPageLoader::new().load(page).await?;
//!
//!     sink.send_shell(&shell.render_opening()).await?;
//!     sink.send_section(&Section::new("product"), &render_product(&loaded.critical)).await?;
//!     sink.send_placeholder(&recommended).await?;
//!
//!     let html = loaded.deferred.await.map(render_grid).unwrap_or_default();
//!     sink.send_deferred(&recommended, &html).await?;
//!     sink.finish(&shell.render_closing()).await
//! }
//! ```

pub use edge_core;
pub use edge_data;
pub use edge_executor;
pub use edge_observability;
pub use edge_streaming;

/// Prelude for convenient imports.
pub mod prelude {
    pub use edge_core::*;
    pub use edge_data::*;
    pub use edge_executor::*;
    pub use edge_observability::*;
    pub use edge_streaming::*;
}
