//! Route table of the storefront.

use edge_sdk::edge_core::{RequestContext, RouteConfig, WorkloadManifest};

/// A matched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Product { handle: String },
    Collection { handle: String },
}

/// Routes served by the storefront. Paths are matched after the locale
/// prefix has been stripped.
pub fn manifest(name: &str) -> WorkloadManifest {
    WorkloadManifest::new(name, env!("CARGO_PKG_VERSION"))
        .with_route(RouteConfig::new("/", "home").with_methods(vec!["GET", "HEAD"]))
        .with_route(RouteConfig::new("/products/:handle", "product").with_methods(vec!["GET", "HEAD"]))
        .with_route(RouteConfig::new("/collections/:handle", "collection").with_methods(vec!["GET", "HEAD"]))
}

/// Match the request, recording route parameters on the context.
pub fn resolve(manifest: &WorkloadManifest, ctx: &mut RequestContext) -> Option<Route> {
    let (route, params) = manifest.route(ctx.method.as_str(), &ctx.path)?;
    let handler = route.handler.clone();
    ctx.params = params;

    match handler.as_str() {
        "home" => Some(Route::Home),
        "product" => ctx.param("handle").map(|h| Route::Product { handle: h.to_string() }),
        "collection" => ctx.param("handle").map(|h| Route::Collection { handle: h.to_string() }),
        _ => None,
    }
}
