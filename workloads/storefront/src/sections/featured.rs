//! Home page hero and featured collection.

use edge_sdk::edge_core::RequestContext;
use edge_sdk::edge_streaming::escape_html;
use turbo_commerce::prelude::*;

/// Static hero linking to the full catalog.
pub fn render_hero(ctx: &RequestContext) -> String {
    format!(
        r#"<section class="hero">
    <h1>Everything for your home</h1>
    <p>Thoughtfully made essentials, updated every week.</p>
    <a class="button" href="{}">Shop all</a>
</section>"#,
        escape_html(&ctx.localized("/collections/all"))
    )
}

/// Featured collection teaser. Renders nothing when the shop has no collection.
pub fn render_featured_collection(ctx: &RequestContext, collection: Option<&Collection>) -> String {
    let Some(collection) = collection else {
        return String::new();
    };

    let image = collection
        .image
        .as_ref()
        .map(|image| {
            format!(
                r#"<img src="{}" alt="{}" class="featured-collection-image">"#,
                escape_html(&image.url),
                escape_html(image.alt_text.as_deref().unwrap_or(&collection.title))
            )
        })
        .unwrap_or_default();

    format!(
        r#"<a class="featured-collection" href="{href}">{image}<h2>{title}</h2></a>"#,
        href = escape_html(&ctx.localized(&collection.url())),
        image = image,
        title = escape_html(&collection.title),
    )
}
