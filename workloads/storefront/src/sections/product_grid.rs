//! Product cards and grids.

use edge_sdk::edge_core::RequestContext;
use edge_sdk::edge_streaming::escape_html;
use turbo_commerce::prelude::*;

/// One product card.
pub fn render_product_card(ctx: &RequestContext, product: &ProductSummary) -> String {
    let image = product
        .featured_image
        .as_ref()
        .map(|image| {
            format!(
                r#"<img src="{}" alt="{}" loading="lazy">"#,
                escape_html(&image.url),
                escape_html(image.alt_text.as_deref().unwrap_or(&product.title))
            )
        })
        .unwrap_or_default();

    format!(
        r#"<a class="product-card" href="{href}" data-product="{handle}">{image}<h4>{title}</h4><p class="price">{price}</p></a>"#,
        href = escape_html(&ctx.localized(&product.url())),
        handle = escape_html(&product.handle),
        image = image,
        title = escape_html(&product.title),
        price = escape_html(&product.min_price.display()),
    )
}

/// A grid of cards. `empty` is rendered inside the grid when there are no products.
pub fn render_product_grid(ctx: &RequestContext, products: &[ProductSummary], empty: &str) -> String {
    let cards: String = if products.is_empty() {
        empty.to_string()
    } else {
        products.iter().map(|p| render_product_card(ctx, p)).collect()
    };
    format!(r#"<div class="product-grid">{}</div>"#, cards)
}

/// Heading plus grid for the recommended products section.
///
/// `None` means the data did not arrive; `fallback` is shown in its place.
pub fn render_recommended(ctx: &RequestContext, heading: &str, products: Option<&[ProductSummary]>, fallback: &str) -> String {
    let grid = match products {
        Some(products) => render_product_grid(ctx, products, ""),
        None => render_product_grid(ctx, &[], fallback),
    };
    format!(r#"<h2>{}</h2>{}"#, escape_html(heading), grid)
}

/// Collection header, product grid and next-page link.
pub fn render_collection(ctx: &RequestContext, collection: &Collection, sort: CollectionSortKey, reverse: bool) -> String {
    let description = collection
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="collection-description">{}</p>"#, escape_html(d)))
        .unwrap_or_default();
    let next = collection
        .next_page_url(sort, reverse)
        .map(|url| {
            format!(
                r#"<a class="next-page" href="{}" rel="next">Load more</a>"#,
                escape_html(&ctx.localized(&url))
            )
        })
        .unwrap_or_default();

    format!(
        r#"<h1>{title}</h1>{description}<p class="sort">Sorted by {sort}</p>{grid}{next}"#,
        title = escape_html(&collection.title),
        description = description,
        sort = sort.display_name(),
        grid = render_product_grid(
            ctx,
            &collection.products,
            r#"<p class="empty">No products in this collection yet.</p>"#
        ),
        next = next,
    )
}
