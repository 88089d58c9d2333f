//! Product details, option controls and the add-to-cart form.

use edge_sdk::edge_core::RequestContext;
use edge_sdk::edge_streaming::escape_html;
use turbo_commerce::prelude::*;

/// Handles clicks on in-place option buttons: the current history entry
/// gets the new query and `#section-product` is swapped for the freshly
/// rendered one, so the page never reloads and keeps its scroll position.
/// Only the latest click's response is applied.
pub const OPTION_SCRIPT: &str = concat!(
    r#"(function(){var n=0;document.addEventListener("click",function(e){"#,
    r#"var b=e.target.closest("button[data-query]");if(!b||b.disabled)return;"#,
    r#"var q="?"+b.dataset.query,m=++n;history.replaceState(history.state,"",q);"#,
    r#"fetch(location.pathname+q).then(function(r){return r.text()}).then(function(h){if(m!==n)return;"#,
    r#"var f=new DOMParser().parseFromString(h,"text/html").getElementById("section-product"),"#,
    r#"c=document.getElementById("section-product");if(f&&c)c.replaceWith(f)})"#,
    r#".catch(function(){if(m===n)location.reload()})});})();"#
);

/// Everything above the fold on a product page.
pub fn render_product(
    ctx: &RequestContext,
    product: &Product,
    variant: Option<&ProductVariant>,
    options: &[ProductOption],
    form: &CartForm,
) -> String {
    let image = variant
        .and_then(|v| v.image.as_ref())
        .or(product.featured_image.as_ref())
        .map(|image| {
            format!(
                r#"<img src="{}" alt="{}" class="product-image">"#,
                escape_html(&image.url),
                escape_html(image.alt_text.as_deref().unwrap_or(&product.title))
            )
        })
        .unwrap_or_default();
    let vendor = product
        .vendor
        .as_deref()
        .map(|v| format!(r#"<p class="vendor">{}</p>"#, escape_html(v)))
        .unwrap_or_default();
    let description = product
        .description
        .as_deref()
        .map(|d| format!(r#"<div class="description">{}</div>"#, escape_html(d)))
        .unwrap_or_default();

    format!(
        r#"<div class="product">
    <div class="product-gallery">{image}</div>
    <div class="product-main">
        {vendor}<h1>{title}</h1>
        {price}
        {form}
        {description}
    </div>
</div>"#,
        image = image,
        vendor = vendor,
        title = escape_html(&product.title),
        price = render_price(variant),
        form = render_product_form(ctx, options, variant, form),
        description = description,
    )
}

/// Variant price with the compare-at price when discounted.
pub fn render_price(variant: Option<&ProductVariant>) -> String {
    let Some(variant) = variant else {
        return String::new();
    };
    let compare = variant
        .compare_at_price
        .filter(|_| variant.is_on_sale())
        .map(|p| format!(r#" <s class="compare-at">{}</s>"#, escape_html(&p.display())))
        .unwrap_or_default();
    format!(
        r#"<p class="price">{}{}</p>"#,
        escape_html(&variant.price.display()),
        compare
    )
}

/// Option fieldsets and the add-to-cart button.
pub fn render_product_form(
    ctx: &RequestContext,
    options: &[ProductOption],
    variant: Option<&ProductVariant>,
    form: &CartForm,
) -> String {
    let fieldsets: String = options.iter().map(|o| render_option(ctx, o)).collect();
    format!(
        r#"<form class="product-form" method="post" action="{action}">{fieldsets}{cart}</form>"#,
        action = escape_html(&ctx.localized("/cart")),
        fieldsets = fieldsets,
        cart = render_add_to_cart(&AddToCartControl::for_variant(variant, form)),
    )
}

fn render_option(ctx: &RequestContext, option: &ProductOption) -> String {
    let values: String = option.values.iter().map(|v| render_option_value(ctx, v)).collect();
    format!(
        r#"<fieldset class="product-option" data-option="{key}"><legend>{name}</legend>{values}</fieldset>"#,
        key = escape_html(&option_key(&option.name)),
        name = escape_html(&option.name),
        values = values,
    )
}

/// One option value control.
///
/// Values of another product resource are real links so crawlers can follow
/// them; same-resource values are buttons that replace the query in place.
pub fn render_option_value(ctx: &RequestContext, value: &OptionValue) -> String {
    let state = value.state().as_str();
    let label = render_swatch(value);

    match navigate(value) {
        NavigationAction::CrossResourceLink(locator) => format!(
            r#"<a class="option-value" href="{href}" data-state="{state}">{label}</a>"#,
            href = escape_html(&locator.href_in(&ctx.path_prefix)),
            state = state,
            label = label,
        ),
        NavigationAction::InPlaceQueryUpdate(query) => format!(
            r#"<button type="button" class="option-value" data-state="{state}" data-query="{query}">{label}</button>"#,
            state = state,
            query = escape_html(&query.to_string()),
            label = label,
        ),
        NavigationAction::NoOp if value.selected => format!(
            r#"<button type="button" class="option-value" data-state="{state}" aria-pressed="true">{label}</button>"#,
            state = state,
            label = label,
        ),
        NavigationAction::NoOp => format!(
            r#"<button type="button" class="option-value" data-state="{state}" disabled>{label}</button>"#,
            state = state,
            label = label,
        ),
    }
}

fn render_swatch(value: &OptionValue) -> String {
    let name = escape_html(&value.name);
    let Some(swatch) = &value.swatch else {
        return format!("<span>{}</span>", name);
    };

    let color = swatch
        .color
        .as_deref()
        .map(|c| format!(r#" style="background-color: {}""#, escape_html(c)))
        .unwrap_or_default();
    let image = swatch
        .image_url
        .as_deref()
        .map(|url| format!(r#"<img src="{}" alt="{}">"#, escape_html(url), name))
        .unwrap_or_default();
    format!(
        r#"<span class="swatch" aria-label="{name}"{color}>{image}</span><span>{name}</span>"#,
        name = name,
        color = color,
        image = image,
    )
}

/// Submit button plus the hidden payload for the cart form.
pub fn render_add_to_cart(control: &AddToCartControl) -> String {
    let submission = CartLineBuilder::submission::<()>(control.lines.clone(), None);
    let lines = serde_json::to_string(&submission.lines).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"<input type="hidden" name="lines" value="{lines}"><input type="hidden" name="analytics" value="{analytics}"><button type="submit" class="add-to-cart"{disabled}>{label}</button>"#,
        lines = escape_html(&lines),
        analytics = escape_html(&submission.analytics.to_string()),
        disabled = if control.disabled { " disabled" } else { "" },
        label = escape_html(control.label),
    )
}
