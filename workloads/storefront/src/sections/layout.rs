//! Page shell and error page.

use edge_sdk::edge_core::RequestContext;
use edge_sdk::edge_streaming::{escape_html, HeadContent, Shell};
use http::StatusCode;

/// Shell shared by every page.
pub fn page_shell(ctx: &RequestContext, head: HeadContent) -> Shell {
    Shell::new(head.with_meta("viewport", "width=device-width, initial-scale=1"))
        .with_lang(ctx.locale.language.to_lowercase())
        .with_body_start(format!(
            r#"<body>
<header class="site-header">
    <nav><a href="{home}">Home</a> <a href="{all}">Shop all</a></nav>
</header>
<main>
"#,
            home = escape_html(&ctx.localized("/")),
            all = escape_html(&ctx.localized("/collections/all")),
        ))
        .with_body_end("\n</main>\n</body>\n</html>")
}

/// Body of the page returned when the critical tier failed or nothing matched.
pub fn render_error(status: StatusCode, ctx: &RequestContext) -> String {
    let message = match status {
        StatusCode::NOT_FOUND => "We couldn't find the page you were looking for.",
        _ => "Something went wrong. Please try again in a moment.",
    };
    format!(
        r#"<section class="error-page" data-status="{code}">
    <h1>{code}</h1>
    <p>{message}</p>
    <p><a href="{home}">Back to the home page</a></p>
</section>"#,
        code = status.as_u16(),
        message = message,
        home = escape_html(&ctx.localized("/")),
    )
}
