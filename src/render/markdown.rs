//! Markdown to sanitized HTML.

use pulldown_cmark::{Options, Parser, html};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS
}

/// Convert commonmark (plus tables, strikethrough, footnotes and task lists)
/// to raw HTML. The result is NOT safe to send to a client.
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, parser);
    out
}

/// Strip scripts, styles, event handlers and unknown tags, keeping common
/// formatting markup, links and images.
pub fn sanitize(html: &str) -> String {
    ammonia::clean(html)
}

/// The only way rendered markdown leaves this module for a response.
pub fn to_safe_html(markdown: &str) -> String {
    sanitize(&to_html(markdown))
}
