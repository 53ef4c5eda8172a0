//! Per-request dispatch: route, render, and map failures to error pages.

use super::{
    reply::Reply,
    route::{self, Route},
};
use crate::{
    log,
    render::RenderRequest,
    site::Site,
    template::store::View,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Handler {
    site: Arc<Site>,
    alias_static: bool,
}

impl Handler {
    pub const fn new(site: Arc<Site>, alias_static: bool) -> Self {
        Self { site, alias_static }
    }

    /// Produce the reply for one request.
    ///
    /// All lookups and renders of a request go through the single [`View`]
    /// captured here, so a reload in between cannot turn a present page into
    /// a failed render.
    pub fn handle(&self, method: &str, url: &str) -> Reply {
        let view = match self.site.store().view() {
            Ok(view) => view,
            Err(err) => return Reply::text(500, format!("500: {err}\n")),
        };

        let path = route::request_path(url);
        match route::resolve(&path, &self.site.static_root(), self.alias_static) {
            Route::Redirect(location) => Reply::redirect(location),
            Route::Blocked => {
                log!("serve"; "blocked bad URL {url}");
                error_page(&view, 404, &path)
            }
            Route::NotFound => error_page(&view, 404, &path),
            Route::Static(file) => match Reply::file(&file) {
                Ok(reply) => reply,
                Err(_) => error_page(&view, 404, &path),
            },
            Route::Page(name) => {
                match view.render(&name, &RenderRequest::content(method, path.as_str())) {
                    Ok(bytes) => Reply::html(200, bytes),
                    Err(err) if err.is_not_found() => error_page(&view, 404, &path),
                    Err(err) => {
                        let message = err.to_string();
                        log!("error"; "{path}: {:#}", anyhow::Error::new(err));
                        error_page(&view, 500, &message)
                    }
                }
            }
        }
    }
}

/// Render `errors/<code>.md`, falling back to a plain-text status line.
fn error_page(view: &View, code: u16, path: &str) -> Reply {
    match view.render(&format!("{code}.md"), &RenderRequest::error(code, path)) {
        Ok(bytes) => Reply::html(code, bytes),
        Err(err) => {
            log!("error"; "{code} page for {path}: {err}");
            Reply::text(code, format!("{code}: {err}\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{serve::reply::HTML, testing::SiteFixture};

    fn handler(fixture: &SiteFixture, alias_static: bool) -> Handler {
        Handler::new(Arc::new(Site::open(fixture.root()).unwrap()), alias_static)
    }

    fn body(reply: Reply) -> String {
        String::from_utf8(reply.into_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_root_redirects_then_renders_index() {
        let fixture = SiteFixture::new();
        let handler = handler(&fixture, false);

        let redirect = handler.handle("GET", "/");
        assert_eq!(redirect.status, 302);
        assert_eq!(redirect.location, Some("/index"));

        let page = handler.handle("GET", "/index");
        assert_eq!(page.status, 200);
        assert_eq!(page.content_type, HTML);
        assert!(body(page).contains("<body><h1>Hi</h1>"));
    }

    #[test]
    fn test_missing_page_renders_404() {
        let fixture = SiteFixture::new();
        let reply = handler(&fixture, false).handle("GET", "/missing");

        assert_eq!(reply.status, 404);
        let html = body(reply);
        assert!(html.starts_with("<body class=\"error\">"));
        assert!(html.contains("Not found: /missing"));
    }

    #[test]
    fn test_static_file_is_byte_identical() {
        let fixture = SiteFixture::new();
        let bytes: Vec<u8> = (0..=255u8).rev().cycle().take(1000).collect();
        fixture.write("static/logo.png", &bytes);

        let reply = handler(&fixture, false).handle("GET", "/static/logo.png");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "image/png");
        assert_eq!(reply.into_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_missing_static_file_renders_404() {
        let fixture = SiteFixture::new();
        let reply = handler(&fixture, false).handle("GET", "/static/nope.css");

        assert_eq!(reply.status, 404);
        assert!(body(reply).contains("Not found: /static/nope.css"));
    }

    #[test]
    fn test_traversal_renders_404() {
        let fixture = SiteFixture::nested("site");
        fixture.write("../secret.md", "top secret");
        let handler = handler(&fixture, true);

        for url in ["/../secret", "/static/../../secret.md", "/%2e%2e/secret"] {
            let reply = handler.handle("GET", url);
            assert_eq!(reply.status, 404, "{url}");
            assert!(!body(reply).contains("top secret"), "{url}");
        }
    }

    #[test]
    fn test_alias_static() {
        let fixture = SiteFixture::new();
        fixture.write("static/robots.txt", "User-agent: *");

        let aliased = handler(&fixture, true).handle("GET", "/robots.txt");
        assert_eq!(aliased.status, 200);
        assert_eq!(body(aliased), "User-agent: *");

        let plain = handler(&fixture, false).handle("GET", "/robots.txt");
        assert_eq!(plain.status, 404);
    }

    #[test]
    fn test_partials_are_not_routed() {
        let fixture = SiteFixture::new();
        fixture.write("nav.pmd", "nav");

        let reply = handler(&fixture, false).handle("GET", "/nav");
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn test_render_failure_renders_500() {
        let fixture = SiteFixture::new();
        fixture.write("bad.md", "{{ Code }}");

        let reply = handler(&fixture, false).handle("GET", "/bad");
        assert_eq!(reply.status, 500);
        let html = body(reply);
        assert!(html.starts_with("<body class=\"error\">"));
        assert!(html.contains("Internal error: failed to render"));
    }

    #[test]
    fn test_failing_error_page_falls_back_to_text() {
        let fixture = SiteFixture::new();
        fixture.write("bad.md", "{{ Code }}");
        fixture.remove("errors/500.md");

        let reply = handler(&fixture, false).handle("GET", "/bad");
        assert_eq!(reply.status, 500);
        assert_eq!(reply.content_type, crate::serve::reply::TEXT);
        let text = body(reply);
        assert!(text.starts_with("500: template `500.md` not found"));
    }

    #[test]
    fn test_query_and_encoding() {
        let fixture = SiteFixture::new();
        fixture.write("my page.md", "{{ Method }} {{ Path }}");
        let handler = handler(&fixture, false);

        let reply = handler.handle("GET", "/my%20page?t=123");
        assert_eq!(reply.status, 200);
        assert!(body(reply).contains("GET /my page"));
    }
}
