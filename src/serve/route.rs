//! Request path resolution.
//!
//! Resolution order:
//! 1. `/` → redirect to `/index`
//! 2. any `..` segment → blocked (no filesystem access at all)
//! 3. `/static/<path>` → static file
//! 4. aliased static file (when enabled and the file exists)
//! 5. `/<name>` → content template `<name>.md`

use std::path::{Path, PathBuf};

pub const INDEX: &str = "/index";
pub const STATIC_PREFIX: &str = "/static/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Redirect(&'static str),
    /// Path traversal attempt.
    Blocked,
    /// Not addressable at all (e.g. `*` or a relative URL).
    NotFound,
    Static(PathBuf),
    /// Content template name, e.g. `index.md`.
    Page(String),
}

/// Percent-decoded path of a request URL, without the query string.
pub fn request_path(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned(),
    }
}

/// Whether any path segment is a parent-directory reference.
pub fn is_traversal(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

pub fn resolve(path: &str, static_root: &Path, alias_static: bool) -> Route {
    if path == "/" {
        return Route::Redirect(INDEX);
    }
    if is_traversal(path) {
        return Route::Blocked;
    }
    let Some(rel) = path.strip_prefix('/') else {
        return Route::NotFound;
    };

    if let Some(asset) = path.strip_prefix(STATIC_PREFIX) {
        return Route::Static(static_root.join(trim_separators(asset)));
    }

    if alias_static {
        let candidate = static_root.join(trim_separators(rel));
        if candidate.is_file() {
            return Route::Static(candidate);
        }
    }

    Route::Page(format!("{rel}.md"))
}

/// Strip leading separators so joining never escapes to an absolute path.
fn trim_separators(rel: &str) -> &str {
    rel.trim_start_matches(['/', '\\'])
}
