//! Two-stage page rendering.
//!
//! ```text
//!  content/error template ──▶ markdown ──▶ raw HTML ──▶ sanitized fragment
//!                                                            │
//!                                   wrapper template ◀───────┘
//!                                (main / error) ──▶ response bytes
//! ```
//!
//! Every step reads the snapshots captured in one [`View`], so a concurrent
//! reload never changes templates halfway through a page.

mod helper;
pub mod markdown;

use crate::template::{
    CollectionKind, RenderError, TemplateSet,
    store::{SnapshotStore, View},
};
use helper::MarkdownHelper;
use minijinja::{
    context,
    value::{Value, ValueKind},
};
use std::{collections::BTreeMap, error::Error as _};

/// Deepest allowed chain of nested `markdown(...)` calls.
pub const MAX_DEPTH: usize = 16;

// ============================================================================
// Requests
// ============================================================================

/// What a page is being rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderRequest {
    /// A content page requested by a client.
    Content { method: String, path: String },
    /// An error page for `code`; `path` is the request path or the failure message.
    Error { code: u16, path: String },
}

impl RenderRequest {
    pub fn content(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Content {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn error(code: u16, path: impl Into<String>) -> Self {
        Self::Error {
            code,
            path: path.into(),
        }
    }

    /// Collection the named template is looked up in.
    pub const fn collection(&self) -> CollectionKind {
        match self {
            Self::Content { .. } => CollectionKind::Content,
            Self::Error { .. } => CollectionKind::Error,
        }
    }

    pub const fn page_type(&self) -> PageType {
        match self {
            Self::Content { .. } => PageType::Main,
            Self::Error { .. } => PageType::Error,
        }
    }

    fn bindings(&self) -> Value {
        match self {
            Self::Content { method, path } => context! { Method => method, Path => path },
            Self::Error { code, path } => context! { Code => code, Path => path },
        }
    }
}

/// Which wrapper template a fragment is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    Main,
    Error,
}

impl PageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Error => "error",
        }
    }

    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Main => "main.template",
            Self::Error => "error.template",
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

impl View {
    /// Render `name` as a complete page.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotFound`] if `name` is not in the request's collection;
    /// any template failure while rendering the fragment or the wrapper.
    pub fn render(&self, name: &str, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let set = self.get(request.collection());
        let fragment = render_fragment(self, set, name, request.bindings(), 0)?;

        let page_type = request.page_type();
        let wrapper_name = page_type.template_name();
        let wrapper = self.wrapper.get(wrapper_name)?;
        let envelope = BTreeMap::from([
            ("content".to_owned(), Value::from_safe_string(fragment)),
            ("page_type".to_owned(), Value::from(page_type.as_str())),
        ]);

        wrapper
            .render(with_helper(Value::from(envelope), self, 0))
            .map(String::into_bytes)
            .map_err(|source| template_error(wrapper_name, source))
    }
}

impl SnapshotStore {
    /// Render against the snapshots current at the time of the call.
    pub fn render(&self, name: &str, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        self.view()?.render(name, request)
    }
}

/// Evaluate `name` from `set`, convert the markdown, and sanitize it.
pub(crate) fn render_fragment(
    view: &View,
    set: &TemplateSet,
    name: &str,
    bindings: Value,
    depth: usize,
) -> Result<String, RenderError> {
    let template = set.get(name)?;
    let source = template
        .render(with_helper(bindings, view, depth))
        .map_err(|source| template_error(name, source))?;
    Ok(markdown::to_safe_html(&source))
}

/// Wrap a template failure, surfacing a nested recursion limit as itself.
fn template_error(name: &str, source: minijinja::Error) -> RenderError {
    let mut cause = source.source();
    while let Some(err) = cause {
        if let Some(RenderError::RecursionLimit { name, limit }) = err.downcast_ref::<RenderError>() {
            return RenderError::RecursionLimit {
                name: name.clone(),
                limit: *limit,
            };
        }
        cause = err.source();
    }
    RenderError::Template {
        name: name.to_owned(),
        source,
    }
}

/// Merge map `bindings` with a `markdown` helper bound to `view`.
///
/// Non-map bindings carry no fields and are dropped.
fn with_helper(bindings: Value, view: &View, depth: usize) -> Value {
    let mut fields = BTreeMap::new();
    if bindings.kind() == ValueKind::Map
        && let Ok(keys) = bindings.try_iter()
    {
        for key in keys {
            if let Ok(value) = bindings.get_item(&key) {
                fields.insert(key.to_string(), value);
            }
        }
    }
    fields.insert(
        "markdown".to_owned(),
        Value::from_object(MarkdownHelper::new(view.clone(), depth)),
    );
    Value::from(fields)
}
