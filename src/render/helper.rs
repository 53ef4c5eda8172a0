//! The `markdown` template function.
//!
//! ```jinja
//! {{ markdown("nav.pmd") }}
//! {{ markdown("card.pmd", {"title": "Hello"}) }}
//! ```
//!
//! Renders a content template through the full fragment pipeline and
//! returns sanitized HTML marked safe. The optional context must be a map;
//! its keys become the fragment's variables. The helper is bound per render and
//! carries the [`View`] captured by that render, so nested fragments read the
//! same snapshots as the page embedding them.

use super::{MAX_DEPTH, render_fragment};
use crate::template::{RenderError, store::View};
use minijinja::{
    Error, ErrorKind, State,
    value::{Object, ObjectRepr, Value, ValueKind, from_args},
};
use std::sync::Arc;

#[derive(Debug)]
pub struct MarkdownHelper {
    view: View,
    depth: usize,
}

impl MarkdownHelper {
    pub const fn new(view: View, depth: usize) -> Self {
        Self { view, depth }
    }

    fn render_nested(&self, name: &str, bindings: Value) -> Result<Value, RenderError> {
        let depth = self.depth + 1;
        if depth > MAX_DEPTH {
            return Err(RenderError::RecursionLimit {
                name: name.to_owned(),
                limit: MAX_DEPTH,
            });
        }
        let html = render_fragment(&self.view, &self.view.content, name, bindings, depth)?;
        Ok(Value::from_safe_string(html))
    }
}

impl Object for MarkdownHelper {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn call(self: &Arc<Self>, _state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
        let (name, bindings): (&str, Option<Value>) = from_args(args)?;
        if let Some(ctx) = &bindings
            && !matches!(ctx.kind(), ValueKind::Map | ValueKind::None | ValueKind::Undefined)
        {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                format!("markdown context for `{name}` must be a map, not {}", ctx.kind()),
            ));
        }
        self.render_nested(name, bindings.unwrap_or_default())
            .map_err(|err| Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err))
    }
}
