//! Template loading and rendering error types.

use super::CollectionKind;
use std::path::PathBuf;
use thiserror::Error;

/// A collection could not be turned into a snapshot.
///
/// Always collection-wide: no part of a failed load is ever published.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid {0} pattern `{1}`")]
    Pattern(CollectionKind, String, #[source] glob::PatternError),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("no {0} templates match `{1}`")]
    Empty(CollectionKind, String),

    #[error("failed to compile {kind} template `{name}`")]
    Compile {
        kind: CollectionKind,
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("{0} templates must define `{1}`")]
    Missing(CollectionKind, &'static str),
}

/// Failure while producing a page or fragment.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0} templates have not been loaded")]
    NotLoaded(CollectionKind),

    #[error("template `{0}` not found")]
    NotFound(String),

    #[error("failed to render `{name}`: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("markdown nesting deeper than {limit} while rendering `{name}`")]
    RecursionLimit { name: String, limit: usize },
}

impl RenderError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
