//! Template collections and their immutable snapshots.
//!
//! A site has three independent collections, each compiled from its own
//! glob patterns under the site root:
//!
//! | Kind      | Patterns                   | Keys                    | Escaping |
//! |-----------|----------------------------|-------------------------|----------|
//! | `content` | `*.md`, `*.pmd`            | `index.md`, `nav.pmd`   | none     |
//! | `wrapper` | `templates/*.template`     | `main.template`, ...    | HTML     |
//! | `error`   | `errors/*.md`              | `404.md`, `500.md`      | none     |
//!
//! A [`TemplateSet`] is never mutated after [`loader::load`] builds it; a
//! reload produces a new set which is then published through the
//! [`store::SnapshotStore`].

mod error;
pub mod loader;
pub mod store;

pub use error::{LoadError, RenderError};

use minijinja::{AutoEscape, Environment, Template, UndefinedBehavior};
use std::{collections::BTreeSet, fmt};

// ============================================================================
// Collection Kinds
// ============================================================================

/// One of the three independently reloaded template collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Markdown page sources and partials.
    Content,
    /// HTML page skeletons wrapped around rendered markdown.
    Wrapper,
    /// Markdown sources for error pages.
    Error,
}

impl CollectionKind {
    /// Reload order. Wrapper templates may embed rendered content, so content
    /// is refreshed first.
    pub const ALL: [Self; 3] = [Self::Content, Self::Wrapper, Self::Error];

    /// Glob patterns relative to the site root.
    pub const fn patterns(self) -> &'static [&'static str] {
        match self {
            Self::Content => &["*.md", "*.pmd"],
            Self::Wrapper => &["templates/*.template"],
            Self::Error => &["errors/*.md"],
        }
    }

    /// Template names that must exist for the collection to be usable.
    pub const fn required(self) -> &'static [&'static str] {
        match self {
            Self::Wrapper => &["main.template", "error.template"],
            Self::Content | Self::Error => &[],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Wrapper => "wrapper",
            Self::Error => "error",
        }
    }

    const fn auto_escape(self) -> AutoEscape {
        match self {
            Self::Wrapper => AutoEscape::Html,
            Self::Content | Self::Error => AutoEscape::None,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// A fully compiled, immutable collection of named templates.
#[derive(Debug)]
pub struct TemplateSet {
    kind: CollectionKind,
    env: Environment<'static>,
    names: BTreeSet<String>,
}

impl TemplateSet {
    /// Compile `sources` as one unit. Any compile error discards the whole set.
    pub fn compile<I>(kind: CollectionKind, sources: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(move |_| kind.auto_escape());

        let mut names = BTreeSet::new();
        for (name, source) in sources {
            env.add_template_owned(name.clone(), source)
                .map_err(|source| LoadError::Compile {
                    kind,
                    name: name.clone(),
                    source,
                })?;
            names.insert(name);
        }

        if let Some(missing) = kind.required().iter().find(|r| !names.contains(**r)) {
            return Err(LoadError::Missing(kind, *missing));
        }

        Ok(Self { kind, env, names })
    }

    pub const fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Look up a compiled template by name.
    pub fn get(&self, name: &str) -> Result<Template<'_, '_>, RenderError> {
        if !self.contains(name) {
            return Err(RenderError::NotFound(name.to_owned()));
        }
        self.env
            .get_template(name)
            .map_err(|source| RenderError::Template {
                name: name.to_owned(),
                source,
            })
    }
}
