//! Reading template collections from disk.
//!
//! Reload policy:
//!
//! | Load result | Prior snapshot | Outcome                                  |
//! |-------------|----------------|------------------------------------------|
//! | Ok          | any            | publish the new snapshot                 |
//! | Err         | present        | log, keep serving the prior snapshot     |
//! | Err         | absent         | return the error (fatal at cold start)   |

use super::{CollectionKind, LoadError, TemplateSet, store::SnapshotStore};
use crate::log;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// What a [`reload`] did with the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reloaded {
    /// A new snapshot was published.
    Published { templates: usize },
    /// Loading failed; the previously published snapshot is still live.
    KeptPrevious,
}

/// Read and compile every file matching the collection's patterns.
pub fn load(kind: CollectionKind, root: &Path) -> Result<TemplateSet, LoadError> {
    let mut sources = Vec::new();
    for pattern in kind.patterns() {
        for path in matching_files(kind, root, pattern)? {
            let source =
                fs::read_to_string(&path).map_err(|err| LoadError::Io(path.clone(), err))?;
            sources.push((template_name(&path), source));
        }
    }

    if sources.is_empty() {
        return Err(LoadError::Empty(kind, kind.patterns().join(", ")));
    }

    TemplateSet::compile(kind, sources)
}

/// Load `kind` and publish it, falling back to the prior snapshot on failure.
///
/// # Errors
///
/// Returns the load error only when no snapshot of `kind` was ever published.
pub fn reload(
    store: &SnapshotStore,
    kind: CollectionKind,
    root: &Path,
) -> Result<Reloaded, LoadError> {
    match load(kind, root) {
        Ok(set) => {
            let templates = set.len();
            store.publish(Arc::new(set));
            Ok(Reloaded::Published { templates })
        }
        Err(err) if store.cell(kind).is_loaded() => {
            log!("reload"; "keeping previous {kind} templates: {:#}", anyhow::Error::new(err));
            Ok(Reloaded::KeptPrevious)
        }
        Err(err) => Err(err),
    }
}

/// Reload every collection in [`CollectionKind::ALL`] order.
///
/// Stops at the first collection that has never loaded.
pub fn reload_all(store: &SnapshotStore, root: &Path) -> Result<(), LoadError> {
    for kind in CollectionKind::ALL {
        reload(store, kind, root)?;
    }
    Ok(())
}

/// Regular files matching `pattern` under `root`, sorted for stable naming.
fn matching_files(
    kind: CollectionKind,
    root: &Path,
    pattern: &str,
) -> Result<Vec<PathBuf>, LoadError> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let full = format!("{escaped_root}/{pattern}");

    let entries = glob::glob(&full).map_err(|err| LoadError::Pattern(kind, full.clone(), err))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| {
            let path = err.path().to_path_buf();
            LoadError::Io(path, err.into())
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Template key: the file name including its extension (`index.md`).
fn template_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
