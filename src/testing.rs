//! Site directories for tests.

use crate::template::store::SnapshotStore;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// A temporary site root.
///
/// [`SiteFixture::new`] lays out the smallest loadable site: one content
/// page, both wrapper templates and the 404/500 error pages.
pub struct SiteFixture {
    _dir: TempDir,
    root: PathBuf,
}

impl SiteFixture {
    pub fn new() -> Self {
        let site = Self::empty();
        site.populate();
        site
    }

    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    /// A populated site rooted at `name` inside the temporary directory.
    pub fn nested(name: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(name);
        fs::create_dir_all(&root).unwrap();
        let site = Self { _dir: dir, root };
        site.populate();
        site
    }

    fn populate(&self) {
        self.write("index.md", "# Hi");
        self.write("templates/main.template", "<body>{{ content }}</body>");
        self.write(
            "templates/error.template",
            "<body class=\"error\">{{ content }}</body>",
        );
        self.write("errors/404.md", "Not found: {{ Path }}");
        self.write("errors/500.md", "Internal error: {{ Path }}");
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.root.join(rel)).unwrap();
    }

    /// A store with every collection of this site published.
    pub fn store(&self) -> SnapshotStore {
        let store = SnapshotStore::new();
        crate::template::loader::reload_all(&store, &self.root).unwrap();
        store
    }
}
