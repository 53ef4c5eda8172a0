//! A site root with its published templates and reload lifecycle.

use crate::{
    log,
    reload::Reloader,
    template::{
        CollectionKind, LoadError, loader,
        store::SnapshotStore,
    },
};
use parking_lot::Mutex;
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

/// Name of the directory holding static assets, relative to the site root.
pub const STATIC_DIR: &str = "static";

#[derive(Debug)]
pub struct Site {
    root: PathBuf,
    store: Arc<SnapshotStore>,
    reloader: Mutex<Option<Reloader>>,
}

impl Site {
    /// Load every collection once.
    ///
    /// # Errors
    ///
    /// Any collection failing to load. Nothing is served from a site that
    /// never loaded completely.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let root = root.into();
        let store = Arc::new(SnapshotStore::new());
        loader::reload_all(&store, &root)?;
        Ok(Self {
            root,
            store,
            reloader: Mutex::new(None),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn static_root(&self) -> PathBuf {
        self.root.join(STATIC_DIR)
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Start the background reloader.
    ///
    /// Returns `false` if it is already running.
    pub fn start_reloader(&self, interval: Duration) -> io::Result<bool> {
        let mut slot = self.reloader.lock();
        if slot.is_some() {
            return Ok(false);
        }

        let store = Arc::clone(&self.store);
        let root = self.root.clone();
        *slot = Some(Reloader::spawn(interval, move || {
            reload_logged(&store, &root);
        })?);
        Ok(true)
    }

    /// Stop the background reloader, waiting for an in-progress reload.
    pub fn stop_reloader(&self) {
        // take first so the lock is not held while joining
        let reloader = self.reloader.lock().take();
        if let Some(reloader) = reloader {
            reloader.stop();
        }
    }
}

fn reload_logged(store: &SnapshotStore, root: &Path) {
    for kind in CollectionKind::ALL {
        if let Err(err) = loader::reload(store, kind, root) {
            log!("reload"; "{kind} templates unavailable: {:#}", anyhow::Error::new(err));
        }
    }
}
