//! Published template snapshots with atomic replacement.
//!
//! Uses `arc-swap` for lock-free reads and atomic snapshot replacement, so
//! the reloader can swap in freshly compiled templates while requests keep
//! rendering.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              SnapshotStore (one cell per kind)              │
//! │                                                             │
//! │  ┌─────────────┐     ┌─────────────┐     ┌─────────────┐    │
//! │  │  Request 1  │     │  Request 2  │     │  Reloader   │    │
//! │  └──────┬──────┘     └──────┬──────┘     └──────┬──────┘    │
//! │         │                   │                   │           │
//! │         ▼                   ▼                   ▼           │
//! │       view()              view()            publish()       │
//! │    (lock-free)         (lock-free)      (atomic replace)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`View`] holds its own `Arc` to each snapshot, so a render that started
//! before a reload finishes against the snapshots it captured. Old snapshots
//! are dropped once the last view holding them goes away.

use super::{CollectionKind, RenderError, TemplateSet};
use arc_swap::ArcSwapOption;
use std::sync::Arc;

// =============================================================================
// Snapshot Cell
// =============================================================================

/// One atomically swappable published reference.
///
/// Empty until the first successful publish, never empty afterwards.
#[derive(Debug, Default)]
pub struct SnapshotCell {
    slot: ArcSwapOption<TemplateSet>,
}

impl SnapshotCell {
    /// Replace the published snapshot. Wait-free for concurrent readers.
    #[inline]
    pub fn publish(&self, snapshot: Arc<TemplateSet>) {
        self.slot.store(Some(snapshot));
    }

    /// Current snapshot, or `None` before the first publish.
    #[inline]
    pub fn current(&self) -> Option<Arc<TemplateSet>> {
        self.slot.load_full()
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.slot.load().is_some()
    }
}

// =============================================================================
// Snapshot Store
// =============================================================================

/// The three published collections of a site.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    content: SnapshotCell,
    wrapper: SnapshotCell,
    errors: SnapshotCell,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn cell(&self, kind: CollectionKind) -> &SnapshotCell {
        match kind {
            CollectionKind::Content => &self.content,
            CollectionKind::Wrapper => &self.wrapper,
            CollectionKind::Error => &self.errors,
        }
    }

    /// Publish `snapshot` under its own collection kind.
    pub fn publish(&self, snapshot: Arc<TemplateSet>) {
        self.cell(snapshot.kind()).publish(snapshot);
    }

    pub fn current(&self, kind: CollectionKind) -> Result<Arc<TemplateSet>, RenderError> {
        self.cell(kind)
            .current()
            .ok_or(RenderError::NotLoaded(kind))
    }

    /// Capture the current snapshot of every collection.
    ///
    /// Each collection is read atomically on its own; no atomicity is
    /// promised across kinds.
    pub fn view(&self) -> Result<View, RenderError> {
        Ok(View {
            content: self.current(CollectionKind::Content)?,
            wrapper: self.current(CollectionKind::Wrapper)?,
            errors: self.current(CollectionKind::Error)?,
        })
    }
}

// =============================================================================
// View
// =============================================================================

/// Snapshots captured for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct View {
    pub content: Arc<TemplateSet>,
    pub wrapper: Arc<TemplateSet>,
    pub errors: Arc<TemplateSet>,
}

impl View {
    pub fn get(&self, kind: CollectionKind) -> &Arc<TemplateSet> {
        match kind {
            CollectionKind::Content => &self.content,
            CollectionKind::Wrapper => &self.wrapper,
            CollectionKind::Error => &self.errors,
        }
    }
}
