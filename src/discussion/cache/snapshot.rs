//! Immutable page snapshots.

use std::sync::Arc;

use crate::discussion::models::{Discussion, DiscussionPage, flatten_pages};

/// One committed state of the page sequence.
///
/// Snapshots are cheap to clone and never change once written. Every write
/// to the cache produces a new snapshot with a higher [`version`], so two
/// snapshots describe the same state exactly when their versions match.
///
/// [`version`]: Snapshot::version
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pages: Arc<[DiscussionPage]>,
    version: u64,
}

impl Snapshot {
    pub(crate) fn new(pages: Vec<DiscussionPage>, version: u64) -> Self {
        Self {
            pages: pages.into(),
            version,
        }
    }

    /// Returns the pages in fetch order.
    #[must_use]
    pub fn pages(&self) -> &[DiscussionPage] {
        &self.pages
    }

    /// Returns the write counter of this snapshot.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the number of held pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true when no pages are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Concatenates the held pages into one discussion.
    #[must_use]
    pub fn discussion(&self) -> Option<Discussion> {
        flatten_pages(&self.pages)
    }
}
