//! Moderation-collection assembly for draftlock.
//!
//! A moderation collection is a batch of versions submitted together for a
//! review workflow. Collecting walks a content hierarchy, and locks gate what
//! gets in: a version whose lock is held by someone other than the collection
//! author is excluded together with its entire subtree. Traversal stops at
//! the first locked node and never inspects its children; a version locked by
//! the collection author is included like an unlocked one.

use crate::engine::LockEngine;
use crate::error::Result;
use crate::version::{Version, VersionRepository};

/// A batch of version ids gathered for review, attributed to one author.
#[derive(Debug, Clone)]
pub struct ModerationCollection {
    author: String,
    entries: Vec<String>,
}

impl ModerationCollection {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            entries: Vec::new(),
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Version ids collected so far, in traversal order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Add a version, and optionally its moderated descendants, to the
    /// collection.
    ///
    /// Returns the number of versions added. A version locked by a user other
    /// than the collection author contributes nothing: neither it nor any of
    /// its descendants are added.
    pub fn add_version(
        &mut self,
        version: &Version,
        engine: &LockEngine,
        repo: &dyn VersionRepository,
        include_children: bool,
    ) -> Result<usize> {
        if !engine.is_unlocked_for(&version.id, &self.author)? {
            return Ok(0);
        }

        self.entries.push(version.id.clone());
        let mut added = 1;

        if include_children {
            for child in repo.moderated_children(version) {
                added += self.add_version(&child, engine, repo, true)?;
            }
        }

        Ok(added)
    }
}
