//! Lifecycle synchronization for draftlock.
//!
//! Keeps the lock store consistent with version state, transparently to
//! callers who merely save a version. The versioning collaborator invokes
//! `after_save` once a version save has durably committed; the hook is a pure
//! function of the resulting state with no per-transition special-casing:
//!
//! - resulting state is draft: the version is locked for its recorded author
//!   (idempotently, so re-entrant saves keep the original holder)
//! - any other state: the lock, if any, is released
//!
//! Copy-on-edit needs no extra handling here. The versioning framework
//! records the copier as the new draft's author, so the fresh lock lands on
//! whoever claimed the draft. Edit-redirect re-entry works the same way: the
//! caller re-saves the version with the requesting user as author, and the
//! next `after_save` reacquires for that user.

use crate::engine::LockEngine;
use crate::error::Result;
use crate::store::VersionLock;
use crate::version::Version;

/// What a synchronization pass did to the lock state.
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// The version is draft and holds this lock (freshly created or retained).
    Locked(VersionLock),
    /// The version is not draft; `removed` locks were deleted (0 or 1).
    Unlocked { removed: usize },
}

/// Post-save hook keeping lock state consistent with version state.
#[derive(Debug)]
pub struct LockSynchronizer<'a> {
    engine: &'a LockEngine,
}

impl<'a> LockSynchronizer<'a> {
    pub fn new(engine: &'a LockEngine) -> Self {
        Self { engine }
    }

    /// Synchronize lock state after a version save has committed.
    ///
    /// Must run on every save, whatever triggered it (create, copy-on-edit,
    /// publish, unpublish, archive, discard, revert). Must not run for a save
    /// that failed to commit.
    pub fn after_save(&self, version: &Version) -> Result<SyncOutcome> {
        if version.state.is_editable() {
            let lock = self.engine.acquire(&version.id, &version.created_by)?;
            Ok(SyncOutcome::Locked(lock))
        } else {
            let removed = self.engine.release(&version.id)?;
            Ok(SyncOutcome::Unlocked { removed })
        }
    }
}
