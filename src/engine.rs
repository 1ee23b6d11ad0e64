//! Lock engine for draftlock.
//!
//! The engine is the only component that mutates the lock store and the place
//! where locking policy lives:
//!
//! - `acquire` is idempotent: a second acquire for an already-locked version
//!   is a no-op that never reassigns ownership. Ownership moves only through
//!   an intervening `release` followed by a fresh `acquire`.
//! - `release` is idempotent: releasing an unlocked version removes nothing
//!   and is not an error.
//! - `is_unlocked_for` is the central authorization predicate consumed by
//!   guards, admin surfaces, and moderation traversal.
//!
//! When constructed with an event log, the engine appends an `acquired` event
//! for every lock it creates and a `released` event for every lock it removes.

use crate::error::{DraftlockError, Result};
use crate::events::{Event, EventAction, EventLog};
use crate::store::{LockStore, VersionLock};
use crate::version::{Version, VersionRepository};
use serde_json::json;

/// Policy layer over the lock store.
#[derive(Debug, Clone)]
pub struct LockEngine {
    store: LockStore,
    log: Option<EventLog>,
}

impl LockEngine {
    /// Create an engine over the given store.
    pub fn new(store: LockStore) -> Self {
        Self { store, log: None }
    }

    /// Attach an audit event log; lock mutations will be appended to it.
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// The lock currently held on a version, if any. Side-effect free.
    pub fn is_locked(&self, version_id: &str) -> Result<Option<VersionLock>> {
        self.store.get(version_id)
    }

    /// Whether `user` may act on the version: true when no lock exists or the
    /// lock belongs to `user`.
    pub fn is_unlocked_for(&self, version_id: &str, user: &str) -> Result<bool> {
        Ok(match self.store.get(version_id)? {
            Some(lock) => lock.created_by == user,
            None => true,
        })
    }

    /// Idempotently lock a version for `holder`.
    ///
    /// If the version is already locked the existing lock is returned
    /// unchanged, whoever holds it: re-entrant saves of a draft must not
    /// silently reassign ownership away from the original locking user. Of
    /// two concurrent acquires, the one whose insert wins attributes the
    /// lock; the other observes it as pre-existing.
    pub fn acquire(&self, version_id: &str, holder: &str) -> Result<VersionLock> {
        loop {
            match self.store.create(version_id, holder) {
                Ok(lock) => {
                    self.log_event(
                        Event::new(EventAction::Acquired, holder)
                            .with_version(version_id)
                            .with_details(json!({ "holder": holder })),
                    )?;
                    return Ok(lock);
                }
                Err(DraftlockError::AlreadyLocked { .. }) => {
                    // A conflict means a lock existed a moment ago. If it is
                    // still there, that lock wins; if a concurrent release
                    // removed it in between, the next insert settles it.
                    if let Some(existing) = self.store.get(version_id)? {
                        return Ok(existing);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Idempotently release the lock on a version.
    ///
    /// Returns the number of locks removed (0 or 1); releasing an unlocked
    /// version is safe.
    pub fn release(&self, version_id: &str) -> Result<usize> {
        let prior = self.store.get(version_id)?;
        let removed = self.store.delete(version_id)?;

        if removed > 0 {
            let actor = prior
                .map(|lock| lock.created_by)
                .unwrap_or_else(|| "unknown".to_string());
            self.log_event(
                Event::new(EventAction::Released, actor).with_version(version_id),
            )?;
        }

        Ok(removed)
    }

    /// The lock on the current latest draft sharing `version`'s content
    /// grouping, if any.
    ///
    /// Non-draft versions never carry a lock themselves; actions targeting
    /// them (revert, unpublish, edit-redirect) are blocked by an unresolved
    /// lock on the draft line instead, and this is the query that finds it.
    pub fn latest_draft_lock_for(
        &self,
        version: &Version,
        repo: &dyn VersionRepository,
    ) -> Result<Option<VersionLock>> {
        match repo.latest_draft(&version.content) {
            Some(draft) => self.is_locked(&draft.id),
            None => Ok(None),
        }
    }

    /// All active locks, sorted by version id.
    pub fn active_locks(&self) -> Result<Vec<VersionLock>> {
        self.store.list()
    }

    fn log_event(&self, event: Event) -> Result<()> {
        match &self.log {
            Some(log) => log.append(&event),
            None => Ok(()),
        }
    }
}
