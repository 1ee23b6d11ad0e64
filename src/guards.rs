//! Action guards for draftlock.
//!
//! Guards gate state-changing versioning actions on lock state. Each guard is
//! a predicate over `(version, user)` that succeeds silently or fails with an
//! error naming the current lock holder, so callers can render a useful
//! denial message.
//!
//! Checks hang off an explicit [`GuardRegistry`] owned by the composition
//! root: per-action check lists with a defined registration and invocation
//! order, so host integrations can append their own checks next to the
//! built-in lock checks. `enforce` runs an action's checks in registration
//! order and surfaces the first failure.
//!
//! Two lock checks cover all guarded actions:
//!
//! - direct-target (`change`, `archive`, `discard`): the version being acted
//!   on must be unlocked for the acting user
//! - draft-line (`revert`, `unpublish`, `edit-redirect`): the *latest draft*
//!   in the version's content grouping must be unlocked for the acting user,
//!   since a draft may exist ahead of the action target and the action must
//!   not override someone else's in-progress edit
//!
//! A missing lock always passes. Explicit unlock is guarded separately by
//! [`check_unlock`]: it needs a distinct release authority, not ownership.

use crate::engine::LockEngine;
use crate::error::{DraftlockError, Result};
use crate::version::{Version, VersionRepository};

/// Versioning actions gated by lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedAction {
    /// Admin change permission on the version's content.
    Change,
    /// Archiving the version.
    Archive,
    /// Discarding the version.
    Discard,
    /// Reverting the content grouping to this version.
    Revert,
    /// Unpublishing the version.
    Unpublish,
    /// Entering edit mode on the version's content.
    EditRedirect,
}

impl std::fmt::Display for GuardedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardedAction::Change => write!(f, "change"),
            GuardedAction::Archive => write!(f, "archive"),
            GuardedAction::Discard => write!(f, "discard"),
            GuardedAction::Revert => write!(f, "revert"),
            GuardedAction::Unpublish => write!(f, "unpublish"),
            GuardedAction::EditRedirect => write!(f, "edit-redirect"),
        }
    }
}

/// Collaborators a check may consult.
pub struct GuardContext<'a> {
    pub engine: &'a LockEngine,
    pub repo: &'a dyn VersionRepository,
}

/// One check in an action's guard list.
pub trait ActionCheck {
    fn check(&self, ctx: &GuardContext<'_>, version: &Version, user: &str) -> Result<()>;
}

/// Deny when the action target itself is locked by another user.
pub struct VersionLockedCheck;

impl ActionCheck for VersionLockedCheck {
    fn check(&self, ctx: &GuardContext<'_>, version: &Version, user: &str) -> Result<()> {
        if let Some(lock) = ctx.engine.is_locked(&version.id)?
            && lock.created_by != user
        {
            return Err(DraftlockError::LockedByOther {
                version: version.id.clone(),
                holder: lock.created_by,
            });
        }
        Ok(())
    }
}

/// Deny when the latest draft in the target's content grouping is locked by
/// another user.
pub struct DraftLockedCheck;

impl ActionCheck for DraftLockedCheck {
    fn check(&self, ctx: &GuardContext<'_>, version: &Version, user: &str) -> Result<()> {
        if let Some(lock) = ctx.engine.latest_draft_lock_for(version, ctx.repo)?
            && lock.created_by != user
        {
            return Err(DraftlockError::LockedByOther {
                version: lock.version,
                holder: lock.created_by,
            });
        }
        Ok(())
    }
}

/// Ordered per-action check lists.
///
/// Owned by the composition root and passed by reference to callers; checks
/// run in registration order.
#[derive(Default)]
pub struct GuardRegistry {
    checks: Vec<(GuardedAction, Box<dyn ActionCheck>)>,
}

impl GuardRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in lock checks registered.
    ///
    /// `change`, `archive`, and `discard` inspect the action target; `revert`,
    /// `unpublish`, and `edit-redirect` inspect the latest draft in the
    /// target's content grouping.
    pub fn with_lock_checks() -> Self {
        let mut registry = Self::new();
        registry.register(GuardedAction::Change, Box::new(VersionLockedCheck));
        registry.register(GuardedAction::Archive, Box::new(VersionLockedCheck));
        registry.register(GuardedAction::Discard, Box::new(VersionLockedCheck));
        registry.register(GuardedAction::Revert, Box::new(DraftLockedCheck));
        registry.register(GuardedAction::Unpublish, Box::new(DraftLockedCheck));
        registry.register(GuardedAction::EditRedirect, Box::new(DraftLockedCheck));
        registry
    }

    /// Append a check to an action's list.
    pub fn register(&mut self, action: GuardedAction, check: Box<dyn ActionCheck>) {
        self.checks.push((action, check));
    }

    /// Run an action's checks in registration order; the first failure wins.
    pub fn enforce(
        &self,
        action: GuardedAction,
        ctx: &GuardContext<'_>,
        version: &Version,
        user: &str,
    ) -> Result<()> {
        for (registered_action, check) in &self.checks {
            if *registered_action == action {
                check.check(ctx, version, user)?;
            }
        }
        Ok(())
    }

    /// Predicate form of `enforce`: `Ok(false)` on a lock denial, errors on
    /// anything else (store failures stay errors).
    pub fn allows(
        &self,
        action: GuardedAction,
        ctx: &GuardContext<'_>,
        version: &Version,
        user: &str,
    ) -> Result<bool> {
        match self.enforce(action, ctx, version, user) {
            Ok(()) => Ok(true),
            Err(DraftlockError::LockedByOther { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Authorizations a caller may hold, independent of lock ownership.
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissions {
    /// May remove locks held by other users.
    pub can_release_others_lock: bool,
}

/// Guard the explicit unlock operation.
///
/// Unlocking requires the version to still be draft (anything else reads as
/// not-applicable, since non-draft versions cannot hold a lock) and the
/// distinct release authority. Holding the lock does not substitute for the
/// authority: the operation exists so a privileged third party can revoke
/// someone else's lock without assuming their identity.
pub fn check_unlock(version: &Version, permissions: &Permissions) -> Result<()> {
    if !version.state.is_editable() {
        return Err(DraftlockError::NotApplicable(format!(
            "version '{}' is {} and cannot hold a lock",
            version.id, version.state
        )));
    }

    if !permissions.can_release_others_lock {
        return Err(DraftlockError::PermissionDenied(
            "removing a version lock requires the release authority; \
             holding the lock is not sufficient"
                .to_string(),
        ));
    }

    Ok(())
}
