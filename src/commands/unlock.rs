//! Implementation of the `draftlock unlock` command.
//!
//! The explicit-release entry point: the one way a lock is removed while its
//! version is still draft. Unlocking is gated on the release authority from
//! the configuration, not on holding the lock, so a privileged user can
//! revoke someone else's lock without assuming their identity. The prior
//! holder is notified through the outbox, and the removal is recorded in the
//! audit log.
//!
//! Only this mutating subcommand removes locks; the read-only commands never
//! do.

use crate::cli::UnlockArgs;
use crate::config::Config;
use crate::context::require_initialized;
use crate::engine::LockEngine;
use crate::error::{DraftlockError, Result};
use crate::events::{local_actor, Event, EventAction, EventLog};
use crate::notify::{Notifier, OutboxNotifier, UnlockNotice};
use crate::store::LockStore;
use crate::version::validate_version_id;
use serde_json::json;

/// Execute the `draftlock unlock` command.
pub fn cmd_unlock(args: UnlockArgs) -> Result<()> {
    validate_version_id(&args.version_id)?;
    let ctx = require_initialized()?;
    let config = Config::load(ctx.config_path()).unwrap_or_default();
    let actor = args.actor.unwrap_or_else(local_actor);

    // Event logging for the explicit path is done here, attributed to the
    // actor, so the engine is built without its own log
    let engine = LockEngine::new(LockStore::new(ctx.locks_dir()));

    let lock = engine.is_locked(&args.version_id)?.ok_or_else(|| {
        DraftlockError::NotApplicable(format!(
            "no lock held for version '{}'",
            args.version_id
        ))
    })?;

    if !config.is_release_authority(&actor) {
        return Err(DraftlockError::PermissionDenied(format!(
            "removing a version lock requires the release authority; \
             '{}' is not listed in release_authorities",
            actor
        )));
    }

    engine.release(&args.version_id)?;

    EventLog::new(ctx.events_path()).append(
        &Event::new(EventAction::Unlocked, actor.clone())
            .with_version(&args.version_id)
            .with_details(json!({ "prior_holder": lock.created_by })),
    )?;

    println!(
        "Unlocked version '{}' (was held by {})",
        args.version_id, lock.created_by
    );

    if config.notify_on_unlock
        && let Some(notice) = UnlockNotice::for_removed_lock(&lock, &actor)
    {
        OutboxNotifier::new(ctx.outbox_path()).notify_unlocked(&notice)?;
        println!("Notified {}", notice.recipient);
    }

    Ok(())
}
