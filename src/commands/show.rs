//! Implementation of the `draftlock show` command.
//!
//! Prints the lock record for one version. An unlocked version is a normal
//! outcome, not an error.

use crate::cli::ShowArgs;
use crate::context::require_initialized;
use crate::engine::LockEngine;
use crate::error::Result;
use crate::store::LockStore;
use crate::version::validate_version_id;

/// Execute the `draftlock show` command.
pub fn cmd_show(args: ShowArgs) -> Result<()> {
    validate_version_id(&args.version_id)?;
    let ctx = require_initialized()?;
    let engine = LockEngine::new(LockStore::new(ctx.locks_dir()));

    match engine.is_locked(&args.version_id)? {
        Some(lock) => {
            println!("Version:  {}", lock.version);
            println!("Held by:  {}", lock.created_by);
            println!("Since:    {}", lock.created.to_rfc3339());
            println!("Age:      {}", lock.age_string());
        }
        None => {
            println!("Version '{}' is not locked.", args.version_id);
        }
    }

    Ok(())
}
