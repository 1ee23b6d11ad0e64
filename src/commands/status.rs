//! Implementation of the `draftlock status` command.
//!
//! Lists every active lock with its holder and age.

use crate::context::require_initialized;
use crate::engine::LockEngine;
use crate::error::Result;
use crate::store::LockStore;

/// Execute the `draftlock status` command.
pub fn cmd_status() -> Result<()> {
    let ctx = require_initialized()?;
    let engine = LockEngine::new(LockStore::new(ctx.locks_dir()));

    let locks = engine.active_locks()?;

    println!("Lock Status");
    println!("===========");
    println!();

    if locks.is_empty() {
        println!("No versions are locked.");
        return Ok(());
    }

    println!("{} version(s) locked:", locks.len());
    for lock in &locks {
        println!("  - {}", lock);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DirGuard;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn init_state(root: &std::path::Path) -> LockEngine {
        fs::create_dir_all(root.join(".draftlock").join("locks")).unwrap();
        LockEngine::new(LockStore::new(root.join(".draftlock").join("locks")))
    }

    #[test]
    #[serial]
    fn test_status_on_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        init_state(temp_dir.path());
        let _guard = DirGuard::new(temp_dir.path());

        cmd_status().unwrap();
    }

    #[test]
    #[serial]
    fn test_status_with_locks() {
        let temp_dir = TempDir::new().unwrap();
        let engine = init_state(temp_dir.path());
        engine.acquire("v1", "alice").unwrap();
        engine.acquire("v2", "bob").unwrap();
        let _guard = DirGuard::new(temp_dir.path());

        cmd_status().unwrap();
    }

    #[test]
    #[serial]
    fn test_status_requires_initialized_state() {
        let temp_dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(temp_dir.path());

        assert!(cmd_status().is_err());
    }
}
