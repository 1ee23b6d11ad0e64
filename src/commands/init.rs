//! Implementation of the `draftlock init` command.
//!
//! Creates the state directory layout in the current directory:
//!
//! ```text
//! .draftlock/
//!   config.yaml
//!   locks/
//!   events/
//!   outbox/
//! ```

use crate::config::Config;
use crate::context::StateContext;
use crate::error::{DraftlockError, Result};
use crate::fs::atomic_write_file;
use std::env;
use std::fs;

/// Execute the `draftlock init` command.
pub fn cmd_init() -> Result<()> {
    let cwd = env::current_dir().map_err(|e| {
        DraftlockError::UserError(format!("failed to get current working directory: {}", e))
    })?;
    let ctx = StateContext::at(&cwd);

    if ctx.is_initialized() {
        return Err(DraftlockError::UserError(format!(
            "draftlock is already initialized at '{}'",
            ctx.state_dir.display()
        )));
    }

    for dir in [
        ctx.locks_dir(),
        ctx.state_dir.join("events"),
        ctx.state_dir.join("outbox"),
    ] {
        fs::create_dir_all(&dir).map_err(|e| {
            DraftlockError::StoreError(format!(
                "failed to create directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let config = Config::default();
    atomic_write_file(ctx.config_path(), &config.to_yaml()?)?;

    println!("Initialized draftlock state at {}", ctx.state_dir.display());
    println!();
    println!("Next steps:");
    println!("  - add release authorities to {}", ctx.config_path().display());
    println!("  - wire your versioning hooks to the lock engine");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DirGuard;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_init_creates_layout() {
        let temp_dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(temp_dir.path());

        cmd_init().unwrap();

        let state = temp_dir.path().join(".draftlock");
        assert!(state.join("locks").is_dir());
        assert!(state.join("events").is_dir());
        assert!(state.join("outbox").is_dir());
        assert!(state.join("config.yaml").is_file());

        let config = Config::load(state.join("config.yaml")).unwrap();
        assert!(config.release_authorities.is_empty());
    }

    #[test]
    #[serial]
    fn test_init_refuses_to_reinitialize() {
        let temp_dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(temp_dir.path());

        cmd_init().unwrap();
        let err = cmd_init().unwrap_err();
        assert!(err.to_string().contains("already initialized"));
    }
}
