//! State-directory resolution for draftlock.
//!
//! All CLI commands locate lock state through this module, so operations
//! always target the same `.draftlock/` directory regardless of which
//! subdirectory the command is invoked from. Resolution walks up from the
//! working directory until it finds a `.draftlock/` directory; if none
//! exists, the starting directory is taken as the root (the `init` command
//! relies on that to create a fresh state dir in place).

use crate::error::{DraftlockError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the state directory.
pub const STATE_DIR_NAME: &str = ".draftlock";

/// Resolved paths for draftlock state. All paths are absolute.
#[derive(Debug, Clone)]
pub struct StateContext {
    /// Directory containing the state dir.
    pub root: PathBuf,

    /// The state directory itself (`{root}/.draftlock`).
    pub state_dir: PathBuf,
}

impl StateContext {
    /// Resolve from the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            DraftlockError::UserError(format!("failed to get current working directory: {}", e))
        })?;
        Ok(Self::resolve_from(&cwd))
    }

    /// Context rooted at a specific directory, without searching ancestors.
    ///
    /// `init` uses this so a nested project can get its own state dir even
    /// when an ancestor already has one.
    pub fn at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let state_dir = root.join(STATE_DIR_NAME);
        Self { root, state_dir }
    }

    /// Resolve from a specific directory.
    ///
    /// Walks up the ancestor chain looking for an existing state dir; falls
    /// back to the starting directory when none is found.
    pub fn resolve_from<P: AsRef<Path>>(start: P) -> Self {
        let start = start.as_ref();

        for dir in start.ancestors() {
            let candidate = dir.join(STATE_DIR_NAME);
            if candidate.is_dir() {
                return Self {
                    root: dir.to_path_buf(),
                    state_dir: candidate,
                };
            }
        }

        Self {
            root: start.to_path_buf(),
            state_dir: start.join(STATE_DIR_NAME),
        }
    }

    /// Directory holding the lock files.
    pub fn locks_dir(&self) -> PathBuf {
        self.state_dir.join("locks")
    }

    /// Path of the config file.
    pub fn config_path(&self) -> PathBuf {
        self.state_dir.join("config.yaml")
    }

    /// Path of the audit event log.
    pub fn events_path(&self) -> PathBuf {
        self.state_dir.join("events").join("events.ndjson")
    }

    /// Path of the notification outbox.
    pub fn outbox_path(&self) -> PathBuf {
        self.state_dir.join("outbox").join("outbox.ndjson")
    }

    /// Whether the state directory exists.
    pub fn is_initialized(&self) -> bool {
        self.state_dir.is_dir()
    }

    /// Fail with a user error unless the state directory exists.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(DraftlockError::UserError(format!(
                "no {} state directory found at or above '{}'.\n\
                 Run 'draftlock init' first.",
                STATE_DIR_NAME,
                self.root.display()
            )));
        }
        Ok(())
    }
}

/// Resolve the context and require an initialized state directory.
pub fn require_initialized() -> Result<StateContext> {
    let ctx = StateContext::resolve()?;
    ctx.ensure_initialized()?;
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DirGuard;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_from_initialized_root() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(STATE_DIR_NAME)).unwrap();

        let ctx = StateContext::resolve_from(temp_dir.path());
        assert_eq!(ctx.root, temp_dir.path());
        assert!(ctx.is_initialized());
    }

    #[test]
    fn test_resolve_walks_up_to_the_state_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(STATE_DIR_NAME)).unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let ctx = StateContext::resolve_from(&nested);
        assert_eq!(ctx.root, temp_dir.path());
    }

    #[test]
    fn test_resolve_falls_back_to_start_when_uninitialized() {
        let temp_dir = TempDir::new().unwrap();

        let ctx = StateContext::resolve_from(temp_dir.path());
        assert_eq!(ctx.root, temp_dir.path());
        assert!(!ctx.is_initialized());
        assert!(ctx.ensure_initialized().is_err());
    }

    #[test]
    fn test_state_paths() {
        let ctx = StateContext::resolve_from("/tmp/project");
        assert!(ctx.locks_dir().ends_with(".draftlock/locks"));
        assert!(ctx.config_path().ends_with(".draftlock/config.yaml"));
        assert!(ctx.events_path().ends_with(".draftlock/events/events.ndjson"));
        assert!(ctx.outbox_path().ends_with(".draftlock/outbox/outbox.ndjson"));
    }

    #[test]
    #[serial]
    fn test_require_initialized_from_cwd() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(STATE_DIR_NAME)).unwrap();
        let _guard = DirGuard::new(temp_dir.path());

        let ctx = require_initialized().unwrap();
        assert!(ctx.is_initialized());
    }

    #[test]
    #[serial]
    fn test_require_initialized_fails_without_state_dir() {
        let temp_dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(temp_dir.path());

        let err = require_initialized().unwrap_err();
        assert!(err.to_string().contains("draftlock init"));
    }
}
