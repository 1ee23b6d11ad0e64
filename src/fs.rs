//! Filesystem utilities for draftlock.
//!
//! Provides the atomic write used for state files that must never be observed
//! half-written (currently the config scaffolded by `init`). The pattern:
//!
//! 1. Write content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Atomically rename over the target
//!
//! Source and destination must live on the same filesystem for the rename to
//! be atomic. On crash, a `.{filename}.tmp` file may remain.

use crate::error::{DraftlockError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            DraftlockError::StoreError(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;

    let mut file = File::create(&temp_path).map_err(|e| {
        DraftlockError::StoreError(format!(
            "failed to create temp file '{}': {}",
            temp_path.display(),
            e
        ))
    })?;
    file.write_all(content)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            DraftlockError::StoreError(format!(
                "failed to write temp file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        DraftlockError::StoreError(format!(
            "failed to replace '{}' atomically: {}",
            path.display(),
            e
        ))
    })
}

/// Atomically write a string to a file.
///
/// Convenience wrapper around `atomic_write` for string content.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Temp file path in the same directory as the target: `.{filename}.tmp`.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DraftlockError::UserError("invalid file path".to_string()))?;
    Ok(parent.join(format!(".{}.tmp", filename)))
}
