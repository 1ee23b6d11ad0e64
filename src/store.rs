//! Lock store for draftlock.
//!
//! The store is the sole persistence layer for version locks: one JSON record
//! per locked version, stored as `{version_id}.lock` under the locks
//! directory. A version has at most one lock because it has at most one lock
//! file.
//!
//! # Lock Files
//!
//! Inserting a lock is an atomic "insert if absent": the record is written to
//! a temp file and hard-linked into place, and the link fails when a lock
//! file already exists. Of two concurrent creates for the same version,
//! exactly one wins, the loser observes a conflict, and no reader ever sees a
//! half-written record. This is the only concurrency mechanism the locking
//! layer needs.
//!
//! # Record Format
//!
//! Each lock file contains JSON metadata:
//! - `version`: id of the locked version
//! - `created_by`: the user holding the lock
//! - `created`: RFC3339 timestamp, set once at creation
//!
//! Only the lock engine writes through this store; everything else reads lock
//! state through engine queries.

use crate::error::{DraftlockError, Result};
use crate::version::validate_version_id;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes temp files of concurrent creates within one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A persisted version lock.
///
/// Never mutated in place: ownership changes only by deleting the record and
/// creating a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionLock {
    /// Id of the locked version.
    pub version: String,

    /// The user holding the lock.
    pub created_by: String,

    /// When the lock was created (RFC3339).
    pub created: DateTime<Utc>,
}

impl VersionLock {
    fn new(version: &str, created_by: &str) -> Self {
        Self {
            version: version.to_string(),
            created_by: created_by.to_string(),
            created: Utc::now(),
        }
    }

    /// Parse a lock record from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            DraftlockError::StoreError(format!(
                "failed to read lock file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            DraftlockError::StoreError(format!(
                "failed to parse lock file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Serialize the lock record to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DraftlockError::StoreError(format!("failed to serialize lock: {}", e)))
    }

    /// How long the lock has been held.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

impl std::fmt::Display for VersionLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (held by {}, {} ago)",
            self.version,
            self.created_by,
            self.age_string()
        )
    }
}

/// File-backed lock store: `{locks_dir}/{version_id}.lock` per active lock.
#[derive(Debug, Clone)]
pub struct LockStore {
    locks_dir: PathBuf,
}

impl LockStore {
    /// Open a store rooted at the given locks directory.
    ///
    /// The directory is created on first write, not here, so opening a store
    /// for read-only queries never touches the filesystem.
    pub fn new<P: Into<PathBuf>>(locks_dir: P) -> Self {
        Self {
            locks_dir: locks_dir.into(),
        }
    }

    /// Path of the lock file for a version.
    pub fn lock_path(&self, version_id: &str) -> PathBuf {
        self.locks_dir.join(format!("{}.lock", version_id))
    }

    /// Look up the lock for a version.
    ///
    /// Absence is a normal state: returns `Ok(None)` when no lock exists,
    /// never an error.
    pub fn get(&self, version_id: &str) -> Result<Option<VersionLock>> {
        validate_version_id(version_id)?;
        let path = self.lock_path(version_id);

        match fs::read_to_string(&path) {
            Ok(content) => {
                let lock = serde_json::from_str(&content).map_err(|e| {
                    DraftlockError::StoreError(format!(
                        "failed to parse lock file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(Some(lock))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DraftlockError::StoreError(format!(
                "failed to read lock file '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Create a lock for a version, attributed to `holder`.
    ///
    /// Fails with `AlreadyLocked` when a lock exists for the version. The
    /// record is written to a temp file and hard-linked to the lock path;
    /// the link fails if a lock file exists, so the check and the insert are
    /// one atomic operation and two concurrent creates cannot both succeed.
    pub fn create(&self, version_id: &str, holder: &str) -> Result<VersionLock> {
        validate_version_id(version_id)?;
        let path = self.lock_path(version_id);

        if !self.locks_dir.exists() {
            fs::create_dir_all(&self.locks_dir).map_err(|e| {
                DraftlockError::StoreError(format!(
                    "failed to create locks directory '{}': {}",
                    self.locks_dir.display(),
                    e
                ))
            })?;
        }

        let lock = VersionLock::new(version_id, holder);
        let json = lock.to_json()?;

        let temp_path = self.locks_dir.join(format!(
            ".{}.{}-{}.tmp",
            version_id,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let mut file = File::create(&temp_path).map_err(|e| {
            DraftlockError::StoreError(format!(
                "failed to create temp lock file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                let _ = fs::remove_file(&temp_path);
                DraftlockError::StoreError(format!("failed to write lock record: {}", e))
            })?;
        drop(file);

        let linked = fs::hard_link(&temp_path, &path);
        let _ = fs::remove_file(&temp_path);

        match linked {
            Ok(()) => Ok(lock),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let existing_holder = VersionLock::from_file(&path)
                    .map(|l| l.created_by)
                    .unwrap_or_else(|_| "unknown".to_string());
                Err(DraftlockError::AlreadyLocked {
                    version: version_id.to_string(),
                    holder: existing_holder,
                })
            }
            Err(e) => Err(DraftlockError::StoreError(format!(
                "failed to create lock file '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Delete the lock for a version.
    ///
    /// Idempotent: returns the number of locks removed (0 or 1); removing a
    /// non-existent lock is not an error.
    pub fn delete(&self, version_id: &str) -> Result<usize> {
        validate_version_id(version_id)?;
        let path = self.lock_path(version_id);

        match fs::remove_file(&path) {
            Ok(()) => Ok(1),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(DraftlockError::StoreError(format!(
                "failed to delete lock file '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// List all active locks, sorted by version id.
    pub fn list(&self) -> Result<Vec<VersionLock>> {
        let mut locks = Vec::new();

        if !self.locks_dir.exists() {
            return Ok(locks);
        }

        let entries = fs::read_dir(&self.locks_dir).map_err(|e| {
            DraftlockError::StoreError(format!(
                "failed to read locks directory '{}': {}",
                self.locks_dir.display(),
                e
            ))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                DraftlockError::StoreError(format!("failed to read locks directory entry: {}", e))
            })?;

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("lock") {
                continue;
            }

            locks.push(VersionLock::from_file(&path)?);
        }

        locks.sort_by(|a, b| a.version.cmp(&b.version));

        Ok(locks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, LockStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = LockStore::new(temp_dir.path().join("locks"));
        (temp_dir, store)
    }

    #[test]
    fn test_get_absent_lock_is_none() {
        let (_temp_dir, store) = test_store();

        assert!(store.get("v1").unwrap().is_none());
    }

    #[test]
    fn test_create_and_get() {
        let (_temp_dir, store) = test_store();

        let created = store.create("v1", "alice").unwrap();
        assert_eq!(created.version, "v1");
        assert_eq!(created.created_by, "alice");
        assert!(created.age().num_minutes() < 1);

        let fetched = store.get("v1").unwrap().unwrap();
        assert_eq!(fetched.created_by, "alice");
        assert_eq!(fetched.created, created.created);
    }

    #[test]
    fn test_create_conflict_reports_existing_holder() {
        let (_temp_dir, store) = test_store();

        store.create("v1", "alice").unwrap();
        let err = store.create("v1", "bob").unwrap_err();

        match err {
            DraftlockError::AlreadyLocked { version, holder } => {
                assert_eq!(version, "v1");
                assert_eq!(holder, "alice");
            }
            other => panic!("expected AlreadyLocked, got {:?}", other),
        }

        // The original lock is untouched
        assert_eq!(store.get("v1").unwrap().unwrap().created_by, "alice");
    }

    #[test]
    fn test_concurrent_creates_have_exactly_one_winner() {
        let (_temp_dir, store) = test_store();

        let handles: Vec<_> = ["alice", "bob", "carol", "dave"]
            .into_iter()
            .map(|holder| {
                let store = store.clone();
                std::thread::spawn(move || store.create("v1", holder))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
        assert_eq!(winners.len(), 1);
        for result in &results {
            if let Err(e) = result {
                assert!(matches!(e, DraftlockError::AlreadyLocked { .. }));
            }
        }

        // The store holds exactly the winner's record, fully written
        let locks = store.list().unwrap();
        assert_eq!(locks.len(), 1);
        assert_eq!(
            locks[0].created_by,
            winners[0].as_ref().unwrap().created_by
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_temp_dir, store) = test_store();

        store.create("v1", "alice").unwrap();
        assert_eq!(store.delete("v1").unwrap(), 1);
        assert_eq!(store.delete("v1").unwrap(), 0);
        assert!(store.get("v1").unwrap().is_none());
    }

    #[test]
    fn test_delete_without_store_dir() {
        let (_temp_dir, store) = test_store();

        // Locks dir was never created; delete still reports zero removed
        assert_eq!(store.delete("v1").unwrap(), 0);
    }

    #[test]
    fn test_list_empty_store() {
        let (_temp_dir, store) = test_store();

        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_is_sorted_by_version() {
        let (_temp_dir, store) = test_store();

        store.create("v3", "carol").unwrap();
        store.create("v1", "alice").unwrap();
        store.create("v2", "bob").unwrap();

        let versions: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|l| l.version)
            .collect();
        assert_eq!(versions, vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let (_temp_dir, store) = test_store();

        store.create("v1", "alice").unwrap();
        fs::write(store.locks_dir.join("notes.txt"), "not a lock").unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_lock_file_is_a_store_error() {
        let (_temp_dir, store) = test_store();

        store.create("v1", "alice").unwrap();
        fs::write(store.lock_path("v1"), "{ not json").unwrap();

        let err = store.get("v1").unwrap_err();
        assert!(matches!(err, DraftlockError::StoreError(_)));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_invalid_version_ids_are_rejected() {
        let (_temp_dir, store) = test_store();

        assert!(store.create("../escape", "alice").is_err());
        assert!(store.get("a/b").is_err());
        assert!(store.delete("..").is_err());
    }

    #[test]
    fn test_lock_display_names_holder() {
        let (_temp_dir, store) = test_store();

        let lock = store.create("v1", "alice").unwrap();
        let display = format!("{}", lock);
        assert!(display.contains("v1"));
        assert!(display.contains("alice"));
    }

    #[test]
    fn test_age_string_formats() {
        let mut lock = VersionLock::new("v1", "alice");
        assert!(lock.age_string().contains('m'));

        lock.created = Utc::now() - Duration::hours(2);
        assert!(lock.age_string().contains('h'));

        lock.created = Utc::now() - Duration::days(3);
        assert!(lock.age_string().contains('d'));
    }
}
