//! Unlock notifications for draftlock.
//!
//! When someone releases a lock held by another user, the prior holder is
//! told who took their lock away. Delivery transport is external to this
//! crate; the core produces [`UnlockNotice`] records and hands them to a
//! [`Notifier`]. The bundled [`OutboxNotifier`] appends notices to an NDJSON
//! outbox file for an external mailer to drain.
//!
//! No notice is produced when the unlocking user is the holder: releasing
//! your own lock is not news.

use crate::error::{DraftlockError, Result};
use crate::store::VersionLock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// A pending "your lock was removed" notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockNotice {
    /// The version whose lock was removed.
    pub version: String,

    /// The prior lock holder, who receives the notice.
    pub recipient: String,

    /// The user who removed the lock.
    pub unlocked_by: String,

    /// When the lock was removed.
    pub ts: DateTime<Utc>,
}

impl UnlockNotice {
    /// Build the notice for a removed lock, unless the remover held it.
    ///
    /// The remover may be identified by a full `user@HOST` actor string while
    /// the lock records a bare user name; the bare user part also counts as
    /// the holder.
    pub fn for_removed_lock(lock: &VersionLock, unlocked_by: &str) -> Option<Self> {
        let remover_user = unlocked_by.split('@').next().unwrap_or(unlocked_by);
        if lock.created_by == unlocked_by || lock.created_by == remover_user {
            return None;
        }
        Some(Self {
            version: lock.version.clone(),
            recipient: lock.created_by.clone(),
            unlocked_by: unlocked_by.to_string(),
            ts: Utc::now(),
        })
    }

    /// Subject line for the rendered message.
    pub fn subject(&self, site_name: &str) -> String {
        format!("[{}] {} - Unlocked", site_name, self.version)
    }

    /// Body of the rendered message.
    pub fn body(&self) -> String {
        format!(
            "The lock you held on version '{}' has been removed by {}.\n\
             The version is open for editing again; entering edit mode will\n\
             claim it for the next editor.\n",
            self.version, self.unlocked_by
        )
    }
}

/// Delivery seam for unlock notices.
pub trait Notifier {
    fn notify_unlocked(&self, notice: &UnlockNotice) -> Result<()>;
}

/// Appends notices to an NDJSON outbox file.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    path: PathBuf,
}

impl OutboxNotifier {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Notifier for OutboxNotifier {
    fn notify_unlocked(&self, notice: &UnlockNotice) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                DraftlockError::StoreError(format!(
                    "failed to create outbox directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let line = serde_json::to_string(notice).map_err(|e| {
            DraftlockError::StoreError(format!("failed to serialize unlock notice: {}", e))
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                DraftlockError::StoreError(format!(
                    "failed to open outbox '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", line).map_err(|e| {
            DraftlockError::StoreError(format!(
                "failed to append to outbox '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}
