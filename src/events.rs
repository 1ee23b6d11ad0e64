//! Audit event logging for draftlock.
//!
//! Every lock mutation is appended to an NDJSON log (one JSON object per
//! line) so lock history survives the locks themselves. The log is
//! append-only; nothing in this crate reads it back except the tests.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: acquired / released / unlocked
//! - `actor`: who performed the mutation (`user@HOST` for CLI actions, the
//!   lock holder for lifecycle acquisitions)
//! - `version`: the affected version id, when applicable
//! - `details`: freeform object with action-specific details

use crate::error::{DraftlockError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Lock mutations that are logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A lock was created for a draft version.
    Acquired,
    /// A lock was removed because its version left the draft state.
    Released,
    /// A lock was removed by an explicitly authorized unlock.
    Unlocked,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Acquired => write!(f, "acquired"),
            EventAction::Released => write!(f, "released"),
            EventAction::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// Who performed the action.
    pub actor: String,

    /// The affected version id, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action and actor.
    pub fn new(action: EventAction, actor: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor.into(),
            version: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the version id for this event.
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version = Some(version_id.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| DraftlockError::StoreError(format!("failed to serialize event: {}", e)))
    }
}

/// Append-only NDJSON event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    /// Open a log backed by the given file path.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Append one event to the log.
    pub fn append(&self, event: &Event) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                DraftlockError::StoreError(format!(
                    "failed to create events directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let line = event.to_ndjson_line()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                DraftlockError::StoreError(format!(
                    "failed to open event log '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", line).map_err(|e| {
            DraftlockError::StoreError(format!(
                "failed to append to event log '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Actor string for mutations performed from the local environment: `user@HOST`.
pub fn local_actor() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_event_serialization() {
        let event = Event::new(EventAction::Acquired, "alice")
            .with_version("v1")
            .with_details(json!({"state": "draft"}));

        let line = event.to_ndjson_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"acquired\""));
        assert!(line.contains("\"v1\""));

        let parsed: Event = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.action, EventAction::Acquired);
        assert_eq!(parsed.actor, "alice");
        assert_eq!(parsed.version, Some("v1".to_string()));
    }

    #[test]
    fn test_version_field_omitted_when_absent() {
        let event = Event::new(EventAction::Unlocked, "admin@host");
        let line = event.to_ndjson_line().unwrap();
        assert!(!line.contains("\"version\""));
    }

    #[test]
    fn test_append_creates_log_and_accumulates() {
        let temp_dir = TempDir::new().unwrap();
        let log = EventLog::new(temp_dir.path().join("events").join("events.ndjson"));

        log.append(&Event::new(EventAction::Acquired, "alice").with_version("v1"))
            .unwrap();
        log.append(&Event::new(EventAction::Released, "alice").with_version("v1"))
            .unwrap();

        let content =
            std::fs::read_to_string(temp_dir.path().join("events").join("events.ndjson")).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("acquired"));
        assert!(lines[1].contains("released"));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(EventAction::Acquired.to_string(), "acquired");
        assert_eq!(EventAction::Released.to_string(), "released");
        assert_eq!(EventAction::Unlocked.to_string(), "unlocked");
    }

    #[test]
    fn test_local_actor_has_user_and_host() {
        let actor = local_actor();
        assert!(actor.contains('@'));
    }
}
