//! Configuration model for draftlock.
//!
//! Represents `.draftlock/config.yaml`. Parsing is forward-compatible
//! (unknown fields are ignored) and every field has a default, so a missing
//! or partial file behaves sensibly.

use crate::error::{DraftlockError, Result};
use crate::guards::Permissions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a draftlock state directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site name used in notification subjects.
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Users granted the release authority (may remove locks held by
    /// others). Entries match either a full actor string (`user@HOST`) or a
    /// bare user name.
    #[serde(default)]
    pub release_authorities: Vec<String>,

    /// Whether an explicit unlock writes a notice to the outbox.
    #[serde(default = "default_true")]
    pub notify_on_unlock: bool,
}

fn default_site_name() -> String {
    "draftlock".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            release_authorities: Vec::new(),
            notify_on_unlock: default_true(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields are silently ignored for forward compatibility. Call
    /// sites treat a missing file as defaults via `unwrap_or_default`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DraftlockError::UserError(format!(
                "failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            DraftlockError::UserError(format!(
                "failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Serialize the config to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DraftlockError::UserError(format!("failed to serialize config: {}", e)))
    }

    /// Whether the given actor holds the release authority.
    ///
    /// Accepts a full `user@HOST` actor string; an authority entry matches
    /// either the full string or the bare user part.
    pub fn is_release_authority(&self, actor: &str) -> bool {
        let user = actor.split('@').next().unwrap_or(actor);
        self.release_authorities
            .iter()
            .any(|a| a == actor || a == user)
    }

    /// The permission set the given actor holds under this config.
    pub fn permissions_for(&self, actor: &str) -> Permissions {
        Permissions {
            can_release_others_lock: self.is_release_authority(actor),
        }
    }
}
