//! Versioning-collaborator contract for draftlock.
//!
//! The versioning framework that owns content lifecycles is external to this
//! crate. This module defines the narrow slice of it the locking layer needs:
//!
//! - `Version`: one historical/editable instance of a content object, carrying
//!   a state, an author, and a content-grouping key
//! - `VersionState`: the lifecycle states, of which only `Draft` is editable
//! - `VersionRepository`: the queries guards and moderation traversal need
//!   ("latest draft in this content grouping", "moderated children")
//! - Version-id validation, since version ids become lock file names

use crate::error::{DraftlockError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Regex pattern for valid version ids.
static VERSION_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("Invalid version id regex"));

/// Maximum accepted version id length.
const VERSION_ID_MAX_LEN: usize = 128;

/// Lifecycle state of a version.
///
/// `Draft` is the sole editable state and the only state in which a lock may
/// exist. Every other state is terminal for locking purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionState {
    Draft,
    Published,
    Unpublished,
    Archived,
    Discarded,
}

impl VersionState {
    /// Whether a version in this state may carry a lock.
    pub fn is_editable(&self) -> bool {
        matches!(self, VersionState::Draft)
    }
}

impl std::fmt::Display for VersionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionState::Draft => write!(f, "draft"),
            VersionState::Published => write!(f, "published"),
            VersionState::Unpublished => write!(f, "unpublished"),
            VersionState::Archived => write!(f, "archived"),
            VersionState::Discarded => write!(f, "discarded"),
        }
    }
}

/// One version of a content object, as seen by the locking layer.
///
/// `content` is the grouping key tying together all versions (across time and
/// states) of one logical piece of content. `created_by` is the author the
/// versioning framework currently records for this version; on copy-on-edit
/// the framework records the copier, which is how a copied draft ends up
/// locked for the user who claimed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    /// Version identity, unique across the system.
    pub id: String,

    /// Content-grouping key.
    pub content: String,

    /// Current lifecycle state.
    pub state: VersionState,

    /// Author currently recorded for this version.
    pub created_by: String,

    /// When this version was created.
    pub created: DateTime<Utc>,
}

impl Version {
    /// Construct a version. Test and fixture convenience; real versions come
    /// from the versioning collaborator.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        state: VersionState,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            state,
            created_by: created_by.into(),
            created: Utc::now(),
        }
    }
}

/// Queries the locking layer needs from the versioning collaborator.
///
/// Guards that protect the draft line (revert, unpublish, edit-redirect)
/// resolve the latest draft in a content grouping; moderation traversal walks
/// a version's moderated children.
pub trait VersionRepository {
    /// The current latest draft in the given content grouping, if one exists.
    fn latest_draft(&self, content: &str) -> Option<Version>;

    /// Moderated child versions of the given version, in moderation order.
    fn moderated_children(&self, version: &Version) -> Vec<Version>;
}

/// Validate a version id before it is used as a lock file name.
///
/// Rejects path traversal outright, then requires the id to match the allowed
/// character set and length bound.
///
/// # Returns
///
/// * `Ok(())` - The id is safe to use
/// * `Err(DraftlockError::UserError)` - If the id is invalid
pub fn validate_version_id(version_id: &str) -> Result<()> {
    if version_id.contains('/') || version_id.contains('\\') || version_id.contains("..") {
        return Err(DraftlockError::UserError(format!(
            "invalid version id '{}': contains path traversal characters",
            version_id
        )));
    }

    if version_id.len() > VERSION_ID_MAX_LEN || !VERSION_ID_REGEX.is_match(version_id) {
        return Err(DraftlockError::UserError(format!(
            "invalid version id '{}': ids must start with an alphanumeric character \
             and contain only alphanumerics, '.', '_', or '-'",
            version_id
        )));
    }

    Ok(())
}
