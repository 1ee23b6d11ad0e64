//! Error types for draftlock.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//!
//! Absence of a lock is never an error: store and engine queries report it as
//! `None` (or a removal count of 0). The variants below cover the conditions
//! that do surface to callers, each mapped to a distinct exit code.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for draftlock operations.
#[derive(Error, Debug)]
pub enum DraftlockError {
    /// User provided invalid arguments or the state directory is missing/invalid.
    #[error("{0}")]
    UserError(String),

    /// The requested operation does not apply to the target's current state
    /// (e.g. unlocking a version that holds no lock). Distinct from a
    /// permission denial.
    #[error("{0}")]
    NotApplicable(String),

    /// The caller lacks the authorization the operation requires.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A lock already exists for the version (store-level uniqueness
    /// violation). `acquire` recovers from this internally; it surfaces only
    /// through direct `LockStore::create` calls.
    #[error("version '{version}' is already locked by {holder}")]
    AlreadyLocked { version: String, holder: String },

    /// An action was denied because the relevant lock is held by another user.
    #[error("Action denied: version '{version}' is locked by {holder}")]
    LockedByOther { version: String, holder: String },

    /// Lock store, event log, or outbox I/O failed.
    #[error("Store operation failed: {0}")]
    StoreError(String),
}

impl DraftlockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DraftlockError::UserError(_) => exit_codes::USER_ERROR,
            DraftlockError::NotApplicable(_) => exit_codes::USER_ERROR,
            DraftlockError::PermissionDenied(_) => exit_codes::FORBIDDEN,
            DraftlockError::StoreError(_) => exit_codes::STORE_FAILURE,
            DraftlockError::AlreadyLocked { .. } => exit_codes::LOCK_CONFLICT,
            DraftlockError::LockedByOther { .. } => exit_codes::LOCK_CONFLICT,
        }
    }

    /// The user holding the lock that caused this error, if any.
    ///
    /// Callers rendering a denial message use this to name the current holder.
    pub fn holder(&self) -> Option<&str> {
        match self {
            DraftlockError::AlreadyLocked { holder, .. } => Some(holder),
            DraftlockError::LockedByOther { holder, .. } => Some(holder),
            _ => None,
        }
    }
}

/// Result type alias for draftlock operations.
pub type Result<T> = std::result::Result<T, DraftlockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = DraftlockError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn not_applicable_has_user_error_exit_code() {
        let err = DraftlockError::NotApplicable("no lock held".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn permission_denied_has_forbidden_exit_code() {
        let err = DraftlockError::PermissionDenied("missing release authority".to_string());
        assert_eq!(err.exit_code(), exit_codes::FORBIDDEN);
    }

    #[test]
    fn store_error_has_correct_exit_code() {
        let err = DraftlockError::StoreError("disk full".to_string());
        assert_eq!(err.exit_code(), exit_codes::STORE_FAILURE);
    }

    #[test]
    fn lock_errors_have_conflict_exit_code() {
        let err = DraftlockError::AlreadyLocked {
            version: "v1".to_string(),
            holder: "alice".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::LOCK_CONFLICT);

        let err = DraftlockError::LockedByOther {
            version: "v1".to_string(),
            holder: "alice".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::LOCK_CONFLICT);
    }

    #[test]
    fn denial_errors_expose_the_holder() {
        let err = DraftlockError::LockedByOther {
            version: "v1".to_string(),
            holder: "alice".to_string(),
        };
        assert_eq!(err.holder(), Some("alice"));

        let err = DraftlockError::UserError("whatever".to_string());
        assert_eq!(err.holder(), None);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = DraftlockError::LockedByOther {
            version: "page-7-v3".to_string(),
            holder: "bob".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Action denied: version 'page-7-v3' is locked by bob"
        );
    }
}
