//! Exit code constants for the draftlock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing state dir, not-applicable operation)
//! - 2: Forbidden (missing release authority)
//! - 3: Store failure (lock store, event log, or outbox I/O)
//! - 4: Lock conflict (lock exists / held by another user)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, uninitialized state directory, or an operation
/// that does not apply to the target's current state.
pub const USER_ERROR: i32 = 1;

/// The caller lacks the authorization the operation requires.
pub const FORBIDDEN: i32 = 2;

/// Lock store, event log, or outbox I/O failure.
pub const STORE_FAILURE: i32 = 3;

/// A lock exists where none was expected, or is held by another user.
pub const LOCK_CONFLICT: i32 = 4;
