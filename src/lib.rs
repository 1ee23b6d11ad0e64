//! Draftlock: file-backed draft locking for content versioning workflows.
//!
//! Only one user at a time may edit a draft version of a content object. The
//! crate keeps a lock store consistent with version lifecycle state, gates
//! versioning actions on lock ownership, and notifies a lock's holder when
//! someone else releases it.
//!
//! The pieces, leaf to root:
//!
//! - [`store`]: one JSON lock record per version, inserted with exclusive
//!   create so at most one lock per version can ever exist
//! - [`engine`]: the only writer of the store; idempotent acquire/release and
//!   the `is_unlocked_for` authorization predicate
//! - [`sync`]: post-save hook keeping lock state a pure function of version
//!   state (draft is locked for its author, everything else is unlocked)
//! - [`guards`]: per-action check registry consulted before archive, discard,
//!   revert, unpublish, edit entry, and admin change permission
//! - [`moderation`]: review-collection traversal that skips subtrees locked
//!   by someone other than the collection author
//! - [`notify`]: unlock notices handed to a pluggable notifier
//!
//! The versioning framework itself stays external; it is represented by the
//! [`version::Version`] value and the [`version::VersionRepository`] trait,
//! and is expected to call [`sync::LockSynchronizer::after_save`] after every
//! committed version save.
//!
//! The `draftlock` binary wraps the same modules in an admin CLI: `init`,
//! `status`, `show`, and the explicitly-mutating `unlock`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod guards;
pub mod moderation;
pub mod notify;
pub mod store;
pub mod sync;
pub mod version;

#[cfg(test)]
mod test_support;
