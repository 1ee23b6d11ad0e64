//! CLI argument parsing for draftlock.
//!
//! Uses clap derive macros for declarative argument definitions. This module
//! defines the command structure; actual implementations are in the
//! `commands` module.

use clap::{Args, Parser, Subcommand};

/// Draftlock: file-backed draft locking for content versioning workflows.
///
/// Lock state lives in a `.draftlock/` directory: one lock file per draft
/// version, an append-only audit log, and a notification outbox.
#[derive(Parser, Debug)]
#[command(name = "draftlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for draftlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the draftlock state directory here.
    ///
    /// Creates `.draftlock/` with the locks directory, event log, outbox,
    /// and a default configuration.
    Init,

    /// Show active locks.
    ///
    /// Lists every held lock with its holder and age.
    Status,

    /// Show the lock on a specific version.
    Show(ShowArgs),

    /// Remove the lock on a version.
    ///
    /// This is the explicit, state-changing release entry point. It requires
    /// the release authority (configured in `release_authorities`), appends
    /// an audit event, and notifies the prior holder via the outbox unless
    /// the actor held the lock themselves.
    Unlock(UnlockArgs),
}

/// Arguments for the `show` command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// The version id to inspect.
    pub version_id: String,
}

/// Arguments for the `unlock` command.
#[derive(Args, Debug)]
pub struct UnlockArgs {
    /// The version id to unlock.
    pub version_id: String,

    /// Who is performing the unlock (defaults to `user@HOST`).
    #[arg(long)]
    pub actor: Option<String>,
}
