//! Command implementations for draftlock.
//!
//! Provides the dispatcher that routes CLI commands to their implementations.

mod init;
mod show;
mod status;
mod unlock;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(),
        Command::Status => status::cmd_status(),
        Command::Show(args) => show::cmd_show(args),
        Command::Unlock(args) => unlock::cmd_unlock(args),
    }
}
