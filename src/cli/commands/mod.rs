//! cli::commands
//!
//! Subcommand handlers.
//!
//! # Architecture
//!
//! Each handler:
//! 1. Builds what it needs (registry, driver, output streams)
//! 2. Runs it
//! 3. Returns the process exit code
//!
//! Handlers never call the dispatcher directly; command lines go through
//! [`crate::cli::driver::Driver`].

mod completion;
mod config_cmd;
mod listing;
mod session_cmd;

pub use completion::completion;
pub use config_cmd::show as config_show;
pub use listing::{command_help, list_commands};
pub use session_cmd::{exec, run_script, shell};

use anyhow::{Context as _, Result};

use crate::cli::args::Command;
use crate::cli::Context;
use crate::core::registry::Shell;
use crate::fabric::{self, FabricContext};

/// Dispatch a subcommand to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<i32> {
    match command {
        Command::Shell => session_cmd::shell(ctx),
        Command::Run { script, keep_going } => session_cmd::run_script(ctx, &script, keep_going),
        Command::Exec {
            commands,
            keep_going,
        } => session_cmd::exec(ctx, &commands, keep_going),
        Command::Commands { json } => listing::list_commands(json),
        Command::Help { command } => listing::command_help(&command),
        Command::Config => config_cmd::show(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Build and validate the command registry.
pub(crate) fn registry() -> Result<Shell<FabricContext>> {
    fabric::shell().context("Failed to register commands")
}
