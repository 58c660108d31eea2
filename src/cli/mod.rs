//! cli
//!
//! Command-line interface layer for Stageshell.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and install logging
//! - Build the command registry and hand lines to the session driver
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and hands command
//! lines to [`driver::Driver`], which runs them through the
//! [`crate::engine`] dispatcher. Session state never leaves the driver.

pub mod args;
pub mod commands;
pub mod driver;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::output::{self, Verbosity};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "STAGESHELL_LOG";

/// Settings shared by every subcommand.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub verbosity: Verbosity,
}

/// Install the tracing subscriber.
///
/// The filter comes from `STAGESHELL_LOG`; without it, `debug` is used with
/// `--debug` and `warn` otherwise. Logs go to stderr.
pub fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    // A second init (tests driving `run` in-process) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Returns the process
/// exit code; errors are startup failures (config, registry, I/O).
pub fn run(cli: Cli) -> Result<i32> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let loaded = Config::load(Some(&cwd), cli.config.as_deref()).context("Failed to load config")?;

    let verbosity = Verbosity::from_flags(cli.quiet || loaded.config.quiet(), cli.debug);
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }

    let ctx = Context {
        config: loaded.config,
        verbosity,
    };
    commands::dispatch(cli.command.unwrap_or(args::Command::Shell), &ctx)
}
