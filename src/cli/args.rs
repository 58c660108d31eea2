//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug output and logging
//! - `--quiet` / `-q`: Minimal output
//! - `--config <path>`: Use this global config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stageshell - a staged command shell with dependency-gated dispatch
#[derive(Parser, Debug)]
#[command(name = "stageshell")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Enable debug output and logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this config file instead of the default search
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Defaults to an interactive shell
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive session
    #[command(
        name = "shell",
        long_about = "Start an interactive session.\n\n\
            Reads one command per line from standard input. Commands run in a \
            single session, so a command becomes available once the commands it \
            depends on have succeeded. Failures are reported and the session \
            continues.",
        after_help = "\
SESSION BUILTINS:
    help [command]    List commands, or show one command's options
    status            Show which commands have run and how they ended
    history           Show every execution attempt in order
    exit, quit        End the session"
    )]
    Shell,

    /// Run a script of commands in one session
    #[command(
        name = "run",
        long_about = "Run a script of commands in one session.\n\n\
            Each line is one command. Blank lines and lines starting with '#' are \
            ignored. The script stops at the first failing line unless \
            --keep-going is given or continue_on_error is set in the config. The \
            exit code is the code of the first failing line.",
        after_help = "\
EXAMPLES:
    # flow.ss
    read_openfpga_arch -f k6_frac_N10_40nm_openfpga.xml
    link_openfpga_arch
    build_fabric --compress_routing
    write_fabric_verilog --file ./SRC --explicit_port_mapping

    stageshell run flow.ss"
    )]
    Run {
        /// Script file to run
        script: PathBuf,

        /// Keep running after a failing line
        #[arg(long)]
        keep_going: bool,
    },

    /// Run command lines given as arguments
    #[command(
        name = "exec",
        after_help = "\
EXAMPLES:
    stageshell exec 'read_openfpga_arch -f arch.xml' link_openfpga_arch build_fabric"
    )]
    Exec {
        /// One command line per argument
        #[arg(required = true, value_name = "LINE")]
        commands: Vec<String>,

        /// Keep running after a failing line
        #[arg(long)]
        keep_going: bool,
    },

    /// List registered commands grouped by class
    #[command(name = "commands")]
    Commands {
        /// Print the full command schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the options of one command
    #[command(name = "help")]
    Help {
        /// Command name
        command: String,
    },

    /// Print the effective configuration
    #[command(name = "config")]
    Config,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    stageshell completion bash > /etc/bash_completion.d/stageshell

    # Zsh
    stageshell completion zsh > \"${fpath[1]}/_stageshell\""
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
