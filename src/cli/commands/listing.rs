//! commands / help commands - Describe the registry

use super::registry;
use crate::engine::dispatch::EXIT_UNKNOWN_COMMAND;
use crate::ui::help::{render_command_help, render_command_list};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// List commands grouped by class, or dump the schema as JSON.
pub fn list_commands(json: bool) -> Result<i32> {
    let shell = registry()?;
    if json {
        let schema = serde_json::to_string_pretty(&shell.schema()).context("Failed to serialize schema")?;
        println!("{}", schema);
    } else {
        print!("{}", render_command_list(&shell));
    }
    Ok(0)
}

/// Show one command's usage and options.
pub fn command_help(name: &str) -> Result<i32> {
    let shell = registry()?;
    match render_command_help(&shell, name) {
        Some(help) => {
            print!("{}", help);
            Ok(0)
        }
        None => {
            output::error(format!("unknown command '{}'", name));
            Ok(EXIT_UNKNOWN_COMMAND)
        }
    }
}
