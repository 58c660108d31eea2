//! config command - Print the effective configuration

use crate::cli::Context;
use anyhow::{Context as _, Result};

/// Print the merged configuration as TOML, preceded by the files it came from.
pub fn show(ctx: &Context) -> Result<i32> {
    let config = &ctx.config;
    let rendered = config
        .effective_toml()
        .context("Failed to render config")?;

    match config.global_path() {
        Some(path) => println!("# global: {}", path.display()),
        None => println!("# global: (none)"),
    }
    match config.project_path() {
        Some(path) => println!("# project: {}", path.display()),
        None => println!("# project: (none)"),
    }
    print!("{}", rendered);
    Ok(0)
}
