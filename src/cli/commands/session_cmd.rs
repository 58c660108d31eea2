//! shell / run / exec commands - Drive a session

use std::fs;
use std::io;
use std::path::Path;

use super::registry;
use crate::cli::driver::{Driver, ScriptOptions};
use crate::cli::Context;
use crate::fabric::FabricContext;
use crate::ui::output::Output;
use anyhow::{Context as _, Result};

/// Interactive session on stdin.
pub fn shell(ctx: &Context) -> Result<i32> {
    let shell = registry()?;
    let mut driver = Driver::new(&shell, FabricContext::new());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut out = Output::new(&mut stdout, &mut stderr, ctx.verbosity);

    let code = driver.run_interactive(stdin.lock(), ctx.config.prompt(), &mut out)?;
    // End the prompt line on EOF.
    out.print("")?;
    Ok(code)
}

/// Run a script file.
pub fn run_script(ctx: &Context, script: &Path, keep_going: bool) -> Result<i32> {
    let text = fs::read_to_string(script)
        .with_context(|| format!("Failed to read script '{}'", script.display()))?;
    run_lines(ctx, text.lines(), keep_going)
}

/// Run command lines given on the command line.
pub fn exec(ctx: &Context, lines: &[String], keep_going: bool) -> Result<i32> {
    run_lines(ctx, lines, keep_going)
}

fn run_lines<I, S>(ctx: &Context, lines: I, keep_going: bool) -> Result<i32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let shell = registry()?;
    let mut driver = Driver::new(&shell, FabricContext::new());

    let options = ScriptOptions {
        keep_going: keep_going || ctx.config.continue_on_error(),
        echo: ctx.config.echo_commands(),
    };

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut out = Output::new(&mut stdout, &mut stderr, ctx.verbosity);
    let code = driver.run_script(lines, options, &mut out)?;

    tracing::info!(
        session = %driver.session().id(),
        attempts = driver.session().history().len(),
        code,
        "session finished"
    );
    Ok(code)
}
