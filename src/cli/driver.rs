//! cli::driver
//!
//! Line-oriented session driver shared by the interactive shell, scripts
//! and `exec`.
//!
//! # Lines
//!
//! A line is split with POSIX-like quoting. Blank lines and lines starting
//! with `#` are skipped. The first token names either a builtin or a
//! registered command:
//!
//! | Builtin | Effect |
//! |---------|--------|
//! | `help [command]` | command list, or one command's options |
//! | `status` | session status of every command |
//! | `history` | execution attempts in order |
//! | `exit`, `quit` | end the session |
//!
//! Builtins shadow registered commands of the same name.
//!
//! # Exit codes
//!
//! Every line yields a code: 0 on success, the [`DispatchError`] code on a
//! dispatch error, 1 for a failed execution and [`EXIT_USAGE`] for a line
//! that cannot be tokenized.

use std::io::{self, BufRead};

use crate::core::registry::Shell;
use crate::engine::dispatch::EXIT_UNKNOWN_COMMAND;
use crate::engine::{CommandStatus, DispatchError, Dispatcher, Session};
use crate::ui::help::{render_command_help, render_command_list};
use crate::ui::output::Output;

/// Exit code for malformed input and startup errors.
pub const EXIT_USAGE: i32 = 64;

/// What a single line did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank or comment line
    Skipped,
    /// A builtin or command ran; carries its exit code
    Ran(i32),
    /// `exit` or `quit`
    Exit,
}

impl LineOutcome {
    /// Exit code of the line, 0 if nothing failed.
    pub fn code(&self) -> i32 {
        match self {
            LineOutcome::Ran(code) => *code,
            LineOutcome::Skipped | LineOutcome::Exit => 0,
        }
    }
}

/// Policy for scripted sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptOptions {
    /// Keep running after a failing line
    pub keep_going: bool,
    /// Print each line before running it
    pub echo: bool,
}

/// Runs lines against one registry, session and context.
pub struct Driver<'a, C> {
    dispatcher: Dispatcher<'a, C>,
    session: Session,
    context: C,
}

impl<'a, C> Driver<'a, C> {
    /// Start a fresh session over `shell`.
    pub fn new(shell: &'a Shell<C>, context: C) -> Self {
        let session = Session::new();
        tracing::debug!(session = %session.id(), "session started");
        Self {
            dispatcher: Dispatcher::new(shell),
            session,
            context,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Consume the driver, returning the context.
    pub fn into_context(self) -> C {
        self.context
    }

    /// Run one line.
    pub fn run_line(&mut self, line: &str, out: &mut Output<'_>) -> io::Result<LineOutcome> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(LineOutcome::Skipped);
        }

        let Some(tokens) = shlex::split(line) else {
            out.error(format!("cannot parse line: {}", line))?;
            return Ok(LineOutcome::Ran(EXIT_USAGE));
        };
        let Some((name, args)) = tokens.split_first() else {
            return Ok(LineOutcome::Skipped);
        };

        match name.as_str() {
            "exit" | "quit" => Ok(LineOutcome::Exit),
            "help" => self.help(args, out).map(LineOutcome::Ran),
            "status" => self.status(out).map(|()| LineOutcome::Ran(0)),
            "history" => self.history(out).map(|()| LineOutcome::Ran(0)),
            _ => self.dispatch(name, args, out).map(LineOutcome::Ran),
        }
    }

    /// Run a sequence of lines as a script.
    ///
    /// Stops at the first failing line unless `keep_going` is set. Returns
    /// the exit code of the first failing line, or 0.
    pub fn run_script<I, S>(&mut self, lines: I, options: ScriptOptions, out: &mut Output<'_>) -> io::Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first_failure = 0;
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if options.echo && !line.trim().is_empty() {
                out.print(format!("> {}", line.trim()))?;
            }

            let outcome = self.run_line(line, out)?;
            if outcome == LineOutcome::Exit {
                break;
            }
            let code = outcome.code();
            if code == 0 {
                continue;
            }
            if first_failure == 0 {
                first_failure = code;
            }
            if !options.keep_going {
                out.debug(format!("stopping at line {}", index + 1))?;
                break;
            }
        }
        Ok(first_failure)
    }

    /// Read lines from `input` until end of input or `exit`.
    ///
    /// Failures do not end the session, including lines that are not valid
    /// UTF-8. Returns the exit code of the last line that ran.
    pub fn run_interactive<R: BufRead>(&mut self, mut input: R, prompt: &str, out: &mut Output<'_>) -> io::Result<i32> {
        let mut last = 0;
        let mut buf = Vec::new();
        loop {
            out.prompt(prompt)?;
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let Ok(line) = std::str::from_utf8(&buf) else {
                out.error("line is not valid UTF-8")?;
                last = EXIT_USAGE;
                continue;
            };
            match self.run_line(line, out)? {
                LineOutcome::Exit => break,
                LineOutcome::Skipped => {}
                LineOutcome::Ran(code) => last = code,
            }
        }
        Ok(last)
    }

    fn dispatch(&mut self, name: &str, args: &[String], out: &mut Output<'_>) -> io::Result<i32> {
        match self
            .dispatcher
            .execute(&mut self.session, name, args, &mut self.context)
        {
            Ok(result) => {
                let code = result.exit_code();
                match (result.is_success(), result.detail) {
                    (true, Some(detail)) => out.print(detail)?,
                    (true, None) => out.debug(format!("{} succeeded", name))?,
                    (false, Some(detail)) => out.error(format!("{} failed: {}", name, detail))?,
                    (false, None) => out.error(format!("{} failed", name))?,
                }
                Ok(code)
            }
            Err(err) => {
                out.error(&err)?;
                if let DispatchError::DependencyNotSatisfied { pending, .. } = &err {
                    if !pending.is_empty() {
                        out.print(format!("hint: run {} first", pending.join(", then ")))?;
                    }
                }
                Ok(err.exit_code())
            }
        }
    }

    fn help(&self, args: &[String], out: &mut Output<'_>) -> io::Result<i32> {
        let shell = self.dispatcher.shell();
        match args.first() {
            None => {
                out.always(render_command_list(shell).trim_end())?;
                Ok(0)
            }
            Some(name) => match render_command_help(shell, name) {
                Some(help) => {
                    out.always(help.trim_end())?;
                    Ok(0)
                }
                None => {
                    out.error(DispatchError::UnknownCommand(name.clone()))?;
                    Ok(EXIT_UNKNOWN_COMMAND)
                }
            },
        }
    }

    fn status(&self, out: &mut Output<'_>) -> io::Result<()> {
        let shell = self.dispatcher.shell();
        let width = shell
            .commands()
            .map(|c| c.name().as_str().len())
            .max()
            .unwrap_or(0);
        for cmd in shell.commands() {
            out.always(format!(
                "{:<width$}  {}",
                cmd.name().as_str(),
                self.session.status(cmd.id()),
                width = width
            ))?;
        }
        Ok(())
    }

    fn history(&self, out: &mut Output<'_>) -> io::Result<()> {
        for (index, attempt) in self.session.history().iter().enumerate() {
            let status = CommandStatus::from(attempt.status);
            let line = match &attempt.detail {
                Some(detail) => format!("{:>3}  {}  {}: {}", index + 1, attempt.name, status, detail),
                None => format!("{:>3}  {}  {}", index + 1, attempt.name, status),
            };
            out.always(line)?;
        }
        Ok(())
    }
}
