//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. Results
//! go to stdout; errors, warnings and debug lines go to stderr.

use std::fmt::Display;
use std::io::{self, Write};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Destination for session output.
///
/// Holds the two streams so that a session can be driven against buffers
/// in tests and against stdout/stderr in the binary.
pub struct Output<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    verbosity: Verbosity,
}

impl<'a> Output<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write, verbosity: Verbosity) -> Self {
        Self { out, err, verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Print a message (respects quiet mode).
    pub fn print(&mut self, message: impl Display) -> io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }

    /// Print a message regardless of verbosity (explicitly requested output).
    pub fn always(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }

    /// Print a debug message (only in debug mode).
    pub fn debug(&mut self, message: impl Display) -> io::Result<()> {
        if self.verbosity == Verbosity::Debug {
            writeln!(self.err, "[debug] {}", message)?;
        }
        Ok(())
    }

    /// Print an error message (always shown).
    pub fn error(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.err, "error: {}", message)
    }

    /// Print a warning message (respects quiet mode).
    pub fn warn(&mut self, message: impl Display) -> io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            writeln!(self.err, "warning: {}", message)?;
        }
        Ok(())
    }

    /// Write a prompt without a trailing newline.
    pub fn prompt(&mut self, prompt: &str) -> io::Result<()> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()
    }
}

/// Print an error message to stderr (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message to stderr (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}
