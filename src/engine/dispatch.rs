//! engine::dispatch
//!
//! The dispatcher - the single entry point for running a command.
//!
//! # Lifecycle
//!
//! ```text
//! Resolve -> Gate -> Parse -> Execute -> Record -> Return
//! ```
//!
//! 1. **Resolve**: look up the command by name
//! 2. **Gate**: every prerequisite must have succeeded in this session
//! 3. **Parse**: validate raw tokens against the option schema, then check
//!    required options
//! 4. **Execute**: invoke the bound function with the shared context;
//!    `Err` and panics become a failed result. The process panic hook is
//!    left in place, so a panic is still reported on stderr before the
//!    failed result is returned
//! 5. **Record**: store the outcome in the session
//!
//! # Invariants
//!
//! - Steps 1-3 failing returns a [`DispatchError`] and leaves the session
//!   untouched; the execute function is not invoked
//! - Every completed execution attempt is recorded, success or failure
//! - No retries: a failed command is re-run only when the caller asks

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use super::gate::{gate, pending_prerequisites, GateResult, UnmetDependency};
use super::parse::{parse_args, ParseError};
use super::session::Session;
use crate::core::command::ExecutionResult;
use crate::core::option::OptionValueType;
use crate::core::registry::Shell;

/// Exit code for a failed execution.
pub const EXIT_FAILED: i32 = 1;
/// Exit code for an unknown command name.
pub const EXIT_UNKNOWN_COMMAND: i32 = 2;
/// Exit code for an unrecognized option token.
pub const EXIT_UNKNOWN_OPTION: i32 = 3;
/// Exit code for a missing or ill-typed option value.
pub const EXIT_INVALID_OPTION_VALUE: i32 = 4;
/// Exit code for an absent required option.
pub const EXIT_MISSING_REQUIRED_OPTION: i32 = 5;
/// Exit code for an unsatisfied prerequisite.
pub const EXIT_DEPENDENCY_NOT_SATISFIED: i32 = 6;
/// Exit code for a command with no execute function.
pub const EXIT_NOT_EXECUTABLE: i32 = 7;

/// Dispatch-time errors.
///
/// These are user/session errors: recoverable, and never recorded in the
/// session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("unknown option '{token}' for command '{command}'")]
    UnknownOption { command: String, token: String },

    #[error("invalid value for option '--{option}' of command '{command}': {reason}")]
    InvalidOptionValue {
        command: String,
        option: String,
        reason: String,
    },

    #[error("command '{command}' requires option '--{option}'")]
    MissingRequiredOption { command: String, option: String },

    #[error("command '{command}' requires {} to succeed first", format_unmet(.unmet))]
    DependencyNotSatisfied {
        command: String,
        unmet: Vec<UnmetDependency>,
        /// Transitive prerequisites still to run, in runnable order.
        pending: Vec<String>,
    },

    #[error("command '{0}' has no execute function")]
    NotExecutable(String),
}

fn format_unmet(unmet: &[UnmetDependency]) -> String {
    unmet
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl DispatchError {
    /// Distinct process exit code for scripting.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::UnknownCommand(_) => EXIT_UNKNOWN_COMMAND,
            DispatchError::UnknownOption { .. } => EXIT_UNKNOWN_OPTION,
            DispatchError::InvalidOptionValue { .. } => EXIT_INVALID_OPTION_VALUE,
            DispatchError::MissingRequiredOption { .. } => EXIT_MISSING_REQUIRED_OPTION,
            DispatchError::DependencyNotSatisfied { .. } => EXIT_DEPENDENCY_NOT_SATISFIED,
            DispatchError::NotExecutable(_) => EXIT_NOT_EXECUTABLE,
        }
    }

    /// Names of unmet prerequisites, if this is a dependency error.
    pub fn unmet_dependencies(&self) -> Vec<&str> {
        match self {
            DispatchError::DependencyNotSatisfied { unmet, .. } => {
                unmet.iter().map(|u| u.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl From<ParseError> for DispatchError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnknownOption { command, token } => {
                DispatchError::UnknownOption { command, token }
            }
            ParseError::InvalidValue {
                command,
                option,
                value,
                expected,
            } => DispatchError::InvalidOptionValue {
                command,
                option,
                reason: format!("'{}' is not a valid {}", value, expected),
            },
            ParseError::MissingValue {
                command,
                option,
                expected,
            } => DispatchError::InvalidOptionValue {
                command,
                option,
                reason: missing_value_reason(expected),
            },
            ParseError::MissingRequired { command, option } => {
                DispatchError::MissingRequiredOption { command, option }
            }
        }
    }
}

fn missing_value_reason(expected: OptionValueType) -> String {
    format!("expects a {} value", expected)
}

/// Runs commands of a registry against a session and context.
pub struct Dispatcher<'a, C> {
    shell: &'a Shell<C>,
}

impl<'a, C> Dispatcher<'a, C> {
    pub fn new(shell: &'a Shell<C>) -> Self {
        Self { shell }
    }

    pub fn shell(&self) -> &'a Shell<C> {
        self.shell
    }

    /// Run one command.
    ///
    /// Returns the execution outcome (which may itself be a failure), or a
    /// `DispatchError` if the command could not be started.
    ///
    /// # Example
    ///
    /// ```
    /// use stageshell::core::command::{CommandSpec, ExecutionResult};
    /// use stageshell::core::registry::Shell;
    /// use stageshell::engine::dispatch::{DispatchError, Dispatcher};
    /// use stageshell::engine::session::{CommandStatus, Session};
    ///
    /// let mut shell: Shell<u32> = Shell::new();
    /// let build = shell.register(CommandSpec::new("build_fabric", ""), |n: &mut u32, _| {
    ///     *n += 1;
    ///     Ok(ExecutionResult::success())
    /// }).unwrap();
    /// shell.register(
    ///     CommandSpec::new("write_fabric_verilog", "").depends_on("build_fabric"),
    ///     |_, _| Ok(ExecutionResult::success()),
    /// ).unwrap();
    ///
    /// let dispatcher = Dispatcher::new(&shell);
    /// let mut session = Session::new();
    /// let mut builds = 0u32;
    ///
    /// let err = dispatcher
    ///     .execute(&mut session, "write_fabric_verilog", &[], &mut builds)
    ///     .unwrap_err();
    /// assert!(matches!(err, DispatchError::DependencyNotSatisfied { .. }));
    ///
    /// dispatcher.execute(&mut session, "build_fabric", &[], &mut builds).unwrap();
    /// assert_eq!(session.status(build), CommandStatus::Succeeded);
    /// assert!(dispatcher
    ///     .execute(&mut session, "write_fabric_verilog", &[], &mut builds)
    ///     .unwrap()
    ///     .is_success());
    /// assert_eq!(builds, 1);
    /// ```
    pub fn execute(
        &self,
        session: &mut Session,
        command_name: &str,
        args: &[String],
        context: &mut C,
    ) -> Result<ExecutionResult, DispatchError> {
        let span = tracing::info_span!("dispatch", command = command_name);
        let _enter = span.enter();

        // Step 1: Resolve
        let command = self
            .shell
            .command_by_name(command_name)
            .ok_or_else(|| DispatchError::UnknownCommand(command_name.to_string()))?;

        // Step 2: Gate
        if let GateResult::Blocked(unmet) = gate(self.shell, command, session) {
            tracing::debug!(unmet = %format_unmet(&unmet), "dependencies not satisfied");
            return Err(DispatchError::DependencyNotSatisfied {
                command: command_name.to_string(),
                unmet,
                pending: pending_prerequisites(self.shell, command.id(), session),
            });
        }

        // Step 3: Parse
        let parsed = parse_args(command_name, command.options(), args)?;
        tracing::debug!(options = parsed.len(), "options validated");

        let execute = command
            .execute
            .as_ref()
            .ok_or_else(|| DispatchError::NotExecutable(command_name.to_string()))?;

        // Step 4: Execute
        let result = match panic::catch_unwind(AssertUnwindSafe(|| execute(context, &parsed))) {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => ExecutionResult::failed(format!("{:#}", err)),
            Err(payload) => ExecutionResult::failed(format!(
                "execute function panicked: {}",
                panic_message(payload.as_ref())
            )),
        };

        // Step 5: Record
        session.record(command.id(), command_name, &result);
        if result.is_success() {
            tracing::info!("command succeeded");
        } else {
            tracing::warn!(detail = result.detail.as_deref().unwrap_or(""), "command failed");
        }

        Ok(result)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
