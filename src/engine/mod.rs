//! engine
//!
//! Orchestrates the dispatch lifecycle: Resolve -> Gate -> Parse -> Execute -> Record.
//!
//! # Architecture
//!
//! The engine runs commands that the [`crate::core::registry::Shell`]
//! describes. It owns no registry state of its own:
//!
//! 1. **Session**: per-session execution outcomes ([`session`])
//! 2. **Gate**: prerequisite satisfaction against the session ([`gate`])
//! 3. **Parse**: raw tokens to typed options ([`parse`])
//! 4. **Dispatch**: the single entry point tying it together ([`dispatch`])
//!
//! # Invariants
//!
//! - Commands execute only after every prerequisite succeeded in the session
//! - The session is mutated only by the dispatcher, after an attempt completes
//! - Validation failures are reported, never recorded
//!
//! # Example
//!
//! ```
//! use stageshell::core::command::{CommandSpec, ExecutionResult};
//! use stageshell::core::registry::Shell;
//! use stageshell::engine::{Dispatcher, Session};
//!
//! let mut shell: Shell<()> = Shell::new();
//! shell.register(CommandSpec::new("hello", "say hello"), |_, _| {
//!     Ok(ExecutionResult::success_with("hello"))
//! }).unwrap();
//!
//! let mut session = Session::new();
//! let result = Dispatcher::new(&shell)
//!     .execute(&mut session, "hello", &[], &mut ())
//!     .unwrap();
//! assert_eq!(result.detail.as_deref(), Some("hello"));
//! ```

pub mod dispatch;
pub mod gate;
pub mod parse;
pub mod session;

// Re-exports for convenience
pub use dispatch::{DispatchError, Dispatcher};
pub use gate::{gate, GateResult, UnmetDependency};
pub use parse::{parse_args, ParseError};
pub use session::{Attempt, CommandStatus, Session};
