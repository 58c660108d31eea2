//! engine::gate
//!
//! Dependency gating for command execution.
//!
//! # Architecture
//!
//! Before a command runs, every direct prerequisite must have a recorded
//! `Succeeded` outcome in the current session. Ordering is enforced by
//! session history: the gate never runs prerequisites on the caller's
//! behalf.
//!
//! # Invariants
//!
//! - Gating never reports `Ready` while a prerequisite is `NotRun` or `Failed`
//! - Gating is deterministic given the same registry and session
//! - Gating reads the session and never mutates it

use serde::Serialize;

use super::session::{CommandStatus, Session};
use crate::core::command::CommandDescriptor;
use crate::core::registry::Shell;
use crate::core::types::CommandId;

/// A prerequisite that has not succeeded yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmetDependency {
    pub id: CommandId,
    pub name: String,
    pub status: CommandStatus,
}

impl std::fmt::Display for UnmetDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' ({})", self.name, self.status)
    }
}

/// Result of gating one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// All prerequisites succeeded.
    Ready,
    /// Prerequisites that block execution, in declaration order.
    Blocked(Vec<UnmetDependency>),
}

impl GateResult {
    pub fn is_ready(&self) -> bool {
        matches!(self, GateResult::Ready)
    }
}

/// Check a command's prerequisites against the session.
pub fn gate<C>(shell: &Shell<C>, command: &CommandDescriptor<C>, session: &Session) -> GateResult {
    let unmet: Vec<UnmetDependency> = command
        .dependencies()
        .iter()
        .filter_map(|&dep| {
            let status = session.status(dep);
            (status != CommandStatus::Succeeded).then(|| UnmetDependency {
                id: dep,
                name: shell.name_of(dep),
                status,
            })
        })
        .collect();

    if unmet.is_empty() {
        GateResult::Ready
    } else {
        GateResult::Blocked(unmet)
    }
}

/// Prerequisites still to run, transitively, in runnable order.
///
/// Used to tell the user what to run next when a command is blocked.
pub fn pending_prerequisites<C>(shell: &Shell<C>, command: CommandId, session: &Session) -> Vec<String> {
    shell
        .prerequisite_order(command)
        .into_iter()
        .filter(|&dep| !session.has_succeeded(dep))
        .map(|dep| shell.name_of(dep))
        .collect()
}
