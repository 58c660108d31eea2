//! engine::session
//!
//! Per-session execution state.
//!
//! # Invariants
//!
//! - A session is an explicit value; independent sessions never share status
//! - Only the dispatcher records outcomes, and only after an execution
//!   attempt completes; validation failures leave the session untouched
//! - Re-running a command overwrites its own status only; dependents that
//!   already ran are not invalidated
//! - The attempt history is append-only

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::command::{ExecutionResult, ExecutionStatus};
use crate::core::types::CommandId;

/// Last known outcome of a command in this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    NotRun,
    Succeeded,
    Failed,
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CommandStatus::NotRun => "not run",
            CommandStatus::Succeeded => "succeeded",
            CommandStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

impl From<ExecutionStatus> for CommandStatus {
    fn from(status: ExecutionStatus) -> Self {
        match status {
            ExecutionStatus::Succeeded => CommandStatus::Succeeded,
            ExecutionStatus::Failed => CommandStatus::Failed,
        }
    }
}

/// One recorded execution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub command: CommandId,
    pub name: String,
    pub status: ExecutionStatus,
    pub detail: Option<String>,
    pub at: DateTime<Utc>,
}

/// Execution state of one shell session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    executed: HashMap<CommandId, CommandStatus>,
    history: Vec<Attempt>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start a fresh session in which every command is `NotRun`.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            executed: HashMap::new(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Last outcome of a command.
    pub fn status(&self, command: CommandId) -> CommandStatus {
        self.executed
            .get(&command)
            .copied()
            .unwrap_or(CommandStatus::NotRun)
    }

    pub fn has_succeeded(&self, command: CommandId) -> bool {
        self.status(command) == CommandStatus::Succeeded
    }

    /// Every recorded attempt, oldest first.
    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    /// Number of attempts recorded for a command.
    pub fn attempts(&self, command: CommandId) -> usize {
        self.history.iter().filter(|a| a.command == command).count()
    }

    /// Record the outcome of an execution attempt.
    pub(crate) fn record(&mut self, command: CommandId, name: &str, result: &ExecutionResult) {
        self.executed.insert(command, result.status.into());
        self.history.push(Attempt {
            command,
            name: name.to_string(),
            status: result.status,
            detail: result.detail.clone(),
            at: Utc::now(),
        });
    }
}
