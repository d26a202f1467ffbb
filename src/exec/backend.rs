// src/exec/backend.rs

//! Pluggable command executor abstraction.
//!
//! The sequencer talks to a `CommandExecutor` instead of spawning processes
//! itself. Production code uses [`ShellExecutor`](super::ShellExecutor);
//! tests provide an executor that records the commands it was given.

use std::future::Future;
use std::pin::Pin;

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    Failed { diagnostic: String },
}

impl CommandOutcome {
    pub fn failed(diagnostic: impl Into<String>) -> Self {
        CommandOutcome::Failed {
            diagnostic: diagnostic.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success)
    }
}

/// Trait abstracting how a single command string is executed.
///
/// The returned future is awaited to completion before the sequencer moves
/// on, so from the sequencer's point of view execution is synchronous.
/// Implementations report problems through [`CommandOutcome::Failed`]; they
/// never abort the run.
pub trait CommandExecutor: Send + Sync + 'static {
    fn execute<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>>;
}
