use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use trigseq::exec::{CommandExecutor, CommandOutcome};

/// One command handed to a [`RecordingExecutor`].
#[derive(Debug, Clone)]
pub struct ExecutedCommand {
    pub command: String,
    /// Tokio clock time when execution started (honours paused time).
    pub at: Instant,
}

/// A fake executor that:
/// - records which commands were "run" and when
/// - reports `Failed` for commands registered with [`fail_on`](Self::fail_on)
/// - panics on commands registered with [`panic_on`](Self::panic_on)
/// - optionally takes a fixed time per command
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    executed: Arc<Mutex<Vec<ExecutedCommand>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    panicking: Arc<Mutex<HashSet<String>>>,
    busy_for: Duration,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(self, command: &str) -> Self {
        self.failing.lock().unwrap().insert(command.to_string());
        self
    }

    /// Panic (after recording the call) whenever `command` is executed.
    pub fn panic_on(self, command: &str) -> Self {
        self.panicking.lock().unwrap().insert(command.to_string());
        self
    }

    /// Each command takes `duration` before reporting its outcome.
    pub fn busy_for(mut self, duration: Duration) -> Self {
        self.busy_for = duration;
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.command.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<ExecutedCommand> {
        self.executed.lock().unwrap().clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>> {
        Box::pin(async move {
            {
                let mut guard = self.executed.lock().unwrap();
                guard.push(ExecutedCommand {
                    command: command.to_string(),
                    at: Instant::now(),
                });
            }

            let panics = self.panicking.lock().unwrap().contains(command);
            if panics {
                panic!("{command}: simulated executor panic");
            }

            if !self.busy_for.is_zero() {
                tokio::time::sleep(self.busy_for).await;
            }

            if self.failing.lock().unwrap().contains(command) {
                CommandOutcome::failed(format!("{command}: simulated failure"))
            } else {
                CommandOutcome::Success
            }
        })
    }
}
