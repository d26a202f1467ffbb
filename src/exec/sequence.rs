// src/exec/sequence.rs

//! One run of the command sequence.
//!
//! A run walks slots 1..=6 in ascending order. Empty slots are skipped. After
//! each executed command the run waits the configured delay, but only when a
//! later slot still holds a command, so there is never a trailing wait.
//!
//! Slot text is read when the slot is reached and the delay when a wait
//! begins, so configuration changes made during a run apply to the steps
//! that follow. A wait already in progress keeps its original length.

use tracing::{debug, info, warn};

use crate::exec::backend::{CommandExecutor, CommandOutcome};
use crate::exec::cancel::{CancelSignal, WaitOutcome};
use crate::sequencer::Sequencer;

/// Monotonically increasing identifier of a run.
pub type RunId = u64;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every slot was processed.
    Completed,
    /// The run was abandoned before processing every slot.
    Cancelled,
    /// The run task died (the executor panicked). Counts as finished.
    Aborted,
}

/// Summary of a finished run. Only consumed by the runtime and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: RunId,
    /// Commands handed to the executor.
    pub executed: usize,
    /// Commands whose outcome was a failure.
    pub failed: usize,
    pub outcome: RunOutcome,
}

impl RunReport {
    fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            executed: 0,
            failed: 0,
            outcome: RunOutcome::Completed,
        }
    }

    /// Report for a run whose task ended without reporting back.
    pub fn aborted(run_id: RunId) -> Self {
        Self {
            outcome: RunOutcome::Aborted,
            ..Self::new(run_id)
        }
    }
}

/// Execute the non-empty slots of `sequencer` in order.
///
/// Command failures are logged and the run continues with the next slot.
/// Cancellation is checked before every command and interrupts a wait
/// immediately; no further slot is executed afterwards.
pub async fn run_sequence<E>(
    run_id: RunId,
    sequencer: &Sequencer,
    executor: &E,
    cancel: &mut CancelSignal,
) -> RunReport
where
    E: CommandExecutor + ?Sized,
{
    let mut report = RunReport::new(run_id);
    let mut next_slot = 1;

    info!(run_id, "sequence run started");

    loop {
        if cancel.is_cancelled() {
            report.outcome = RunOutcome::Cancelled;
            break;
        }

        let Some((slot, cmd)) = sequencer.next_command_from(next_slot) else {
            break;
        };

        debug!(run_id, slot, cmd = %cmd, "executing command");
        report.executed += 1;
        match executor.execute(&cmd).await {
            CommandOutcome::Success => {
                debug!(run_id, slot, "command succeeded");
            }
            CommandOutcome::Failed { diagnostic } => {
                report.failed += 1;
                warn!(run_id, slot, cmd = %cmd, %diagnostic, "command failed");
            }
        }

        if !sequencer.has_command_after(slot) {
            break;
        }

        let delay = sequencer.delay();
        if !delay.is_zero() {
            debug!(run_id, slot, delay_ms = delay.as_millis() as u64, "waiting before next command");
            if cancel.sleep(delay).await == WaitOutcome::Cancelled {
                report.outcome = RunOutcome::Cancelled;
                break;
            }
        }

        next_slot = slot + 1;
    }

    match report.outcome {
        RunOutcome::Completed => info!(
            run_id,
            executed = report.executed,
            failed = report.failed,
            "sequence run finished"
        ),
        RunOutcome::Cancelled | RunOutcome::Aborted => info!(
            run_id,
            executed = report.executed,
            "sequence run cancelled; remaining slots skipped"
        ),
    }

    report
}
