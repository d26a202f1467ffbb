// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - applying the enable gate before a trigger reaches the core
//! - spawning and cancelling run tasks
//! - handling Ctrl+C / shutdown
//!
//! At most one run is active at any time; overlapping triggers are handled by
//! the [`TriggerQueue`].

use tracing::{debug, info};

use crate::engine::queue::TriggerQueue;
use crate::engine::{RuntimeEvent, RuntimeOptions};
use crate::exec::{RunId, RunReport};
use crate::types::TriggerWhileRunningBehaviour;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Spawn a new run with this id.
    StartRun(RunId),
    /// Interrupt the run with this id at its next wait point.
    CancelRun(RunId),
    /// Request that the process exits (used for `--once` when idle).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    queue: TriggerQueue,
    options: RuntimeOptions,
    run_counter: RunId,
    active_run: Option<RunId>,
    cancel_requested: bool,
}

impl CoreRuntime {
    pub fn new(
        behaviour: TriggerWhileRunningBehaviour,
        queue_length: usize,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            queue: TriggerQueue::new(behaviour, queue_length),
            options,
            run_counter: 0,
            active_run: None,
            cancel_requested: false,
        }
    }

    /// Returns `true` if no run is active.
    pub fn is_idle(&self) -> bool {
        self.active_run.is_none()
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.active_run
    }

    /// Expose queue emptiness (for tests).
    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    ///
    /// `Triggered` events must already have passed the enable gate.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::Triggered { .. } => self.handle_trigger(),
            RuntimeEvent::RunFinished { report } => self.handle_run_finished(&report),
            RuntimeEvent::ShutdownRequested => self.handle_shutdown(),
        }
    }

    /// Called by the shell when a trigger was rejected by the enable gate.
    ///
    /// Nothing changes, but in `exit_when_idle` mode an idle runtime has
    /// nothing left to wait for.
    pub fn trigger_suppressed(&mut self) -> CoreStep {
        self.exit_if_idle(Vec::new())
    }

    fn handle_trigger(&mut self) -> CoreStep {
        let Some(active) = self.active_run else {
            return CoreStep::running(vec![self.start_run()]);
        };

        self.queue.record_trigger();

        let mut commands = Vec::new();
        if self.queue.behaviour() == TriggerWhileRunningBehaviour::Cancel
            && !self.cancel_requested
        {
            info!(run_id = active, "trigger while running; cancelling active run");
            self.cancel_requested = true;
            commands.push(CoreCommand::CancelRun(active));
        }

        CoreStep::running(commands)
    }

    fn handle_run_finished(&mut self, report: &RunReport) -> CoreStep {
        if self.active_run != Some(report.run_id) {
            debug!(run_id = report.run_id, "ignoring completion of stale run");
            return CoreStep::running(Vec::new());
        }

        self.active_run = None;
        self.cancel_requested = false;
        debug!(
            run_id = report.run_id,
            outcome = ?report.outcome,
            pending = self.queue.len(),
            "run finished"
        );

        let mut commands = Vec::new();
        if self.queue.take_next() {
            commands.push(self.start_run());
        }

        self.exit_if_idle(commands)
    }

    fn handle_shutdown(&mut self) -> CoreStep {
        self.queue.clear();

        let mut commands = Vec::new();
        if let Some(active) = self.active_run {
            self.cancel_requested = true;
            commands.push(CoreCommand::CancelRun(active));
        }

        CoreStep {
            commands,
            keep_running: false,
        }
    }

    fn start_run(&mut self) -> CoreCommand {
        self.run_counter += 1;
        let run_id = self.run_counter;
        self.active_run = Some(run_id);
        CoreCommand::StartRun(run_id)
    }

    /// In `--once` mode, we can exit when no run is active and there are no
    /// pending triggers in the queue.
    fn exit_if_idle(&mut self, mut commands: Vec<CoreCommand>) -> CoreStep {
        if self.options.exit_when_idle && self.is_idle() && self.queue.is_empty() {
            commands.push(CoreCommand::RequestExit);
            return CoreStep {
                commands,
                keep_running: false,
            };
        }
        CoreStep::running(commands)
    }
}
