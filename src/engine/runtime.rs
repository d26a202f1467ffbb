// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::{CancelHandle, CommandExecutor, RunId, RunReport, cancel_pair, run_sequence};
use crate::sequencer::Sequencer;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// Handle for the run task currently in flight.
struct ActiveRun {
    run_id: RunId,
    cancel: CancelHandle,
    handle: JoinHandle<()>,
}

/// Drives the core runtime in response to `RuntimeEvent`s and runs the
/// command sequence through a `CommandExecutor`.
///
/// This is an IO shell around `CoreRuntime`, which decides when runs start
/// and stop. The shell applies the enable gate, spawns each run on its own
/// Tokio task so waits never block event handling, and joins the active run
/// before returning.
pub struct Runtime<E: CommandExecutor> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    /// Weak so that the event channel still closes once every external
    /// sender is gone.
    event_tx: mpsc::WeakSender<RuntimeEvent>,
    sequencer: Sequencer,
    executor: Arc<E>,
    active: Option<ActiveRun>,
    /// Flipped to `true` to abort a command still executing at shutdown.
    force_stop: Option<watch::Receiver<bool>>,
}

impl<E: CommandExecutor> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("sequencer", &self.sequencer)
            .finish_non_exhaustive()
    }
}

impl<E: CommandExecutor> Runtime<E> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        event_tx: &mpsc::Sender<RuntimeEvent>,
        sequencer: Sequencer,
        executor: E,
    ) -> Self {
        Self {
            core,
            event_rx,
            event_tx: event_tx.downgrade(),
            sequencer,
            executor: Arc::new(executor),
            active: None,
            force_stop: None,
        }
    }

    /// Abort the in-flight run task instead of waiting for its current
    /// command once `force_stop` turns `true` during shutdown.
    pub fn with_force_stop(mut self, force_stop: watch::Receiver<bool>) -> Self {
        self.force_stop = Some(force_stop);
        self
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core (start/cancel runs, exit).
    /// - Releases the active run if its task dies without reporting back.
    /// - On exit, cancels and joins any run still in flight.
    pub async fn run(mut self) -> Result<()> {
        info!("trigseq runtime started");

        loop {
            let received = tokio::select! {
                biased;
                received = self.event_rx.recv() => received,
                (run_id, joined) = join_active(&mut self.active) => {
                    self.active = None;
                    match self.run_task_ended(run_id, joined) {
                        Some(event) => Some(event),
                        None => continue,
                    }
                }
            };

            let event = match received {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = match event {
                RuntimeEvent::Triggered { reason } => {
                    if !self.sequencer.begin_trigger() {
                        debug!(?reason, "sequencer disabled; ignoring trigger");
                        self.core.trigger_suppressed()
                    } else {
                        info!(?reason, "trigger accepted");
                        self.core.step(RuntimeEvent::Triggered { reason })
                    }
                }
                RuntimeEvent::RunFinished { report } => {
                    self.reap_finished(&report).await;
                    self.core.step(RuntimeEvent::RunFinished { report })
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested");
                    self.core.step(RuntimeEvent::ShutdownRequested)
                }
            };

            for command in step.commands {
                self.execute_command(command);
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        // Closed first so a cancelled run never blocks reporting completion.
        self.event_rx.close();
        self.shutdown_active_run().await;
        info!("runtime exiting");
        Ok(())
    }

    /// Execute a single command from the core.
    fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::StartRun(run_id) => self.start_run(run_id),
            CoreCommand::CancelRun(run_id) => match &self.active {
                Some(active) if active.run_id == run_id => {
                    info!(run_id, "cancelling active run");
                    active.cancel.cancel();
                }
                _ => debug!(run_id, "cancel requested for a run that is not active"),
            },
            CoreCommand::RequestExit => {
                // keep_running is already false in this case; log only.
                info!("core issued RequestExit command");
            }
        }
    }

    fn start_run(&mut self, run_id: RunId) {
        let (cancel, mut signal) = cancel_pair();
        let sequencer = self.sequencer.clone();
        let executor = Arc::clone(&self.executor);
        let event_tx = self.event_tx.upgrade();

        debug!(run_id, "spawning run task");

        let handle = tokio::spawn(async move {
            let report = run_sequence(run_id, &sequencer, executor.as_ref(), &mut signal).await;
            match event_tx {
                Some(tx) => {
                    if tx.send(RuntimeEvent::RunFinished { report }).await.is_err() {
                        debug!(run_id, "runtime gone before run completion was reported");
                    }
                }
                None => debug!(run_id, "no runtime sender left; completion not reported"),
            }
        });

        self.active = Some(ActiveRun {
            run_id,
            cancel,
            handle,
        });
    }

    /// Called when the active run task ended before its `RunFinished` was
    /// handled. Returns the completion the core still has to see, if any.
    fn run_task_ended(
        &self,
        run_id: RunId,
        joined: std::result::Result<(), JoinError>,
    ) -> Option<RuntimeEvent> {
        match joined {
            // A task that returns normally has already queued its report.
            Ok(()) => None,
            Err(err) => {
                error!(run_id, error = %err, "run task died without reporting back");
                (self.core.active_run() == Some(run_id)).then(|| RuntimeEvent::RunFinished {
                    report: RunReport::aborted(run_id),
                })
            }
        }
    }

    /// Join the task of a run that reported completion.
    async fn reap_finished(&mut self, report: &RunReport) {
        let is_active = self
            .active
            .as_ref()
            .is_some_and(|active| active.run_id == report.run_id);
        if !is_active {
            return;
        }
        if let Some(active) = self.active.take() {
            join_run(active).await;
        }
    }

    /// Cancel the run still in flight, if any, and wait for its task.
    ///
    /// The current command is allowed to finish unless `force_stop` fires
    /// first, in which case the task is aborted.
    async fn shutdown_active_run(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        let run_id = active.run_id;
        info!(run_id, "stopping active run");
        active.cancel.cancel();

        tokio::select! {
            joined = &mut active.handle => {
                if let Err(err) = joined {
                    error!(run_id, error = %err, "run task failed");
                }
            }
            _ = force_stop_requested(&mut self.force_stop) => {
                warn!(run_id, "force stop requested; aborting running command");
                active.handle.abort();
                let _ = active.handle.await;
            }
        }
    }
}

/// Resolves when the active run task ends. Pending forever when idle.
async fn join_active(
    active: &mut Option<ActiveRun>,
) -> (RunId, std::result::Result<(), JoinError>) {
    match active {
        Some(active) => (active.run_id, (&mut active.handle).await),
        None => std::future::pending().await,
    }
}

/// Resolves once `force_stop` is set. Pending forever if there is no
/// receiver or its sender is gone.
async fn force_stop_requested(force_stop: &mut Option<watch::Receiver<bool>>) {
    if let Some(rx) = force_stop {
        if rx.wait_for(|forced| *forced).await.is_ok() {
            return;
        }
    }
    std::future::pending::<()>().await
}

async fn join_run(active: ActiveRun) {
    let run_id = active.run_id;
    if let Err(err) = active.handle.await {
        error!(run_id, error = %err, "run task failed");
    }
}
