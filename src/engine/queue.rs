// src/engine/queue.rs

use tracing::{debug, warn};

use crate::types::TriggerWhileRunningBehaviour;

/// Triggers that arrive while a run is already executing.
///
/// Each pending entry stands for one future run. Runs carry no payload, so
/// the queue only needs to count them.
///
/// - `Queue`: every trigger adds one pending run, up to `max_runs`; triggers
///   beyond that are dropped.
/// - `Cancel`: the pending count is reset to exactly one. The runtime core is
///   responsible for cancelling the active run.
#[derive(Debug)]
pub struct TriggerQueue {
    behaviour: TriggerWhileRunningBehaviour,
    max_runs: usize,
    pending: usize,
}

impl TriggerQueue {
    /// Create a new queue with the given behaviour and maximum queued runs.
    ///
    /// `max_runs` is clamped to at least 1, as a zero-length queue would make
    /// queuing semantics meaningless.
    pub fn new(behaviour: TriggerWhileRunningBehaviour, max_runs: usize) -> Self {
        Self {
            behaviour,
            max_runs: max_runs.max(1),
            pending: 0,
        }
    }

    /// Returns true if there are no queued triggers.
    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    pub fn len(&self) -> usize {
        self.pending
    }

    pub fn behaviour(&self) -> TriggerWhileRunningBehaviour {
        self.behaviour
    }

    /// Record that a trigger fired while a run is in progress.
    pub fn record_trigger(&mut self) {
        match self.behaviour {
            TriggerWhileRunningBehaviour::Queue => {
                if self.pending >= self.max_runs {
                    warn!(
                        pending = self.pending,
                        max_runs = self.max_runs,
                        "queue full; dropping trigger"
                    );
                    return;
                }
                self.pending += 1;
                debug!(pending = self.pending, "queued trigger (queue mode)");
            }
            TriggerWhileRunningBehaviour::Cancel => {
                self.pending = 1;
                debug!("reset pending triggers to latest only (cancel mode)");
            }
        }
    }

    /// Take one pending run, if any.
    pub fn take_next(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        debug!(remaining = self.pending, "dequeued pending run");
        true
    }

    /// Forget every pending run.
    pub fn clear(&mut self) {
        self.pending = 0;
    }
}
