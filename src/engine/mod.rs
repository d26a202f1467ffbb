// src/engine/mod.rs

//! Orchestration engine for trigseq.
//!
//! This module ties together:
//! - the trigger queue (what happens when triggers arrive while a run is active)
//! - the main runtime event loop that reacts to:
//!   - detection triggers
//!   - run completion / cancellation
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`](self::core); the async/IO shell is
//! implemented in [`runtime`].

use crate::exec::RunReport;
pub use crate::types::TriggerReason;

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, exit the runtime once no run is active and no trigger is
    /// queued (used for `--once`).
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from the trigger source, run tasks and
/// signal handlers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The watched device activity was detected.
    Triggered { reason: TriggerReason },
    /// A run task stopped, either after its last slot or on cancellation.
    RunFinished { report: RunReport },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod queue;
pub mod runtime;

pub use self::core::{CoreCommand, CoreRuntime, CoreStep};
pub use queue::TriggerQueue;
pub use crate::types::TriggerWhileRunningBehaviour;
pub use runtime::Runtime;
