// src/exec/mod.rs

//! Command execution layer.
//!
//! - [`backend`] defines the `CommandExecutor` boundary the sequencer calls
//!   for every non-empty slot, and the `CommandOutcome` it reports.
//! - [`shell`] is the production executor that runs a command line through
//!   the platform shell.
//! - [`cancel`] provides the cancellation signal used to abandon a run.
//! - [`sequence`] walks the command slots of one run with the configured
//!   pacing.

pub mod backend;
pub mod cancel;
pub mod sequence;
pub mod shell;

pub use backend::{CommandExecutor, CommandOutcome};
pub use cancel::{CancelHandle, CancelSignal, WaitOutcome, cancel_pair};
pub use sequence::{RunId, RunOutcome, RunReport, run_sequence};
pub use shell::ShellExecutor;
