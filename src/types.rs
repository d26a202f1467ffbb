use serde::Deserialize;

/// Behaviour when a new trigger arrives while a sequence run is in progress.
///
/// - `Queue`: remember the trigger and start another run when the current one
///   finishes (default behaviour). At most `queue_length` runs are remembered.
/// - `Cancel`: abandon the active run at its next wait point and start a
///   single fresh run once it has stopped.
///
/// Runs are never executed concurrently in either mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerWhileRunningBehaviour {
    #[default]
    Queue,
    Cancel,
}

/// Where a trigger came from. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Fired once at startup (`--once`).
    Startup,
    /// Typed on the stdin console or fired through the `Detect` action.
    Console,
    /// Delivered by an embedding detection component.
    Detection,
}
