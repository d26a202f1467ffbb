// src/exec/cancel.rs

//! Cancellation signal for an in-flight run.
//!
//! A run owns a [`CancelSignal`]; the runtime keeps the matching
//! [`CancelHandle`]. Dropping the handle counts as cancellation, so a run can
//! never outlive the component that started it.

use std::time::Duration;

use tokio::sync::watch;

/// Create a connected handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// How a cancellable wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once cancellation has been requested or the handle dropped.
    pub async fn cancelled(&mut self) {
        // Err means the handle is gone, which is treated the same way.
        let _ = self.rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// The duration is fixed when the wait begins.
    pub async fn sleep(&mut self, duration: Duration) -> WaitOutcome {
        tokio::select! {
            biased;
            _ = self.cancelled() => WaitOutcome::Cancelled,
            _ = tokio::time::sleep(duration) => WaitOutcome::Elapsed,
        }
    }
}
