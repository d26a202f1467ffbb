// src/sequencer/state.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::debug;

use crate::errors::{Result, TrigseqError};
use crate::sequencer::config::{SLOT_COUNT, SequencerConfig};
use crate::sequencer::delay::{format_delay, parse_delay};

/// Cloneable handle to a sequencer's live configuration and run marker.
///
/// Every accessor takes the lock for a single field read or write, so a
/// running sequence observes each change on the next step it evaluates.
/// There are no cross-field transactions.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    inner: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    config: RwLock<SequencerConfig>,
    triggered: AtomicBool,
}

/// Read-only status as shown by a management UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerStatus {
    /// A trigger has passed the enable gate since activation.
    pub triggered: bool,
    pub enabled: bool,
}

impl SequencerStatus {
    pub fn state_label(&self) -> &'static str {
        state_label(self.enabled)
    }
}

fn state_label(enabled: bool) -> &'static str {
    if enabled { "Enabled" } else { "Disabled" }
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                config: RwLock::new(config),
                triggered: AtomicBool::new(false),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SequencerConfig> {
        self.inner.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SequencerConfig> {
        self.inner.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the whole configuration.
    pub fn snapshot(&self) -> SequencerConfig {
        self.read().clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.read().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.write().enabled = enabled;
        debug!(enabled, "sequencer enable state changed");
    }

    /// `"Enabled"` or `"Disabled"`.
    pub fn state(&self) -> &'static str {
        state_label(self.is_enabled())
    }

    /// Set the enable state from its label. Only `disabled` (any case)
    /// disables; every other value enables.
    pub fn set_state(&self, state: &str) {
        self.set_enabled(!state.trim().eq_ignore_ascii_case("disabled"));
    }

    pub fn delay(&self) -> Duration {
        self.read().delay
    }

    pub fn set_delay_duration(&self, delay: Duration) {
        self.write().delay = delay;
        debug!(delay_ms = delay.as_millis() as u64, "sequencer delay changed");
    }

    /// Set the delay from seconds text. The stored delay is untouched when
    /// the text does not parse.
    pub fn set_delay(&self, text: &str) -> Result<()> {
        let delay = parse_delay(text)?;
        self.set_delay_duration(delay);
        Ok(())
    }

    /// Current delay as seconds text.
    pub fn delay_text(&self) -> String {
        format_delay(self.delay())
    }

    /// Text of a 1-based slot.
    pub fn command(&self, slot: usize) -> Result<String> {
        self.read()
            .command(slot)
            .map(str::to_string)
            .ok_or_else(|| slot_out_of_range(slot))
    }

    /// Replace the text of a 1-based slot. An empty string clears the slot.
    pub fn set_command(&self, slot: usize, command: impl Into<String>) -> Result<()> {
        let idx = slot
            .checked_sub(1)
            .filter(|idx| *idx < SLOT_COUNT)
            .ok_or_else(|| slot_out_of_range(slot))?;
        let command = command.into();
        debug!(slot, cmd = %command, "command slot changed");
        self.write().commands[idx] = command;
        Ok(())
    }

    /// First non-empty slot at or after `slot`, read at call time.
    pub fn next_command_from(&self, slot: usize) -> Option<(usize, String)> {
        self.read()
            .next_command_from(slot)
            .map(|(idx, cmd)| (idx, cmd.to_string()))
    }

    /// Whether a slot after `slot` currently holds a command.
    pub fn has_command_after(&self, slot: usize) -> bool {
        self.read().has_command_after(slot)
    }

    pub fn device_address(&self) -> String {
        self.read().device_address.clone()
    }

    pub fn set_device_address(&self, address: impl Into<String>) {
        self.write().device_address = address.into();
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    /// Apply the enable gate for one trigger.
    ///
    /// Returns `false` with no side effects when disabled. Otherwise marks the
    /// sequencer as triggered and returns `true`.
    pub fn begin_trigger(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.inner.triggered.store(true, Ordering::SeqCst);
        true
    }

    pub fn status(&self) -> SequencerStatus {
        SequencerStatus {
            triggered: self.is_triggered(),
            enabled: self.is_enabled(),
        }
    }
}

fn slot_out_of_range(slot: usize) -> TrigseqError {
    TrigseqError::ConfigError(format!(
        "command slot must be between 1 and {SLOT_COUNT} (got {slot})"
    ))
}
