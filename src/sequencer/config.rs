// src/sequencer/config.rs

use std::time::Duration;

/// Number of command slots. Slots are addressed 1-based.
pub const SLOT_COUNT: usize = 6;

/// Delay applied between consecutive commands unless configured otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(5000);

/// Live configuration of a sequencer.
///
/// An empty command string marks an absent slot. Slot order is fixed by
/// index and is the execution order of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    pub enabled: bool,
    pub delay: Duration,
    pub commands: [String; SLOT_COUNT],
    /// Address of the watched device. Stored for the detection side only.
    pub device_address: String,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: DEFAULT_DELAY,
            commands: Default::default(),
            device_address: String::new(),
        }
    }
}

impl SequencerConfig {
    /// Text of a 1-based slot, or `None` if the index is out of range.
    pub fn command(&self, slot: usize) -> Option<&str> {
        slot.checked_sub(1)
            .and_then(|idx| self.commands.get(idx))
            .map(String::as_str)
    }

    /// First non-empty slot at or after `slot`, with its index.
    pub fn next_command_from(&self, slot: usize) -> Option<(usize, &str)> {
        (slot.max(1)..=SLOT_COUNT)
            .filter_map(|s| self.command(s).map(|cmd| (s, cmd)))
            .find(|(_, cmd)| !cmd.is_empty())
    }

    /// Whether any slot strictly after `slot` is non-empty.
    pub fn has_command_after(&self, slot: usize) -> bool {
        self.next_command_from(slot + 1).is_some()
    }

    /// Non-empty slots in execution order.
    pub fn active_slots(&self) -> impl Iterator<Item = (usize, &str)> {
        self.commands
            .iter()
            .enumerate()
            .filter(|(_, cmd)| !cmd.is_empty())
            .map(|(idx, cmd)| (idx + 1, cmd.as_str()))
    }
}
