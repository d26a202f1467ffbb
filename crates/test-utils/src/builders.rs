#![allow(dead_code)]

use std::time::Duration;

use trigseq::config::{ConfigFile, DelayValue, RawConfigFile};
use trigseq::sequencer::{Sequencer, SequencerConfig, SLOT_COUNT};
use trigseq::types::TriggerWhileRunningBehaviour;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn command(mut self, cmd: &str) -> Self {
        self.config.sequencer.commands.push(cmd.to_string());
        self
    }

    pub fn delay(mut self, secs: &str) -> Self {
        self.config.sequencer.delay = Some(DelayValue::Text(secs.to_string()));
        self
    }

    pub fn enabled(mut self, val: bool) -> Self {
        self.config.sequencer.enabled = val;
        self
    }

    pub fn behaviour(mut self, behaviour: TriggerWhileRunningBehaviour) -> Self {
        self.config.config.triggered_while_running_behaviour = behaviour;
        self
    }

    pub fn queue_length(mut self, len: usize) -> Self {
        self.config.config.queue_length = len;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a live `Sequencer`.
pub struct SequencerBuilder {
    config: SequencerConfig,
    next_slot: usize,
}

impl SequencerBuilder {
    pub fn new() -> Self {
        Self {
            config: SequencerConfig::default(),
            next_slot: 0,
        }
    }

    /// Fill the next slot; `""` leaves it empty.
    pub fn command(mut self, cmd: &str) -> Self {
        assert!(self.next_slot < SLOT_COUNT, "more than {SLOT_COUNT} slots");
        self.config.commands[self.next_slot] = cmd.to_string();
        self.next_slot += 1;
        self
    }

    pub fn commands(self, cmds: &[&str]) -> Self {
        cmds.iter().fold(self, |b, cmd| b.command(cmd))
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    pub fn delay_ms(self, millis: u64) -> Self {
        self.delay(Duration::from_millis(millis))
    }

    pub fn enabled(mut self, val: bool) -> Self {
        self.config.enabled = val;
        self
    }

    pub fn build(self) -> Sequencer {
        Sequencer::new(self.config)
    }
}

impl Default for SequencerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
