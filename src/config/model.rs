// src/config/model.rs

use serde::Deserialize;

use crate::sequencer::SequencerConfig;
use crate::types::TriggerWhileRunningBehaviour;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// triggered_while_running_behaviour = "queue"
/// queue_length = 1
///
/// [sequencer]
/// enabled = true
/// delay = "2.5"
/// device_address = "192.168.1.40"
/// commands = ["lamp on", "", "amp on"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Runtime behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Initial sequencer state from `[sequencer]`.
    #[serde(default)]
    pub sequencer: SequencerSection,
}

/// Validated configuration.
///
/// Obtained through `ConfigFile::try_from(RawConfigFile)`, see `validate.rs`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub sequencer: SequencerConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, sequencer: SequencerConfig) -> Self {
        Self { config, sequencer }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// `"queue"` (default) or `"cancel"`.
    #[serde(default)]
    pub triggered_while_running_behaviour: TriggerWhileRunningBehaviour,

    /// Maximum number of runs remembered while a run is active.
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,
}

fn default_queue_length() -> usize {
    1
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            triggered_while_running_behaviour: TriggerWhileRunningBehaviour::default(),
            queue_length: default_queue_length(),
        }
    }
}

/// `[sequencer]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SequencerSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between consecutive commands. Falls back to 5 seconds.
    #[serde(default)]
    pub delay: Option<DelayValue>,

    #[serde(default)]
    pub device_address: String,

    /// Command slots in order; empty strings are allowed as placeholders.
    #[serde(default)]
    pub commands: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for SequencerSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            delay: None,
            device_address: String::new(),
            commands: Vec::new(),
        }
    }
}

/// A delay written either as a number (`delay = 2.5`) or as text
/// (`delay = "2.5"`). Both are seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DelayValue {
    Seconds(f64),
    Text(String),
}
