// src/config/validate.rs

use crate::config::model::{ConfigFile, DelayValue, RawConfigFile, SequencerSection};
use crate::errors::{Result, TrigseqError};
use crate::sequencer::{DEFAULT_DELAY, SLOT_COUNT, SequencerConfig, delay_from_secs, parse_delay};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TrigseqError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_global_config(&raw)?;
        let sequencer = build_sequencer_config(raw.sequencer)?;
        Ok(ConfigFile::new_unchecked(raw.config, sequencer))
    }
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    // triggered_while_running_behaviour is strongly typed and validated
    // during deserialization, so we don't need to check it here.

    if cfg.config.queue_length == 0 {
        return Err(TrigseqError::ConfigError(
            "[config].queue_length must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn build_sequencer_config(section: SequencerSection) -> Result<SequencerConfig> {
    if section.commands.len() > SLOT_COUNT {
        return Err(TrigseqError::ConfigError(format!(
            "[sequencer].commands holds at most {SLOT_COUNT} entries (got {})",
            section.commands.len()
        )));
    }

    let delay = match section.delay {
        None => DEFAULT_DELAY,
        Some(DelayValue::Seconds(secs)) => delay_from_secs(secs)?,
        Some(DelayValue::Text(text)) => parse_delay(&text)?,
    };

    let mut commands: [String; SLOT_COUNT] = Default::default();
    for (slot, cmd) in commands.iter_mut().zip(section.commands) {
        *slot = cmd;
    }

    Ok(SequencerConfig {
        enabled: section.enabled,
        delay,
        commands,
        device_address: section.device_address,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn parse(toml_src: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(toml_src)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.sequencer, SequencerConfig::default());
        assert_eq!(cfg.config.queue_length, 1);
    }

    #[test]
    fn overlap_behaviour_defaults_to_queue_and_rejects_unknown_names() {
        let cfg = parse("").unwrap();
        assert_eq!(
            cfg.config.triggered_while_running_behaviour,
            crate::types::TriggerWhileRunningBehaviour::Queue
        );

        let err = parse("[config]\ntriggered_while_running_behaviour = \"restart\"\n");
        assert!(matches!(err, Err(TrigseqError::TomlError(_))));
    }

    #[test]
    fn numeric_and_text_delays_are_seconds() {
        let cfg = parse("[sequencer]\ndelay = 2.5\n").unwrap();
        assert_eq!(cfg.sequencer.delay, Duration::from_millis(2500));

        let cfg = parse("[sequencer]\ndelay = \"0.1\"\n").unwrap();
        assert_eq!(cfg.sequencer.delay, Duration::from_millis(100));

        let cfg = parse("[sequencer]\ndelay = 3\n").unwrap();
        assert_eq!(cfg.sequencer.delay, Duration::from_secs(3));
    }

    #[test]
    fn commands_fill_slots_in_order() {
        let cfg = parse("[sequencer]\ncommands = [\"a\", \"\", \"c\"]\n").unwrap();
        assert_eq!(cfg.sequencer.command(1), Some("a"));
        assert_eq!(cfg.sequencer.command(2), Some(""));
        assert_eq!(cfg.sequencer.command(3), Some("c"));
        assert_eq!(cfg.sequencer.command(4), Some(""));
    }

    #[test]
    fn too_many_commands_is_rejected() {
        let err = parse("[sequencer]\ncommands = [\"1\",\"2\",\"3\",\"4\",\"5\",\"6\",\"7\"]\n")
            .unwrap_err();
        assert!(matches!(err, TrigseqError::ConfigError(msg) if msg.contains("at most 6")));
    }

    #[test]
    fn negative_delay_is_rejected() {
        assert!(matches!(
            parse("[sequencer]\ndelay = -1.0\n"),
            Err(TrigseqError::ConfigError(_))
        ));
    }
}
