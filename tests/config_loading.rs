// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use trigseq::config::{load_and_validate, load_or_default};
use trigseq::errors::TrigseqError;
use trigseq::sequencer::{DEFAULT_DELAY, Sequencer};
use trigseq::types::TriggerWhileRunningBehaviour;
use trigseq_test_utils::builders::ConfigFileBuilder;

#[test]
fn full_config_file_is_loaded() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[config]
triggered_while_running_behaviour = "cancel"
queue_length = 2

[sequencer]
enabled = false
delay = "2.5"
device_address = "192.168.1.40"
commands = ["lamp on", "", "amp on"]
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(
        cfg.config.triggered_while_running_behaviour,
        TriggerWhileRunningBehaviour::Cancel
    );
    assert_eq!(cfg.config.queue_length, 2);

    let seq = Sequencer::new(cfg.sequencer);
    assert!(!seq.is_enabled());
    assert_eq!(seq.delay_text(), "2.5");
    assert_eq!(seq.device_address(), "192.168.1.40");
    assert_eq!(seq.command(1).unwrap(), "lamp on");
    assert_eq!(seq.command(2).unwrap(), "");
    assert_eq!(seq.command(3).unwrap(), "amp on");
}

#[test]
fn unparsable_delay_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[sequencer]
delay = "abc"
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(TrigseqError::ConfigError(msg)) => assert!(msg.contains("delay")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_queue_length_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[config]
queue_length = 0
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(TrigseqError::ConfigError(msg)) => assert!(msg.contains("queue_length")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_behaviour_is_a_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[config]
triggered_while_running_behaviour = "overlap"
"#
    )
    .unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(TrigseqError::TomlError(_))
    ));
}

#[test]
fn missing_explicit_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        load_or_default(Some(&path)),
        Err(TrigseqError::IoError(_))
    ));
}

#[test]
fn builder_defaults_match_activation_defaults() {
    let cfg = ConfigFileBuilder::new().command("a").build();
    assert!(cfg.sequencer.enabled);
    assert_eq!(cfg.sequencer.delay, DEFAULT_DELAY);
    assert_eq!(cfg.sequencer.command(1), Some("a"));

    let cfg = ConfigFileBuilder::new().delay("0.75").build();
    assert_eq!(cfg.sequencer.delay, Duration::from_millis(750));
}
