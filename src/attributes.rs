// src/attributes.rs

//! Name-based access to the sequencer for a management layer.
//!
//! Every attribute and action is listed here by hand; there is no runtime
//! binding of names to methods.

use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, TrigseqError};
use crate::sequencer::{SLOT_COUNT, Sequencer};

/// An attribute exposed to the management layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// `"true"` once a trigger has been processed. Read-only.
    Detected,
    /// `"Enabled"` / `"Disabled"`.
    State,
    /// Seconds between commands.
    Delay,
    DeviceAddress,
    /// 1-based command slot.
    Command(usize),
}

/// Every attribute in display order.
pub fn all_attributes() -> impl Iterator<Item = Attribute> {
    [
        Attribute::Detected,
        Attribute::State,
        Attribute::Delay,
        Attribute::DeviceAddress,
    ]
    .into_iter()
    .chain((1..=SLOT_COUNT).map(Attribute::Command))
}

impl Attribute {
    pub fn is_writable(&self) -> bool {
        !matches!(self, Attribute::Detected)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Detected => f.write_str("Detected"),
            Attribute::State => f.write_str("State"),
            Attribute::Delay => f.write_str("Delay"),
            Attribute::DeviceAddress => f.write_str("DeviceAddress"),
            Attribute::Command(slot) => write!(f, "Command{slot}"),
        }
    }
}

impl FromStr for Attribute {
    type Err = TrigseqError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        let attr = match name.as_str() {
            "detected" => Attribute::Detected,
            "state" => Attribute::State,
            "delay" => Attribute::Delay,
            "deviceaddress" => Attribute::DeviceAddress,
            other => other
                .strip_prefix("command")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|slot| (1..=SLOT_COUNT).contains(slot))
                .map(Attribute::Command)
                .ok_or_else(|| TrigseqError::UnknownAttribute(s.trim().to_string()))?,
        };
        Ok(attr)
    }
}

/// Read an attribute as text.
pub fn get_attribute(sequencer: &Sequencer, attr: Attribute) -> Result<String> {
    let value = match attr {
        Attribute::Detected => sequencer.is_triggered().to_string(),
        Attribute::State => sequencer.state().to_string(),
        Attribute::Delay => sequencer.delay_text(),
        Attribute::DeviceAddress => sequencer.device_address(),
        Attribute::Command(slot) => sequencer.command(slot)?,
    };
    Ok(value)
}

/// Write an attribute from text. Nothing changes when the value is rejected.
pub fn set_attribute(sequencer: &Sequencer, attr: Attribute, value: &str) -> Result<()> {
    match attr {
        Attribute::Detected => return Err(TrigseqError::ReadOnlyAttribute(attr.to_string())),
        Attribute::State => sequencer.set_state(value),
        Attribute::Delay => sequencer.set_delay(value)?,
        Attribute::DeviceAddress => sequencer.set_device_address(value),
        Attribute::Command(slot) => sequencer.set_command(slot, value)?,
    }
    Ok(())
}

/// Actions a management layer can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Enable,
    Disable,
    /// Report a detection, i.e. fire a trigger.
    Detect,
}

impl FromStr for Action {
    type Err = TrigseqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enable" => Ok(Action::Enable),
            "disable" => Ok(Action::Disable),
            "detect" => Ok(Action::Detect),
            _ => Err(TrigseqError::UnknownAttribute(s.trim().to_string())),
        }
    }
}

/// What the caller still has to do after [`apply_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    Applied,
    /// The caller must deliver a trigger to the runtime.
    FireTrigger,
}

pub fn apply_action(sequencer: &Sequencer, action: Action) -> ActionEffect {
    match action {
        Action::Enable => {
            sequencer.set_enabled(true);
            ActionEffect::Applied
        }
        Action::Disable => {
            sequencer.set_enabled(false);
            ActionEffect::Applied
        }
        Action::Detect => ActionEffect::FireTrigger,
    }
}
