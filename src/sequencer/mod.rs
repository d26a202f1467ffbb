// src/sequencer/mod.rs

//! Sequencer state shared between the runtime, running sequences and the
//! management surface.
//!
//! - [`config`] holds the typed [`SequencerConfig`] record and the slot
//!   constants.
//! - [`delay`] converts between the seconds-as-text form used by the
//!   management surface and the stored millisecond [`Duration`].
//! - [`state`] wraps the record in a lock together with the `triggered`
//!   marker and exposes the accessor surface.
//!
//! [`Duration`]: std::time::Duration

pub mod config;
pub mod delay;
pub mod state;

pub use config::{DEFAULT_DELAY, SLOT_COUNT, SequencerConfig};
pub use delay::{delay_from_secs, format_delay, parse_delay};
pub use state::{Sequencer, SequencerStatus};
