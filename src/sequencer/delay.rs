// src/sequencer/delay.rs

//! Delay values are exchanged as seconds in text form ("2.5") and stored as
//! whole milliseconds.

use std::time::Duration;

use crate::errors::{Result, TrigseqError};

/// Parse a seconds value such as `"2.5"` into a millisecond-precision
/// [`Duration`], rounding to the nearest millisecond.
pub fn parse_delay(text: &str) -> Result<Duration> {
    let trimmed = text.trim();
    let secs: f64 = trimmed.parse().map_err(|_| {
        TrigseqError::ConfigError(format!(
            "delay must be a non-negative number of seconds (got {text:?})"
        ))
    })?;
    delay_from_secs(secs)
}

/// Convert a seconds value into a stored delay.
pub fn delay_from_secs(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(TrigseqError::ConfigError(format!(
            "delay must be a non-negative number of seconds (got {secs})"
        )));
    }

    let millis = (secs * 1000.0).round();
    if millis >= u64::MAX as f64 {
        return Err(TrigseqError::ConfigError(format!(
            "delay of {secs} seconds is too large"
        )));
    }

    Ok(Duration::from_millis(millis as u64))
}

/// Render a delay as seconds, always with at least one decimal digit
/// (`5000ms` → `"5.0"`, `2500ms` → `"2.5"`).
pub fn format_delay(delay: Duration) -> String {
    let secs = delay.as_millis() as f64 / 1000.0;
    if secs.fract() == 0.0 {
        format!("{secs:.1}")
    } else {
        format!("{secs}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_seconds_become_millis() {
        assert_eq!(parse_delay("2.5").unwrap(), Duration::from_millis(2500));
        assert_eq!(parse_delay(" 0.25 ").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_delay("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_delay("0.0004").unwrap(), Duration::ZERO);
        assert_eq!(parse_delay("0.0015").unwrap(), Duration::from_millis(2));
    }

    #[test]
    fn rejects_non_numeric_negative_and_non_finite() {
        for bad in ["abc", "", "-1", "NaN", "inf", "2.5s"] {
            match parse_delay(bad) {
                Err(TrigseqError::ConfigError(msg)) => assert!(msg.contains("delay")),
                other => panic!("expected ConfigError for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn renders_seconds_with_fraction() {
        assert_eq!(format_delay(Duration::from_millis(5000)), "5.0");
        assert_eq!(format_delay(Duration::from_millis(2500)), "2.5");
        assert_eq!(format_delay(Duration::from_millis(1)), "0.001");
        assert_eq!(format_delay(Duration::ZERO), "0.0");
    }

    #[test]
    fn rendering_drops_sub_millisecond_precision() {
        assert_eq!(format_delay(Duration::from_micros(1500)), "0.001");
    }
}
