// src/logging.rs

//! Logging setup for `trigseq` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection:
//! 1. `--log-level` CLI flag (if provided) applies one level everywhere
//! 2. `TRIGSEQ_LOG` environment variable, in `EnvFilter` directive syntax
//!    (e.g. `debug` or `info,trigseq::exec=trace`)
//! 3. default to `info`
//!
//! Logs are sent to STDERR so that stdout stays free for console replies.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "TRIGSEQ_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Initialise global logging subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

/// Pick the filter from the CLI level or the env directives. Unparseable
/// directives fall back to the default.
fn build_filter(cli_level: Option<LogLevel>, env_directives: Option<&str>) -> EnvFilter {
    let directives = match (cli_level, env_directives) {
        (Some(lvl), _) => level_directive(lvl),
        (None, Some(env)) if !env.trim().is_empty() => env.trim(),
        (None, _) => DEFAULT_DIRECTIVE,
    };
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn level_directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
