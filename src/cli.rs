// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `trigseq`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "trigseq",
    version,
    about = "Run a paced sequence of commands each time a detection trigger fires.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Trigseq.toml` in the current working directory is used
    /// when present; otherwise built-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Fire a single trigger at startup and exit once the run has finished.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TRIGSEQ_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the command slots, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Don't read triggers and attribute commands from stdin.
    #[arg(long)]
    pub no_console: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
