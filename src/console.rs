// src/console.rs

//! Line-based control console on stdin.
//!
//! Each line is one command:
//!
//! ```text
//! detect                 fire a trigger
//! enable | disable       toggle the enable gate
//! status                 show detection marker and state
//! list                   show every attribute
//! get <Attribute>        read one attribute
//! set <Attribute> <text> write one attribute (text may be empty)
//! quit                   shut down
//! ```
//!
//! Replies go to stdout; logs stay on stderr.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::attributes::{
    Action, ActionEffect, Attribute, all_attributes, apply_action, get_attribute, set_attribute,
};
use crate::engine::{RuntimeEvent, TriggerReason};
use crate::errors::{Result, TrigseqError};
use crate::sequencer::Sequencer;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Action(Action),
    Status,
    List,
    Get(Attribute),
    Set(Attribute, String),
    Quit,
}

/// Parse one console line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = split_word(line);
    let cmd = match word.to_ascii_lowercase().as_str() {
        "status" => ConsoleCommand::Status,
        "list" => ConsoleCommand::List,
        "quit" | "exit" => ConsoleCommand::Quit,
        "get" => {
            let (name, _) = split_word(rest);
            ConsoleCommand::Get(name.parse()?)
        }
        "set" => {
            let (name, value) = split_word(rest);
            ConsoleCommand::Set(name.parse()?, value.to_string())
        }
        _ => match word.parse::<Action>() {
            Ok(action) => ConsoleCommand::Action(action),
            Err(_) => {
                return Err(TrigseqError::ConfigError(format!(
                    "unknown console command '{word}'"
                )));
            }
        },
    };

    Ok(Some(cmd))
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

/// Apply a console command. Returns the reply text, if any, and whether the
/// console should keep reading.
pub async fn handle_command(
    cmd: ConsoleCommand,
    sequencer: &Sequencer,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<(Option<String>, bool)> {
    let reply = match cmd {
        ConsoleCommand::Action(action) => match apply_action(sequencer, action) {
            ActionEffect::Applied => Some(sequencer.state().to_string()),
            ActionEffect::FireTrigger => {
                send(runtime_tx, RuntimeEvent::Triggered {
                    reason: TriggerReason::Console,
                })
                .await?;
                None
            }
        },
        ConsoleCommand::Status => {
            let status = sequencer.status();
            Some(format!(
                "detected={} state={}",
                status.triggered,
                status.state_label()
            ))
        }
        ConsoleCommand::List => {
            let mut lines = Vec::new();
            for attr in all_attributes() {
                let value = get_attribute(sequencer, attr)?;
                if attr.is_writable() {
                    lines.push(format!("{attr} = {value}"));
                } else {
                    lines.push(format!("{attr} = {value} (read-only)"));
                }
            }
            Some(lines.join("\n"))
        }
        ConsoleCommand::Get(attr) => Some(get_attribute(sequencer, attr)?),
        ConsoleCommand::Set(attr, value) => {
            set_attribute(sequencer, attr, &value)?;
            Some(format!("{attr} = {}", get_attribute(sequencer, attr)?))
        }
        ConsoleCommand::Quit => {
            send(runtime_tx, RuntimeEvent::ShutdownRequested).await?;
            return Ok((None, false));
        }
    };

    Ok((reply, true))
}

async fn send(runtime_tx: &mpsc::Sender<RuntimeEvent>, event: RuntimeEvent) -> Result<()> {
    runtime_tx
        .send(event)
        .await
        .map_err(|e| TrigseqError::Other(anyhow::anyhow!("runtime is not running: {e}")))
}

/// Spawn the console reader on stdin.
///
/// Reading stops at end of input or after `quit`; end of input alone does
/// not stop the runtime.
pub fn spawn_console(
    sequencer: Sequencer,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("console reading commands from stdin");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "failed to read from stdin");
                    break;
                }
            };

            let cmd = match parse_line(&line) {
                Ok(Some(cmd)) => cmd,
                Ok(None) => continue,
                Err(e) => {
                    println!("error: {e}");
                    continue;
                }
            };

            match handle_command(cmd, &sequencer, &runtime_tx).await {
                Ok((reply, keep_reading)) => {
                    if let Some(reply) = reply {
                        println!("{reply}");
                    }
                    if !keep_reading {
                        break;
                    }
                }
                Err(e) => println!("error: {e}"),
            }
        }

        debug!("console finished");
    })
}
