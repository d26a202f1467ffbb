// src/lib.rs

pub mod attributes;
pub mod cli;
pub mod config;
pub mod console;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod sequencer;
pub mod types;

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions, TriggerReason};
use crate::exec::ShellExecutor;
use crate::sequencer::{Sequencer, format_delay};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the shared sequencer state
/// - core runtime / async runtime shell
/// - shell command executor
/// - (optional) stdin console
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.as_ref().map(PathBuf::from);
    let cfg = load_or_default(config_path.as_deref())?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let sequencer = Sequencer::new(cfg.sequencer.clone());

    let behaviour = cfg.config.triggered_while_running_behaviour;
    let queue_length = cfg.config.queue_length;

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // First Ctrl-C → graceful shutdown; second → abort the running command.
    let (force_tx, force_rx) = watch::channel(false);
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            let mut presses = 0u32;
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "failed to listen for Ctrl+C");
                    return;
                }
                presses += 1;
                if presses == 1 {
                    info!("Ctrl+C received; stopping (press again to force)");
                    let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
                } else {
                    warn!("second Ctrl+C; aborting running command");
                    force_tx.send_replace(true);
                }
            }
        });
    }

    if args.once {
        rt_tx
            .send(RuntimeEvent::Triggered {
                reason: TriggerReason::Startup,
            })
            .await?;
    } else if !args.no_console {
        // Detached: the reader blocks on stdin and ends with the process.
        let _console = crate::console::spawn_console(sequencer.clone(), rt_tx.clone());
    }

    info!(
        enabled = cfg.sequencer.enabled,
        delay_ms = cfg.sequencer.delay.as_millis() as u64,
        slots = cfg.sequencer.active_slots().count(),
        "sequencer activated"
    );

    let options = RuntimeOptions {
        exit_when_idle: args.once,
    };

    let core = CoreRuntime::new(behaviour, queue_length, options);
    let runtime = Runtime::new(core, rt_rx, &rt_tx, sequencer, ShellExecutor::new())
        .with_force_stop(force_rx);
    // The Ctrl-C task and console keep their own senders.
    drop(rt_tx);
    runtime.run().await?;
    Ok(())
}

/// Simple dry-run output: print runtime behaviour and command slots.
fn print_dry_run(cfg: &ConfigFile) {
    println!("trigseq dry-run");
    println!(
        "  config.triggered_while_running_behaviour = {:?}",
        cfg.config.triggered_while_running_behaviour
    );
    println!("  config.queue_length = {}", cfg.config.queue_length);
    println!();

    let seq = &cfg.sequencer;
    println!("sequencer:");
    println!("  enabled: {}", seq.enabled);
    println!("  delay: {}s", format_delay(seq.delay));
    if !seq.device_address.is_empty() {
        println!("  device_address: {}", seq.device_address);
    }

    println!("commands ({}):", seq.active_slots().count());
    for (slot, cmd) in seq.active_slots() {
        println!("  {slot}: {cmd}");
    }

    debug!("dry-run complete (no execution)");
}
