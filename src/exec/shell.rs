// src/exec/shell.rs

//! Executor that runs each command line through the platform shell.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::exec::backend::{CommandExecutor, CommandOutcome};

/// Runs commands with `sh -c` (`cmd /C` on Windows).
///
/// The child is killed if the execution future is dropped. Stdout is logged
/// at debug level; on failure the trimmed stderr (or the exit code) becomes
/// the diagnostic.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, command: &str) -> Result<CommandOutcome> {
        info!(cmd = %command, "starting command process");

        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd
            .output()
            .await
            .with_context(|| format!("running command '{command}'"))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(cmd = %command, "stdout: {}", line);
        }

        let code = output.status.code().unwrap_or(-1);
        info!(
            cmd = %command,
            exit_code = code,
            success = output.status.success(),
            "command process exited"
        );

        if output.status.success() {
            return Ok(CommandOutcome::Success);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let diagnostic = if stderr.is_empty() {
            format!("exited with code {code}")
        } else {
            format!("exited with code {code}: {stderr}")
        };
        Ok(CommandOutcome::failed(diagnostic))
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>> {
        Box::pin(async move {
            match self.run(command).await {
                Ok(outcome) => outcome,
                Err(err) => CommandOutcome::failed(format!("{err:#}")),
            }
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_exit_status_is_success() {
        let exec = ShellExecutor::new();
        assert_eq!(exec.execute("true").await, CommandOutcome::Success);
    }

    #[tokio::test]
    async fn failure_carries_exit_code_and_stderr() {
        let exec = ShellExecutor::new();
        match exec.execute("echo broken >&2; exit 3").await {
            CommandOutcome::Failed { diagnostic } => {
                assert!(diagnostic.contains("code 3"), "{diagnostic}");
                assert!(diagnostic.contains("broken"), "{diagnostic}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
