//! Scheduler command execution.
//!
//! The adapters only build command strings and parse captured output; this
//! is the one place that actually spawns a process.

use thiserror::Error;
use tokio::process::Command;

/// Error type for command execution.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to execute {command}: {error}")]
    Execution { command: String, error: String },
}

/// Exit code and captured streams of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run `command_line` through `sh -c` and capture its output.
///
/// A non-zero exit is not an error here: the adapter decides what it means.
/// A process killed by a signal reports exit code -1.
pub async fn run_captured(command_line: &str) -> Result<CapturedOutput, RunError> {
    tracing::debug!("Running: {}", command_line);
    let output = Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .output()
        .await
        .map_err(|e| RunError::Execution {
            command: command_line.to_string(),
            error: e.to_string(),
        })?;

    Ok(CapturedOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
