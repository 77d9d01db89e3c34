//! SafeCommandExecutor: Type-safe external-command execution
//!
//! # Security Features
//!
//! - **Whitelist-based validation**: Only `git` and `npm` can execute
//! - **Injection prevention**: Uses `tokio::process::Command` which prevents shell injection
//! - **Argument sanitization**: Arguments passed as a slice, never interpolated into shell strings
//! - **Working directory validation**: Validates existence before execution
//!
//! Every invocation blocks the pipeline until the child exits. No timeout
//! is enforced unless one is configured explicitly.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Allowed commands whitelist for security.
///
/// The remediation workflow only ever drives source control and the
/// package manager; everything else is rejected before spawning.
const ALLOWED_COMMANDS: &[&str] = &["git", "npm"];

/// Errors that can occur during command execution
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command is not in the allowed whitelist
    #[error("Command '{0}' is not in the allowed whitelist")]
    CommandNotAllowed(String),

    /// Working directory does not exist or is not accessible
    #[error("Working directory does not exist: {0}")]
    InvalidWorkingDirectory(PathBuf),

    /// Command execution failed (e.g., binary not found, permission denied)
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),

    /// Command exceeded the configured timeout
    #[error("Command timeout after {0:?}")]
    Timeout(Duration),
}

/// Captured result of one external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// True when the child exited with status 0
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Seam for invoking external commands.
///
/// The remediation runner depends on this trait so tests can script
/// command outcomes without spawning processes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command args..` in `working_dir`, blocking until exit
    async fn run(
        &self,
        working_dir: &Path,
        command: &str,
        args: &[&str],
    ) -> Result<CommandOutput, CommandError>;
}

/// Safe command executor with whitelist and working-directory controls
#[derive(Debug, Default)]
pub struct SafeCommandExecutor {
    /// Optional timeout for command execution; None matches the
    /// no-timeout contract of the workflow
    timeout: Option<Duration>,
}

impl SafeCommandExecutor {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Set command execution timeout.
    ///
    /// Commands exceeding this duration are terminated and reported as
    /// `CommandError::Timeout`.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }
}

#[async_trait]
impl CommandRunner for SafeCommandExecutor {
    async fn run(
        &self,
        working_dir: &Path,
        command: &str,
        args: &[&str],
    ) -> Result<CommandOutput, CommandError> {
        if !ALLOWED_COMMANDS.contains(&command) {
            return Err(CommandError::CommandNotAllowed(command.to_string()));
        }

        if !working_dir.exists() {
            return Err(CommandError::InvalidWorkingDirectory(
                working_dir.to_path_buf(),
            ));
        }

        // Windows-specific: npm is a .cmd file, not an .exe
        #[cfg(target_os = "windows")]
        let command_name = if command == "npm" {
            format!("{}.cmd", command)
        } else {
            command.to_string()
        };

        #[cfg(not(target_os = "windows"))]
        let command_name = command.to_string();

        let future = Command::new(&command_name)
            .args(args)
            .current_dir(working_dir)
            .output();

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, future)
                .await
                .map_err(|_| CommandError::Timeout(timeout))?,
            None => future.await,
        }
        .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;

        Ok(CommandOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
