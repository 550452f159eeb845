//! Execution of apply commands

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;

use netcfg_core::CommandError;

/// Result of a successful command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Command line as given to the runner
    pub command: String,
    /// Exit code of the command
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Duration of the command
    pub duration_ms: u64,
}

/// Runs one command line to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command`; a non-zero exit is an error
    async fn run(&self, command: &str) -> Result<CommandOutput, CommandError>;
}

/// Runs command lines through `sh -c` with a timeout
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: String,
    operation_timeout: Duration,
}

impl ShellCommandRunner {
    /// Create runner with a 60 second timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(60))
    }

    pub fn with_timeout(operation_timeout: Duration) -> Self {
        Self {
            shell: "/bin/sh".to_string(),
            operation_timeout,
        }
    }
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput, CommandError> {
        let start_time = Instant::now();

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("Executing '{}'", command);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!("'{}' failed to execute: {}", command, e);
                return Err(CommandError::Spawn {
                    command: command.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let result = timeout(self.operation_timeout, async {
            tokio::try_join!(child.wait(), read_pipe(stdout_pipe), read_pipe(stderr_pipe))
        })
        .await;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(Ok((status, stdout, stderr))) => {
                let stdout = String::from_utf8_lossy(&stdout).to_string();
                let stderr = String::from_utf8_lossy(&stderr).to_string();
                let exit_code = status.code();

                if status.success() {
                    debug!("'{}' completed successfully in {}ms", command, duration_ms);
                    Ok(CommandOutput {
                        command: command.to_string(),
                        exit_code,
                        stdout,
                        stderr,
                        duration_ms,
                    })
                } else {
                    warn!(
                        "'{}' failed with exit code {:?}: {}",
                        command,
                        exit_code,
                        stderr.trim()
                    );
                    Err(CommandError::Failed {
                        command: command.to_string(),
                        code: exit_code,
                        stderr,
                    })
                }
            }
            Ok(Err(e)) => {
                error!("'{}' failed while running: {}", command, e);
                Err(CommandError::Spawn {
                    command: command.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                error!(
                    "'{}' timed out after {:?}",
                    command, self.operation_timeout
                );
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill '{}': {}", command, e);
                }
                Err(CommandError::Timeout {
                    command: command.to_string(),
                    timeout_secs: self.operation_timeout.as_secs(),
                })
            }
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
