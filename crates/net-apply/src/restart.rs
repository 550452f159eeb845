//! Network service restart: first successful apply command wins

use std::sync::Arc;

use log::{info, warn};
use tokio::task::JoinSet;

use netcfg_core::{CommandError, RestartError};

use crate::runner::{CommandOutput, CommandRunner};

/// Races a fixed list of apply commands
#[derive(Clone)]
pub struct ServiceRestarter {
    runner: Arc<dyn CommandRunner>,
    commands: Vec<String>,
}

impl ServiceRestarter {
    pub fn new<I, S>(runner: Arc<dyn CommandRunner>, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            runner,
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    /// Candidate commands in launch order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Start every candidate at once and return the first success.
    ///
    /// Candidates still running when a winner is found are detached; their
    /// processes keep running after the caller returns or exits. If every candidate fails, the error of
    /// the one that failed last is returned.
    pub async fn restart(&self) -> Result<CommandOutput, RestartError> {
        if self.commands.is_empty() {
            return Err(RestartError::NoCandidates);
        }

        let mut tasks = JoinSet::new();
        for command in &self.commands {
            let runner = Arc::clone(&self.runner);
            let command = command.clone();
            tasks.spawn(async move {
                let attempt = tokio::spawn({
                    let command = command.clone();
                    async move { runner.run(&command).await }
                });
                attempt.await.unwrap_or_else(|e| {
                    Err(CommandError::Spawn {
                        command,
                        message: e.to_string(),
                    })
                })
            });
        }

        let mut last_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(output)) => {
                    info!("Network service restarted with '{}'", output.command);
                    tasks.detach_all();
                    return Ok(output);
                }
                Ok(Err(e)) => {
                    warn!("Restart candidate failed: {}", e);
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!("Restart candidate task aborted: {}", e);
                }
            }
        }

        match last_error {
            Some(e) => Err(RestartError::AllFailed(e)),
            None => Err(RestartError::NoCandidates),
        }
    }
}
