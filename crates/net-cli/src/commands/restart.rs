//! Restart command

use anyhow::Result;
use netcfg_apply::{CommandRunner, ServiceRestarter, ShellCommandRunner};
use netcfg_config::NetcfgSettings;
use std::sync::Arc;
use std::time::Duration;

/// Restart command implementation
pub struct RestartCommand {
    restarter: ServiceRestarter,
}

impl RestartCommand {
    /// Create new restart command
    pub fn new(settings: &NetcfgSettings) -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(ShellCommandRunner::with_timeout(
            Duration::from_secs(settings.command_timeout_secs),
        ));

        Self {
            restarter: ServiceRestarter::new(runner, settings.restart_commands.iter().cloned()),
        }
    }

    /// Execute restart command
    pub async fn execute(&self) -> Result<()> {
        println!("Restarting network service");
        for command in self.restarter.commands() {
            log::debug!("Restart candidate: {}", command);
        }

        let output = self.restarter.restart().await?;

        println!(
            "✓ Network service restarted with '{}' in {}ms",
            output.command, output.duration_ms
        );
        Ok(())
    }
}
