//! Configure command

use anyhow::Result;
use netcfg_apply::ConfigSession;
use netcfg_config::NetcfgSettings;
use std::path::Path;

use super::load_descriptors;

/// Options of one configure run
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    /// Renderer token, unchanged when `None`
    pub backend: Option<String>,
    /// Restart the network service after writing
    pub restart: bool,
    /// Print the document instead of writing it
    pub dry_run: bool,
}

/// Configure command implementation
pub struct ConfigureCommand {
    settings: NetcfgSettings,
}

impl ConfigureCommand {
    /// Create new configure command
    pub fn new(settings: NetcfgSettings) -> Self {
        Self { settings }
    }

    /// Execute configure command
    pub async fn execute(&self, descriptor_path: &Path, options: &ConfigureOptions) -> Result<()> {
        let input = load_descriptors(descriptor_path)?;
        let mut session = ConfigSession::from_settings(&self.settings);

        if let Some(backend) = &options.backend {
            session.set_backend(backend.clone());
        }

        if options.dry_run {
            println!("Performing dry-run of network configuration");
            session.build(input)?;
            let document = session.render()?;

            println!("✓ Interface validation passed");
            print!("{}", document);
            for rule in session.tree().udev_rules() {
                print!("{}", rule.to_rule_line());
            }
            println!("Dry-run completed successfully - configuration was not written");
            return Ok(());
        }

        println!(
            "Writing network configuration to: {}",
            self.settings.netplan_dir.display()
        );
        session.configure(input).await?;

        let tree = session.tree();
        println!(
            "✓ Network configuration written ({} ethernet(s), {} vlan(s), {} bridge(s))",
            tree.ethernets.len(),
            tree.vlans.len(),
            tree.bridges.len()
        );

        if options.restart {
            let output = session.restart_service().await?;
            println!("✓ Network service restarted with '{}'", output.command);
        }

        Ok(())
    }
}
