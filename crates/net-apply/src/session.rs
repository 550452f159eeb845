//! Configuration sessions

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};

use netcfg_config::{
    set_backend, ConfigStore, ConfigTree, ConfigWriter, NetcfgSettings, NetplanDirStore,
    UdevRuleWriter, UdevRulesFile,
};
use netcfg_core::{
    DescriptorInput, NetcfgError, PersistenceError, RestartError, Result, ValidatedInterface,
    ValidationError,
};
use netcfg_validate::InterfaceValidator;

use crate::restart::ServiceRestarter;
use crate::runner::{CommandOutput, CommandRunner, ShellCommandRunner};

/// Progress of the last `configure` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No configure call yet
    Idle,
    /// Descriptors are being validated
    Validating,
    /// Validation failed, the tree was not touched
    Rejected,
    /// Descriptors passed validation and are ordered
    Validated,
    /// Tree sections are being rebuilt
    Building,
    /// Tree rebuilt but not written
    Built,
    /// Tree is being written
    Persisting,
    /// Configuration written
    Done,
    /// Writing failed
    Failed,
}

/// Caller-held handle owning one configuration tree.
///
/// `configure` and `set_backend` take `&mut self`, so calls on one session
/// are serialized; independent sessions own independent trees.
pub struct ConfigSession {
    tree: ConfigTree,
    state: SessionState,
    validator: InterfaceValidator,
    writer: ConfigWriter,
    restarter: ServiceRestarter,
}

impl ConfigSession {
    /// Create session with explicit collaborators
    pub fn new(
        store: Arc<dyn ConfigStore>,
        udev: Arc<dyn UdevRuleWriter>,
        restarter: ServiceRestarter,
    ) -> Self {
        Self {
            tree: ConfigTree::new(),
            state: SessionState::Idle,
            validator: InterfaceValidator::new(),
            writer: ConfigWriter::new(store, udev),
            restarter,
        }
    }

    /// Create session writing to the locations named in `settings`
    pub fn from_settings(settings: &NetcfgSettings) -> Self {
        let store = NetplanDirStore::with_dir(&settings.netplan_dir)
            .with_default_file(settings.netplan_file.clone());
        let udev = UdevRulesFile::with_path(&settings.udev_rules_path);
        let runner: Arc<dyn CommandRunner> = Arc::new(ShellCommandRunner::with_timeout(
            Duration::from_secs(settings.command_timeout_secs),
        ));

        Self::new(
            Arc::new(store),
            Arc::new(udev),
            ServiceRestarter::new(runner, settings.restart_commands.iter().cloned()),
        )
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Select the renderer; kept across `configure` calls
    pub fn set_backend(&mut self, token: impl Into<String>) {
        set_backend(&mut self.tree, token);
    }

    /// Validate descriptors and return them in processing order.
    ///
    /// The tree is not touched.
    pub fn validate(
        &mut self,
        input: impl Into<DescriptorInput>,
    ) -> std::result::Result<Vec<ValidatedInterface>, ValidationError> {
        self.state = SessionState::Validating;
        match self.validator.order_and_validate(input) {
            Ok(ordered) => {
                debug!("Validated {} interface(s)", ordered.len());
                self.state = SessionState::Validated;
                Ok(ordered)
            }
            Err(e) => {
                debug!("Rejected interface batch: {}", e);
                self.state = SessionState::Rejected;
                Err(e)
            }
        }
    }

    /// Validate descriptors and rebuild the tree sections from them.
    ///
    /// The tree is left untouched when validation fails.
    pub fn build(
        &mut self,
        input: impl Into<DescriptorInput>,
    ) -> std::result::Result<(), ValidationError> {
        let ordered = self.validate(input)?;

        self.state = SessionState::Building;
        self.tree.reset_sections();
        for interface in ordered {
            self.tree.apply(interface);
        }
        self.state = SessionState::Built;
        Ok(())
    }

    /// Validate, rebuild the tree and persist it with its udev rules
    pub async fn configure(&mut self, input: impl Into<DescriptorInput>) -> Result<()> {
        self.build(input)?;

        self.state = SessionState::Persisting;
        match self.writer.write(&self.tree).await {
            Ok(()) => {
                self.state = SessionState::Done;
                info!(
                    "Configured {} ethernet(s), {} vlan(s), {} bridge(s)",
                    self.tree.ethernets.len(),
                    self.tree.vlans.len(),
                    self.tree.bridges.len()
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to persist network configuration: {}", e);
                self.state = SessionState::Failed;
                Err(NetcfgError::Persistence(e))
            }
        }
    }

    /// Current tree as a netplan YAML document
    pub fn render(&self) -> std::result::Result<String, PersistenceError> {
        self.tree.to_yaml()
    }

    /// Race the apply commands; does not change the session state
    pub async fn restart_service(&self) -> std::result::Result<CommandOutput, RestartError> {
        self.restarter.restart().await
    }
}
