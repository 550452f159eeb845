//! Writing a tree through the store and udev collaborators

use std::sync::Arc;

use log::debug;

use netcfg_core::PersistenceError;

use crate::store::ConfigStore;
use crate::tree::ConfigTree;
use crate::udev::UdevRuleWriter;

/// Persists config trees and their udev rules
#[derive(Clone)]
pub struct ConfigWriter {
    store: Arc<dyn ConfigStore>,
    udev: Arc<dyn UdevRuleWriter>,
}

impl ConfigWriter {
    pub fn new(store: Arc<dyn ConfigStore>, udev: Arc<dyn UdevRuleWriter>) -> Self {
        Self { store, udev }
    }

    /// Write the netplan document, then the udev rules for its ethernets.
    ///
    /// Errors from either collaborator are returned unchanged. The udev
    /// writer is not called when no ethernet carries a MAC address.
    pub async fn write(&self, tree: &ConfigTree) -> Result<(), PersistenceError> {
        let destination = self.store.destination().await?;
        let contents = tree.to_yaml()?;
        self.store.write_config(&destination, &contents).await?;

        let rules = tree.udev_rules();
        if rules.is_empty() {
            debug!("No udev rules to write");
            return Ok(());
        }

        self.udev.write_rules(&rules).await
    }
}
