//! Validate command

use anyhow::Result;
use netcfg_core::InterfaceKind;
use netcfg_validate::InterfaceValidator;
use std::path::Path;

use super::load_descriptors;

/// Validate command implementation
pub struct ValidateCommand {
    validator: InterfaceValidator,
}

impl ValidateCommand {
    /// Create new validate command
    pub fn new() -> Self {
        Self {
            validator: InterfaceValidator::new(),
        }
    }

    /// Execute validate command
    pub fn execute(&self, descriptor_path: &Path) -> Result<()> {
        println!("Validating interface descriptors: {}", descriptor_path.display());

        let input = load_descriptors(descriptor_path)?;
        let ordered = self.validator.order_and_validate(input)?;

        println!("✓ No conflicts found");
        println!("Processing order:");
        for interface in &ordered {
            match &interface.kind {
                InterfaceKind::Physical => println!("  - ethernet {}", interface.interface),
                InterfaceKind::Vlan { id, link, ifname } => {
                    println!("  - vlan {} (id {} on {})", ifname, id, link)
                }
                InterfaceKind::Bridge { ports } => {
                    println!("  - bridge {} [{}]", interface.interface, ports.join(", "))
                }
            }
        }

        Ok(())
    }
}

impl Default for ValidateCommand {
    fn default() -> Self {
        Self::new()
    }
}
