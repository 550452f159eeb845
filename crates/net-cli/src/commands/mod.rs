//! CLI commands

pub mod configure;
pub mod restart;
pub mod validate;

pub use configure::{ConfigureCommand, ConfigureOptions};
pub use restart::RestartCommand;
pub use validate::ValidateCommand;

use anyhow::{Context, Result};
use netcfg_core::DescriptorInput;
use std::fs;
use std::path::Path;

/// Read a JSON descriptor file holding one descriptor or a list of them
pub fn load_descriptors(path: &Path) -> Result<DescriptorInput> {
    if !path.exists() {
        anyhow::bail!("Descriptor file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse descriptor file: {}", path.display()))
}
