//! Persistent net device naming rules

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;
use tokio::fs;

use netcfg_core::{PersistenceError, UdevRule};

/// Default persistent-net rules file
pub const UDEV_RULES_PATH: &str = "/etc/udev/rules.d/70-persistent-net.rules";

/// Sink for udev naming rules
#[async_trait]
pub trait UdevRuleWriter: Send + Sync {
    async fn write_rules(&self, rules: &[UdevRule]) -> Result<(), PersistenceError>;
}

/// Render rules as rules file content, one line per rule
pub fn render_rules(rules: &[UdevRule]) -> String {
    rules.iter().map(UdevRule::to_rule_line).collect()
}

/// Writes rules to a single rules file, replacing its content
#[derive(Debug, Clone)]
pub struct UdevRulesFile {
    path: PathBuf,
}

impl UdevRulesFile {
    pub fn new() -> Self {
        Self::with_path(UDEV_RULES_PATH)
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for UdevRulesFile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UdevRuleWriter for UdevRulesFile {
    async fn write_rules(&self, rules: &[UdevRule]) -> Result<(), PersistenceError> {
        // an empty set leaves any existing rules file untouched
        if rules.is_empty() {
            return Ok(());
        }

        fs::write(&self.path, render_rules(rules))
            .await
            .map_err(|source| PersistenceError::Write {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Wrote {} udev rule(s) to {}",
            rules.len(),
            self.path.display()
        );
        Ok(())
    }
}
