//! Runtime settings: file locations and restart commands

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{DEFAULT_NETPLAN_FILE, NETPLAN_DIR};
use crate::udev::UDEV_RULES_PATH;

/// Apply commands raced by `restart_service`, in launch order
pub const DEFAULT_RESTART_COMMANDS: &[&str] = &[
    "netplan apply",
    "systemctl restart systemd-networkd",
    "systemctl restart NetworkManager",
];

/// Per-command timeout in seconds
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// netcfg settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetcfgSettings {
    /// Directory holding the netplan document
    pub netplan_dir: PathBuf,
    /// File name used when the directory is empty
    pub netplan_file: String,
    /// Persistent net rules file
    pub udev_rules_path: PathBuf,
    /// Candidate apply commands
    pub restart_commands: Vec<String>,
    pub command_timeout_secs: u64,
}

impl Default for NetcfgSettings {
    fn default() -> Self {
        Self {
            netplan_dir: PathBuf::from(NETPLAN_DIR),
            netplan_file: DEFAULT_NETPLAN_FILE.to_string(),
            udev_rules_path: PathBuf::from(UDEV_RULES_PATH),
            restart_commands: DEFAULT_RESTART_COMMANDS
                .iter()
                .map(|cmd| cmd.to_string())
                .collect(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl NetcfgSettings {
    /// Load settings from file, with `NETCFG_*` environment overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("NETCFG").try_parsing(true))
            .build()?;

        let settings: NetcfgSettings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the standard locations, falling back to defaults
    pub fn load_with_defaults() -> Result<Self, SettingsError> {
        let settings_paths = ["/etc/netcfg/netcfg.toml", "./netcfg.toml"];

        for path in settings_paths {
            if Path::new(path).exists() {
                match Self::load_from_file(path) {
                    Ok(settings) => return Ok(settings),
                    Err(e) => {
                        log::warn!("Failed to load settings from {}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.netplan_file.is_empty() {
            return Err(SettingsError::Invalid(
                "netplan_file must not be empty".to_string(),
            ));
        }
        if self.command_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "command_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
