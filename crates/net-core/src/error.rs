//! Error types for netcfg operations

use std::path::PathBuf;

use thiserror::Error;

/// Main error type returned by `configure` and friends
#[derive(Debug, Error)]
pub enum NetcfgError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Restart error: {0}")]
    Restart(#[from] RestartError),
}

/// Structural conflicts detected while ordering descriptors.
///
/// The display text of each variant is stable and relied upon by callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Can't have same VLAN ID on interface {interface}")]
    DuplicateVlanId { interface: String, vlanid: u16 },

    #[error("Interface \"{port}\" is bridged in \"{first}\" and \"{second}\"")]
    OverlappingBridgePort {
        port: String,
        first: String,
        second: String,
    },

    #[error("VLAN {vlanid} in \"{interface}\" cannot have bridged interfaces")]
    VlanWithBridgePorts { interface: String, vlanid: u16 },
}

/// Errors raised by the netplan store and the udev rule writer
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize network configuration: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

/// Failure of a single apply command
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Failed to execute '{command}': {message}")]
    Spawn { command: String, message: String },

    #[error("'{command}' exited with code {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("'{command}' timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },
}

impl CommandError {
    /// Command line that produced this error
    pub fn command(&self) -> &str {
        match self {
            CommandError::Spawn { command, .. }
            | CommandError::Failed { command, .. }
            | CommandError::Timeout { command, .. } => command,
        }
    }
}

/// Service restart errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RestartError {
    #[error("All restart commands failed, last error: {0}")]
    AllFailed(CommandError),

    #[error("No restart commands configured")]
    NoCandidates,
}

impl RestartError {
    /// The error of the last candidate to fail, if any ran
    pub fn last_failure(&self) -> Option<&CommandError> {
        match self {
            RestartError::AllFailed(err) => Some(err),
            RestartError::NoCandidates => None,
        }
    }
}
