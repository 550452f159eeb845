//! netcfg configuration
//!
//! Builds the netplan configuration tree, selects the renderer and
//! persists the document together with udev naming rules.

pub mod backend;
pub mod persist;
pub mod settings;
pub mod store;
pub mod tree;
pub mod udev;

pub use backend::{set_backend, NETWORK_MANAGER_BACKEND, SYSTEMD_NETWORKD_BACKEND};
pub use persist::ConfigWriter;
pub use settings::{NetcfgSettings, SettingsError};
pub use store::{ConfigStore, NetplanDirStore};
pub use tree::{BridgeEntry, ConfigTree, VlanEntry};
pub use udev::{UdevRuleWriter, UdevRulesFile};
