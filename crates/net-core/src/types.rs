//! Backend tokens and udev naming rules

use serde::{Deserialize, Serialize};

/// Renderer token for NetworkManager
pub const NETWORK_MANAGER_BACKEND: &str = "NetworkManager";

/// Renderer token for systemd-networkd
pub const SYSTEMD_NETWORKD_BACKEND: &str = "networkd";

/// Netplan document version
pub const NETPLAN_VERSION: u8 = 2;

/// Persistent device-naming rule binding a MAC address to an interface name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdevRule {
    pub name: String,
    pub mac: String,
}

impl UdevRule {
    pub fn new(name: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mac: mac.into(),
        }
    }

    /// Render as a newline-terminated rules file line
    pub fn to_rule_line(&self) -> String {
        format!(
            "SUBSYSTEM==\"net\", ACTION==\"add\", ATTR{{address}}==\"{}\", NAME=\"{}\"\n",
            self.mac, self.name
        )
    }
}
