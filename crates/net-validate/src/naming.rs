//! VLAN device name derivation

use regex::Regex;

/// Derives VLAN device names from parent interface and tag
pub struct VlanNamer {
    /// Predictable USB NIC names, `enx` followed by the MAC in hex
    enx_regex: Regex,
}

impl VlanNamer {
    /// Create new VLAN namer
    pub fn new() -> Self {
        Self {
            enx_regex: Regex::new(r"^enx([0-9a-fA-F]+)$").expect("invalid enx pattern"),
        }
    }

    /// Base name used for VLAN devices on top of `interface`.
    ///
    /// `enx<hex>` interfaces use the hex token alone, which keeps the VLAN
    /// device name within the kernel's 15 character limit.
    pub fn base_name<'a>(&self, interface: &'a str) -> &'a str {
        match self.enx_regex.captures(interface).and_then(|c| c.get(1)) {
            Some(token) => token.as_str(),
            None => interface,
        }
    }

    /// VLAN device name for `interface` tagged with `vlanid`
    pub fn ifname(&self, interface: &str, vlanid: u16) -> String {
        format!("{}.{}", self.base_name(interface), vlanid)
    }
}

impl Default for VlanNamer {
    fn default() -> Self {
        Self::new()
    }
}
