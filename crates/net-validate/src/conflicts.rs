//! Structural conflict detection across a descriptor batch

use std::collections::{HashMap, HashSet};

use netcfg_core::{InterfaceDescriptor, ValidationError};

/// Conflict checker for a batch of descriptors.
///
/// Descriptors are inspected in input order and the first conflict found
/// is returned. For each descriptor the VLAN/bridge combination is checked
/// first, then VLAN id uniqueness, then bridge port membership.
pub struct ConflictChecker {}

impl ConflictChecker {
    /// Create new conflict checker
    pub fn new() -> Self {
        Self {}
    }

    /// Check the whole batch
    pub fn check(&self, descriptors: &[InterfaceDescriptor]) -> Result<(), ValidationError> {
        let mut vlans: HashSet<(&str, u16)> = HashSet::new();
        // port -> first bridge that claimed it
        let mut bridged: HashMap<&str, &str> = HashMap::new();

        for descriptor in descriptors {
            Self::check_vlan_bridge(descriptor)?;

            if let Some(vlanid) = descriptor.vlanid {
                if !vlans.insert((descriptor.interface.as_str(), vlanid)) {
                    return Err(ValidationError::DuplicateVlanId {
                        interface: descriptor.interface.clone(),
                        vlanid,
                    });
                }
            }

            if let Some(ports) = &descriptor.bridge_ports {
                let bridge = descriptor.interface.as_str();
                for port in ports {
                    match bridged.get(port.as_str()) {
                        Some(owner) if *owner != bridge => {
                            return Err(ValidationError::OverlappingBridgePort {
                                port: port.clone(),
                                first: owner.to_string(),
                                second: bridge.to_string(),
                            });
                        }
                        Some(_) => {}
                        None => {
                            bridged.insert(port.as_str(), bridge);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// A VLAN cannot also be a bridge
    fn check_vlan_bridge(descriptor: &InterfaceDescriptor) -> Result<(), ValidationError> {
        match (descriptor.vlanid, &descriptor.bridge_ports) {
            (Some(vlanid), Some(_)) => Err(ValidationError::VlanWithBridgePorts {
                interface: descriptor.interface.clone(),
                vlanid,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for ConflictChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(name: &str) -> InterfaceDescriptor {
        InterfaceDescriptor::new(name)
    }

    #[test]
    fn test_no_conflicts() {
        let descriptors = vec![
            eth("eth0"),
            eth("eth0").with_vlan(10),
            eth("eth0").with_vlan(20),
            eth("eth1").with_vlan(10),
            eth("br0").with_bridge_ports(["eth2"]),
            eth("br1").with_bridge_ports(["eth3"]),
        ];
        assert!(ConflictChecker::new().check(&descriptors).is_ok());
    }

    #[test]
    fn test_duplicate_vlan_id() {
        let descriptors = vec![
            eth("eth0"),
            eth("eth0").with_vlan(10).with_ifname("eth0.1"),
            eth("eth1"),
            eth("eth0").with_vlan(10).with_ifname("eth0.1"),
        ];
        let err = ConflictChecker::new().check(&descriptors).unwrap_err();
        assert_eq!(err.to_string(), "Can't have same VLAN ID on interface eth0");
    }

    #[test]
    fn test_overlapping_bridge_ports() {
        let descriptors = vec![
            eth("br0").with_bridge_ports(["eth0"]).with_field("dhcp", true),
            eth("br1").with_bridge_ports(["eth0"]).with_field("dhcp", true),
            eth("eth1").with_field("dhcp", true),
        ];
        let err = ConflictChecker::new().check(&descriptors).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OverlappingBridgePort {
                port: "eth0".to_string(),
                first: "br0".to_string(),
                second: "br1".to_string(),
            }
        );
    }

    #[test]
    fn test_overlap_names_bridges_in_seen_order() {
        let descriptors = vec![
            eth("br1").with_bridge_ports(["eth5", "eth0"]),
            eth("br0").with_bridge_ports(["eth0"]),
        ];
        let err = ConflictChecker::new().check(&descriptors).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Interface "eth0" is bridged in "br1" and "br0""#
        );
    }

    #[test]
    fn test_port_repeated_in_same_bridge() {
        let descriptors = vec![eth("br0").with_bridge_ports(["eth0", "eth0"])];
        assert!(ConflictChecker::new().check(&descriptors).is_ok());
    }

    #[test]
    fn test_vlan_with_bridge_ports() {
        let descriptors = vec![
            eth("eth0").with_field("dhcp", true),
            eth("eth1")
                .with_vlan(10)
                .with_bridge_ports(["eth0"])
                .with_field("dhcp", true),
        ];
        let err = ConflictChecker::new().check(&descriptors).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"VLAN 10 in "eth1" cannot have bridged interfaces"#
        );
    }
}
