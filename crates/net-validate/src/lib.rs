//! netcfg validation
//!
//! Classifies descriptors into physical, VLAN and bridge interfaces,
//! rejects structural conflicts and produces the processing order:
//! physical interfaces first, then VLANs, then bridges.

pub mod conflicts;
pub mod naming;

pub use conflicts::ConflictChecker;
pub use naming::VlanNamer;

use log::debug;
use netcfg_core::{
    DescriptorInput, InterfaceDescriptor, InterfaceKind, ValidatedInterface, ValidationError,
};

/// Orders and validates interface descriptors
pub struct InterfaceValidator {
    conflict_checker: ConflictChecker,
    namer: VlanNamer,
}

impl InterfaceValidator {
    /// Create new interface validator
    pub fn new() -> Self {
        Self {
            conflict_checker: ConflictChecker::new(),
            namer: VlanNamer::new(),
        }
    }

    /// Validate the batch and return it in processing order.
    ///
    /// Nothing is returned unless the whole batch is free of conflicts.
    pub fn order_and_validate(
        &self,
        input: impl Into<DescriptorInput>,
    ) -> Result<Vec<ValidatedInterface>, ValidationError> {
        let descriptors = input.into().into_vec();

        self.conflict_checker.check(&descriptors)?;

        let mut physical = Vec::new();
        let mut vlans = Vec::new();
        let mut bridges = Vec::new();

        for descriptor in descriptors {
            let validated = self.classify(descriptor);
            if validated.is_vlan() {
                vlans.push(validated);
            } else if validated.is_bridge() {
                bridges.push(validated);
            } else {
                physical.push(validated);
            }
        }

        debug!(
            "Ordered {} physical, {} vlan and {} bridge interfaces",
            physical.len(),
            vlans.len(),
            bridges.len()
        );

        physical.extend(vlans);
        physical.extend(bridges);
        Ok(physical)
    }

    /// Derive the kind of a conflict-free descriptor
    fn classify(&self, descriptor: InterfaceDescriptor) -> ValidatedInterface {
        let InterfaceDescriptor {
            interface,
            vlanid,
            bridge_ports,
            mac_address,
            ifname: _,
            fields,
        } = descriptor;

        let kind = match (vlanid, bridge_ports) {
            (Some(id), _) => InterfaceKind::Vlan {
                id,
                ifname: self.namer.ifname(&interface, id),
                link: interface.clone(),
            },
            (None, Some(ports)) => InterfaceKind::Bridge { ports },
            (None, None) => InterfaceKind::Physical,
        };

        ValidatedInterface {
            interface,
            kind,
            mac_address,
            fields,
        }
    }
}

impl Default for InterfaceValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Order and validate with a default validator
pub fn order_and_validate(
    input: impl Into<DescriptorInput>,
) -> Result<Vec<ValidatedInterface>, ValidationError> {
    InterfaceValidator::new().order_and_validate(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[ValidatedInterface]) -> Vec<String> {
        list.iter()
            .map(|v| v.ifname().unwrap_or(&v.interface).to_string())
            .collect()
    }

    #[test]
    fn test_physical_then_vlans_then_bridges() {
        let configs = vec![
            InterfaceDescriptor::new("eth0"),
            InterfaceDescriptor::new("eth0").with_vlan(10),
            InterfaceDescriptor::new("br0").with_bridge_ports(["eth0"]),
            InterfaceDescriptor::new("eth1"),
            InterfaceDescriptor::new("eth1").with_vlan(10),
        ];

        let ordered = order_and_validate(configs).unwrap();

        assert_eq!(
            names(&ordered),
            vec!["eth0", "eth1", "eth0.10", "eth1.10", "br0"]
        );
        assert!(ordered[0].is_physical());
        assert!(ordered[2].is_vlan());
        assert!(ordered[4].is_bridge());
        assert_eq!(
            ordered[4].kind,
            InterfaceKind::Bridge {
                ports: vec!["eth0".to_string()]
            }
        );
    }

    #[test]
    fn test_order_is_stable_within_kind() {
        let configs = vec![
            InterfaceDescriptor::new("br1").with_bridge_ports(["eth3"]),
            InterfaceDescriptor::new("eth9").with_vlan(5),
            InterfaceDescriptor::new("eth3"),
            InterfaceDescriptor::new("br0").with_bridge_ports(["eth2"]),
            InterfaceDescriptor::new("eth1").with_vlan(7),
            InterfaceDescriptor::new("eth2"),
        ];

        let ordered = order_and_validate(configs).unwrap();
        assert_eq!(
            names(&ordered),
            vec!["eth3", "eth2", "eth9.5", "eth1.7", "br1", "br0"]
        );
    }

    #[test]
    fn test_vlan_ifname() {
        let configs = vec![
            InterfaceDescriptor::new("eth0").with_vlan(10).with_field("dhcp", true),
            InterfaceDescriptor::new("enx00e04c534458")
                .with_vlan(10)
                .with_field("dhcp", true),
        ];

        let ordered = order_and_validate(configs).unwrap();

        assert_eq!(ordered[0].ifname(), Some("eth0.10"));
        assert_eq!(ordered[1].ifname(), Some("00e04c534458.10"));
        assert_eq!(
            ordered[1].kind,
            InterfaceKind::Vlan {
                id: 10,
                link: "enx00e04c534458".to_string(),
                ifname: "00e04c534458.10".to_string(),
            }
        );
        assert_eq!(ordered[1].fields["dhcp"], json!(true));
    }

    #[test]
    fn test_caller_ifname_is_replaced() {
        let ordered =
            order_and_validate(InterfaceDescriptor::new("eth0").with_vlan(10).with_ifname("x.1"))
                .unwrap();
        assert_eq!(ordered[0].ifname(), Some("eth0.10"));
    }

    #[test]
    fn test_single_descriptor_equals_list() {
        let eth0 = InterfaceDescriptor::new("eth0").with_field("ip_address", "10.0.0.1");

        let single = order_and_validate(eth0.clone()).unwrap();
        let list = order_and_validate(vec![eth0]).unwrap();

        assert_eq!(single, list);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].fields["ip_address"], json!("10.0.0.1"));
    }

    #[test]
    fn test_rejects_whole_batch() {
        let configs = vec![
            InterfaceDescriptor::new("eth0"),
            InterfaceDescriptor::new("eth0").with_vlan(10),
            InterfaceDescriptor::new("eth1"),
            InterfaceDescriptor::new("eth0").with_vlan(10),
        ];

        let err = order_and_validate(configs).unwrap_err();
        assert_eq!(err.to_string(), "Can't have same VLAN ID on interface eth0");
    }

    #[test]
    fn test_mac_address_carried() {
        let ordered = order_and_validate(
            InterfaceDescriptor::new("eth0").with_mac_address("00:11:22:33:44:55"),
        )
        .unwrap();
        assert_eq!(ordered[0].mac_address.as_deref(), Some("00:11:22:33:44:55"));
    }

    #[test]
    fn test_empty_batch() {
        assert!(order_and_validate(Vec::<InterfaceDescriptor>::new()).unwrap().is_empty());
    }
}
