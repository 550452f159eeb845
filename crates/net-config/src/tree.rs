//! Accumulated netplan configuration tree

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use netcfg_core::{
    FieldMap, InterfaceKind, PersistenceError, UdevRule, ValidatedInterface, NETPLAN_VERSION,
    SYSTEMD_NETWORKD_BACKEND,
};

/// Field name scanned for udev rules
pub const MAC_ADDRESS_FIELD: &str = "mac_address";

/// VLAN section entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VlanEntry {
    pub id: u16,
    pub link: String,
    #[serde(flatten)]
    pub fields: FieldMap,
}

/// Bridge section entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeEntry {
    pub ports: Vec<String>,
    #[serde(flatten)]
    pub fields: FieldMap,
}

/// The `network:` document built from validated interfaces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigTree {
    pub version: u8,
    pub renderer: String,
    pub ethernets: IndexMap<String, FieldMap>,
    pub vlans: IndexMap<String, VlanEntry>,
    pub bridges: IndexMap<String, BridgeEntry>,
}

#[derive(Serialize)]
struct NetplanDocument<'a> {
    network: &'a ConfigTree,
}

impl ConfigTree {
    /// Create an empty tree rendered by systemd-networkd
    pub fn new() -> Self {
        Self {
            version: NETPLAN_VERSION,
            renderer: SYSTEMD_NETWORKD_BACKEND.to_string(),
            ethernets: IndexMap::new(),
            vlans: IndexMap::new(),
            bridges: IndexMap::new(),
        }
    }

    /// Clear the interface sections, keeping renderer and version
    pub fn reset_sections(&mut self) {
        self.ethernets.clear();
        self.vlans.clear();
        self.bridges.clear();
    }

    /// Merge one validated interface into the section matching its kind.
    ///
    /// Later values win per field; list values replace earlier lists.
    pub fn apply(&mut self, interface: ValidatedInterface) {
        let ValidatedInterface {
            interface,
            kind,
            mac_address,
            fields,
        } = interface;

        match kind {
            InterfaceKind::Physical => {
                debug!("Merging ethernet {}", interface);
                let entry = self.ethernets.entry(interface).or_default();
                merge_fields(entry, mac_address, fields);
            }
            InterfaceKind::Vlan { id, link, ifname } => {
                debug!("Merging vlan {} (id {} on {})", ifname, id, link);
                let entry = self.vlans.entry(ifname).or_insert_with(|| VlanEntry {
                    id,
                    link: link.clone(),
                    fields: FieldMap::new(),
                });
                entry.id = id;
                entry.link = link;
                merge_fields(&mut entry.fields, mac_address, fields);
                strip_reserved(&interface, &mut entry.fields, &["id", "link"]);
            }
            InterfaceKind::Bridge { ports } => {
                debug!("Merging bridge {} with ports {:?}", interface, ports);
                let entry = self
                    .bridges
                    .entry(interface.clone())
                    .or_insert_with(|| BridgeEntry {
                        ports: Vec::new(),
                        fields: FieldMap::new(),
                    });
                entry.ports = ports;
                merge_fields(&mut entry.fields, mac_address, fields);
                strip_reserved(&interface, &mut entry.fields, &["ports"]);
            }
        }
    }

    /// Udev naming rules for every ethernet carrying a MAC address
    pub fn udev_rules(&self) -> Vec<UdevRule> {
        self.ethernets
            .iter()
            .filter_map(|(name, fields)| {
                fields
                    .get(MAC_ADDRESS_FIELD)
                    .and_then(Value::as_str)
                    .map(|mac| UdevRule::new(name.as_str(), mac))
            })
            .collect()
    }

    /// Render the tree as a netplan YAML document
    pub fn to_yaml(&self) -> Result<String, PersistenceError> {
        Ok(serde_yaml::to_string(&NetplanDocument { network: self })?)
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_fields(target: &mut FieldMap, mac_address: Option<String>, fields: FieldMap) {
    if let Some(mac) = mac_address {
        target.insert(MAC_ADDRESS_FIELD.to_string(), Value::String(mac));
    }
    for (key, value) in fields {
        target.insert(key, value);
    }
}

/// Drop pass-through keys that would shadow recorded entry fields
fn strip_reserved(interface: &str, fields: &mut FieldMap, reserved: &[&str]) {
    for key in reserved {
        if fields.shift_remove(*key).is_some() {
            warn!("Ignoring field '{}' on interface {}", key, interface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcfg_core::{InterfaceDescriptor, NETWORK_MANAGER_BACKEND};
    use netcfg_validate::order_and_validate;
    use serde_json::json;

    fn build(descriptors: Vec<InterfaceDescriptor>) -> ConfigTree {
        let mut tree = ConfigTree::new();
        for interface in order_and_validate(descriptors).unwrap() {
            tree.apply(interface);
        }
        tree
    }

    #[test]
    fn test_new_tree() {
        let tree = ConfigTree::new();
        assert_eq!(tree.version, 2);
        assert_eq!(tree.renderer, "networkd");
        assert!(tree.ethernets.is_empty());
    }

    #[test]
    fn test_sections_by_kind() {
        let tree = build(vec![
            InterfaceDescriptor::new("eth0").with_field("dhcp", true),
            InterfaceDescriptor::new("eth0").with_vlan(10).with_field("dhcp", false),
            InterfaceDescriptor::new("br0")
                .with_bridge_ports(["eth1"])
                .with_field("ip_address", "10.0.0.1"),
        ]);

        assert_eq!(tree.ethernets["eth0"]["dhcp"], json!(true));

        let vlan = &tree.vlans["eth0.10"];
        assert_eq!(vlan.id, 10);
        assert_eq!(vlan.link, "eth0");
        assert_eq!(vlan.fields["dhcp"], json!(false));

        let bridge = &tree.bridges["br0"];
        assert_eq!(bridge.ports, vec!["eth1".to_string()]);
        assert_eq!(bridge.fields["ip_address"], json!("10.0.0.1"));
    }

    #[test]
    fn test_last_write_wins() {
        let tree = build(vec![
            InterfaceDescriptor::new("eth0")
                .with_field("dhcp", true)
                .with_field("nameservers", json!(["1.1.1.1", "8.8.8.8"])),
            InterfaceDescriptor::new("eth0")
                .with_field("dhcp", false)
                .with_field("nameservers", json!(["9.9.9.9"])),
        ]);

        let eth0 = &tree.ethernets["eth0"];
        assert_eq!(eth0["dhcp"], json!(false));
        assert_eq!(eth0["nameservers"], json!(["9.9.9.9"]));
    }

    #[test]
    fn test_bridge_ports_replaced() {
        let mut tree =
            build(vec![InterfaceDescriptor::new("br0").with_bridge_ports(["eth0", "eth1"])]);
        for interface in
            order_and_validate(InterfaceDescriptor::new("br0").with_bridge_ports(["eth2"])).unwrap()
        {
            tree.apply(interface);
        }
        assert_eq!(tree.bridges["br0"].ports, vec!["eth2".to_string()]);
    }

    #[test]
    fn test_reserved_keys_dropped() {
        let tree = build(vec![InterfaceDescriptor::new("br0")
            .with_bridge_ports(["eth0"])
            .with_field("ports", json!(["eth9"]))]);
        assert!(!tree.bridges["br0"].fields.contains_key("ports"));
        assert_eq!(tree.bridges["br0"].ports, vec!["eth0".to_string()]);
    }

    #[test]
    fn test_reset_keeps_renderer() {
        let mut tree = build(vec![
            InterfaceDescriptor::new("eth0"),
            InterfaceDescriptor::new("eth0").with_vlan(10),
            InterfaceDescriptor::new("br0").with_bridge_ports(["eth0"]),
        ]);
        tree.renderer = NETWORK_MANAGER_BACKEND.to_string();

        tree.reset_sections();

        assert!(tree.ethernets.is_empty());
        assert!(tree.vlans.is_empty());
        assert!(tree.bridges.is_empty());
        assert_eq!(tree.renderer, "NetworkManager");
        assert_eq!(tree.version, 2);
    }

    #[test]
    fn test_udev_rules_from_ethernets() {
        let tree = build(vec![
            InterfaceDescriptor::new("eth0").with_mac_address("00:11:22:33:44:55"),
            InterfaceDescriptor::new("eth1"),
            InterfaceDescriptor::new("eth1")
                .with_vlan(10)
                .with_mac_address("66:77:88:99:aa:bb"),
        ]);

        assert_eq!(
            tree.udev_rules(),
            vec![UdevRule::new("eth0", "00:11:22:33:44:55")]
        );
    }

    #[test]
    fn test_no_udev_rules_without_mac() {
        let tree = build(vec![InterfaceDescriptor::new("eth0")]);
        assert!(tree.udev_rules().is_empty());
    }

    #[test]
    fn test_yaml_document_shape() {
        let tree = build(vec![
            InterfaceDescriptor::new("eth0").with_field("dhcp", true),
            InterfaceDescriptor::new("eth0").with_vlan(10),
            InterfaceDescriptor::new("br0").with_bridge_ports(["eth0"]),
        ]);

        let yaml = tree.to_yaml().unwrap();
        let document: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let network = &document["network"];

        assert_eq!(network["version"].as_u64(), Some(2));
        assert_eq!(network["renderer"], serde_yaml::Value::from("networkd"));
        assert_eq!(network["ethernets"]["eth0"]["dhcp"], serde_yaml::Value::from(true));
        assert_eq!(network["vlans"]["eth0.10"]["id"].as_u64(), Some(10));
        assert_eq!(network["vlans"]["eth0.10"]["link"], serde_yaml::Value::from("eth0"));
        assert_eq!(network["bridges"]["br0"]["ports"][0], serde_yaml::Value::from("eth0"));
    }
}
