//! Interface descriptors as supplied by callers and as enriched by validation

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Ordered map of pass-through fields (`dhcp`, `ip_address`, ...)
pub type FieldMap = IndexMap<String, Value>;

/// Caller-supplied description of one desired network interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    /// Interface name, the stable identity of the descriptor
    pub interface: String,
    /// VLAN tag, makes this descriptor a VLAN on top of `interface`
    #[serde(
        default,
        deserialize_with = "deserialize_vlanid",
        skip_serializing_if = "Option::is_none"
    )]
    pub vlanid: Option<u16>,
    /// Bridge members, makes this descriptor a bridge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_ports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    /// Accepted on input and ignored, the VLAN name is always derived
    #[serde(default, skip_serializing)]
    pub ifname: Option<String>,
    /// Everything else, kept verbatim
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl InterfaceDescriptor {
    /// Create a physical interface descriptor
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            vlanid: None,
            bridge_ports: None,
            mac_address: None,
            ifname: None,
            fields: FieldMap::new(),
        }
    }

    /// Set VLAN tag
    pub fn with_vlan(mut self, vlanid: u16) -> Self {
        self.vlanid = Some(vlanid);
        self
    }

    /// Set bridge ports
    pub fn with_bridge_ports<I, S>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bridge_ports = Some(ports.into_iter().map(Into::into).collect());
        self
    }

    /// Set MAC address
    pub fn with_mac_address(mut self, mac: impl Into<String>) -> Self {
        self.mac_address = Some(mac.into());
        self
    }

    /// Set a caller-side ifname (discarded during validation)
    pub fn with_ifname(mut self, ifname: impl Into<String>) -> Self {
        self.ifname = Some(ifname.into());
        self
    }

    /// Add pass-through field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// VLAN tags are positive
fn deserialize_vlanid<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u16>::deserialize(deserializer)? {
        Some(0) => Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(0),
            &"a positive VLAN id",
        )),
        vlanid => Ok(vlanid),
    }
}

/// One descriptor or a list of them
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DescriptorInput {
    Many(Vec<InterfaceDescriptor>),
    One(InterfaceDescriptor),
}

impl DescriptorInput {
    /// Flatten into a list, a single descriptor becomes a one-element list
    pub fn into_vec(self) -> Vec<InterfaceDescriptor> {
        match self {
            DescriptorInput::Many(list) => list,
            DescriptorInput::One(descriptor) => vec![descriptor],
        }
    }
}

impl From<InterfaceDescriptor> for DescriptorInput {
    fn from(descriptor: InterfaceDescriptor) -> Self {
        DescriptorInput::One(descriptor)
    }
}

impl From<Vec<InterfaceDescriptor>> for DescriptorInput {
    fn from(list: Vec<InterfaceDescriptor>) -> Self {
        DescriptorInput::Many(list)
    }
}

impl<const N: usize> From<[InterfaceDescriptor; N]> for DescriptorInput {
    fn from(list: [InterfaceDescriptor; N]) -> Self {
        DescriptorInput::Many(list.into())
    }
}

/// Interface kind derived from the descriptor fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceKind {
    Physical,
    Vlan {
        id: u16,
        /// Parent interface
        link: String,
        /// Derived VLAN device name
        ifname: String,
    },
    Bridge {
        ports: Vec<String>,
    },
}

/// A descriptor that passed validation, with its kind and derived names
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInterface {
    pub interface: String,
    pub kind: InterfaceKind,
    pub mac_address: Option<String>,
    pub fields: FieldMap,
}

impl ValidatedInterface {
    /// Derived VLAN device name, `None` for other kinds
    pub fn ifname(&self) -> Option<&str> {
        match &self.kind {
            InterfaceKind::Vlan { ifname, .. } => Some(ifname),
            _ => None,
        }
    }

    pub fn is_physical(&self) -> bool {
        matches!(self.kind, InterfaceKind::Physical)
    }

    pub fn is_vlan(&self) -> bool {
        matches!(self.kind, InterfaceKind::Vlan { .. })
    }

    pub fn is_bridge(&self) -> bool {
        matches!(self.kind, InterfaceKind::Bridge { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_pass_through_fields() {
        let descriptor: InterfaceDescriptor = serde_json::from_value(json!({
            "interface": "eth0",
            "dhcp": true,
            "ip_address": "10.0.0.1",
            "mac_address": "00:11:22:33:44:55"
        }))
        .unwrap();

        assert_eq!(descriptor.interface, "eth0");
        assert_eq!(descriptor.mac_address.as_deref(), Some("00:11:22:33:44:55"));
        assert_eq!(descriptor.fields.get("dhcp"), Some(&json!(true)));
        assert_eq!(descriptor.fields.get("ip_address"), Some(&json!("10.0.0.1")));
        assert!(!descriptor.fields.contains_key("interface"));
    }

    #[test]
    fn test_caller_ifname_not_in_fields() {
        let descriptor: InterfaceDescriptor = serde_json::from_value(json!({
            "interface": "eth0",
            "vlanid": 10,
            "ifname": "eth0.1"
        }))
        .unwrap();

        assert_eq!(descriptor.vlanid, Some(10));
        assert_eq!(descriptor.ifname.as_deref(), Some("eth0.1"));
        assert!(descriptor.fields.is_empty());
    }

    #[test]
    fn test_zero_vlanid_is_rejected() {
        let result = serde_json::from_value::<InterfaceDescriptor>(json!({
            "interface": "eth0",
            "vlanid": 0
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<DescriptorInput>(json!([
            { "interface": "eth0" },
            { "interface": "eth0", "vlanid": 0 }
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_vlanid_null_is_none() {
        let descriptor: InterfaceDescriptor =
            serde_json::from_value(json!({ "interface": "eth0", "vlanid": null })).unwrap();
        assert_eq!(descriptor.vlanid, None);
        assert!(descriptor.fields.is_empty());
    }

    #[test]
    fn test_missing_interface_is_rejected() {
        let result = serde_json::from_value::<InterfaceDescriptor>(json!({ "dhcp": true }));
        assert!(result.is_err());
    }

    #[test]
    fn test_input_single_or_list() {
        let one: DescriptorInput = serde_json::from_value(json!({ "interface": "eth0" })).unwrap();
        let many: DescriptorInput =
            serde_json::from_value(json!([{ "interface": "eth0" }])).unwrap();

        assert_eq!(one.into_vec(), many.into_vec());
    }

    #[test]
    fn test_builder() {
        let descriptor = InterfaceDescriptor::new("br0")
            .with_bridge_ports(["eth0", "eth1"])
            .with_field("dhcp", true);

        assert_eq!(
            descriptor.bridge_ports,
            Some(vec!["eth0".to_string(), "eth1".to_string()])
        );
        assert_eq!(descriptor.fields["dhcp"], json!(true));
    }
}
