//! Flow record and its optional extension groups.

use super::addr::{ipv6_to_words, v4_addr, v6_addr};
use crate::masking::Ipv6Words;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Stable identifiers of the optional field groups a [`FlowRecord`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtensionId {
    GenericFlow = 1,
    Ipv4Flow = 2,
    Ipv6Flow = 3,
    FlowMisc = 4,
    AsRouting = 5,
}

impl ExtensionId {
    pub const ALL: [ExtensionId; 5] = [
        ExtensionId::GenericFlow,
        ExtensionId::Ipv4Flow,
        ExtensionId::Ipv6Flow,
        ExtensionId::FlowMisc,
        ExtensionId::AsRouting,
    ];

    /// Bit of this extension in a record's extension map.
    pub fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Timestamps, ports, protocol and counters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GenericFlow {
    /// Flow start, milliseconds since the epoch.
    pub msec_first: u64,
    /// Flow end, milliseconds since the epoch.
    pub msec_last: u64,
    pub proto: u8,
    pub tcp_flags: u8,
    pub src_port: u16,
    pub dst_port: u16,
    pub in_packets: u64,
    pub in_bytes: u64,
}

/// IPv4 source and destination addresses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ipv4Flow {
    #[serde(with = "v4_addr")]
    pub src_addr: u32,
    #[serde(with = "v4_addr")]
    pub dst_addr: u32,
}

/// IPv6 source and destination addresses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ipv6Flow {
    #[serde(with = "v6_addr")]
    pub src_addr: Ipv6Words,
    #[serde(with = "v6_addr")]
    pub dst_addr: Ipv6Words,
}

/// Prefix lengths and interface data reported by the exporter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FlowMisc {
    /// Source prefix length in bits.
    pub src_mask: u8,
    /// Destination prefix length in bits.
    pub dst_mask: u8,
    pub input: u32,
    pub output: u32,
    pub dir: u8,
}

/// Source and destination autonomous system numbers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AsRouting {
    pub src_as: u32,
    pub dst_as: u32,
}

/// Address group of a record. A record carries at most one address family.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlowAddr {
    #[default]
    None,
    Ipv4(Ipv4Flow),
    Ipv6(Ipv6Flow),
}

impl FlowAddr {
    pub fn is_none(&self) -> bool {
        matches!(self, FlowAddr::None)
    }
}

/// Lookup of a record's extension groups by identifier.
pub trait FlowExtensions {
    /// Whether the group identified by `id` is present.
    fn has_extension(&self, id: ExtensionId) -> bool;
    fn ipv4_flow(&self) -> Option<&Ipv4Flow>;
    fn ipv6_flow(&self) -> Option<&Ipv6Flow>;
    fn flow_misc(&self) -> Option<&FlowMisc>;
    /// Mutable access to the address group, whichever family it is.
    fn flow_addr_mut(&mut self) -> &mut FlowAddr;
}

/// One observed network flow: optional extension groups plus trailing metadata.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<GenericFlow>,
    #[serde(default, skip_serializing_if = "FlowAddr::is_none")]
    pub addr: FlowAddr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc: Option<FlowMisc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_routing: Option<AsRouting>,
    /// Id of the exporter that sent this flow.
    #[serde(default)]
    pub exporter_id: u16,
    /// Time the collector received the flow, milliseconds since the epoch.
    #[serde(default)]
    pub received: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FlowRecord {
    /// Create a record carrying only IPv4 addresses.
    pub fn ipv4(src: Ipv4Addr, dst: Ipv4Addr) -> Self {
        FlowRecord {
            addr: FlowAddr::Ipv4(Ipv4Flow {
                src_addr: u32::from(src),
                dst_addr: u32::from(dst),
            }),
            ..Default::default()
        }
    }

    /// Create a record carrying only IPv6 addresses.
    pub fn ipv6(src: Ipv6Addr, dst: Ipv6Addr) -> Self {
        FlowRecord {
            addr: FlowAddr::Ipv6(Ipv6Flow {
                src_addr: ipv6_to_words(src),
                dst_addr: ipv6_to_words(dst),
            }),
            ..Default::default()
        }
    }

    /// Attach source and destination prefix lengths.
    pub fn with_masks(mut self, src_mask: u8, dst_mask: u8) -> Self {
        let misc = self.misc.get_or_insert_with(FlowMisc::default);
        misc.src_mask = src_mask;
        misc.dst_mask = dst_mask;
        self
    }

    pub fn with_generic(mut self, generic: GenericFlow) -> Self {
        self.generic = Some(generic);
        self
    }

    /// Bitmap of present extensions, see [`ExtensionId::bit`].
    pub fn ext_map(&self) -> u16 {
        ExtensionId::ALL
            .iter()
            .filter(|id| self.has_extension(**id))
            .fold(0, |map, id| map | id.bit())
    }
}

impl FlowExtensions for FlowRecord {
    fn has_extension(&self, id: ExtensionId) -> bool {
        match id {
            ExtensionId::GenericFlow => self.generic.is_some(),
            ExtensionId::Ipv4Flow => matches!(self.addr, FlowAddr::Ipv4(_)),
            ExtensionId::Ipv6Flow => matches!(self.addr, FlowAddr::Ipv6(_)),
            ExtensionId::FlowMisc => self.misc.is_some(),
            ExtensionId::AsRouting => self.as_routing.is_some(),
        }
    }

    fn ipv4_flow(&self) -> Option<&Ipv4Flow> {
        match &self.addr {
            FlowAddr::Ipv4(flow) => Some(flow),
            _ => None,
        }
    }

    fn ipv6_flow(&self) -> Option<&Ipv6Flow> {
        match &self.addr {
            FlowAddr::Ipv6(flow) => Some(flow),
            _ => None,
        }
    }

    fn flow_misc(&self) -> Option<&FlowMisc> {
        self.misc.as_ref()
    }

    fn flow_addr_mut(&mut self) -> &mut FlowAddr {
        &mut self.addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_extension() {
        let record = FlowRecord::ipv4(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 1, 1))
            .with_masks(24, 16);
        assert!(record.has_extension(ExtensionId::Ipv4Flow));
        assert!(record.has_extension(ExtensionId::FlowMisc));
        assert!(!record.has_extension(ExtensionId::Ipv6Flow));
        assert!(!record.has_extension(ExtensionId::GenericFlow));
        assert!(record.ipv6_flow().is_none());
        assert_eq!(record.flow_misc().map(|m| m.src_mask), Some(24));
    }

    #[test]
    fn test_ext_map() {
        let record = FlowRecord::ipv6(Ipv6Addr::LOCALHOST, Ipv6Addr::LOCALHOST).with_masks(64, 64);
        assert_eq!(
            record.ext_map(),
            ExtensionId::Ipv6Flow.bit() | ExtensionId::FlowMisc.bit()
        );
        assert_eq!(FlowRecord::default().ext_map(), 0);
    }

    #[test]
    fn test_deserialize_ipv4_record() {
        let json = r#"{
            "generic": {"proto": 6, "src_port": 443, "dst_port": 51000, "in_packets": 3},
            "addr": {"ipv4": {"src_addr": "192.168.1.130", "dst_addr": "10.1.2.3"}},
            "misc": {"src_mask": 24, "dst_mask": 8},
            "label": "web"
        }"#;
        let record: FlowRecord = serde_json::from_str(json).expect("Error parsing record");
        assert_eq!(record.ipv4_flow().map(|f| f.src_addr), Some(0xC0A80182));
        assert_eq!(record.generic.map(|g| g.src_port), Some(443));
        assert_eq!(record.generic.map(|g| g.in_bytes), Some(0));
        assert_eq!(record.label.as_deref(), Some("web"));
    }

    #[test]
    fn test_deserialize_ipv6_record() {
        let json = r#"{"addr": {"ipv6": {"src_addr": "2001:db8:0:1::abcd", "dst_addr": "::1"}}}"#;
        let record: FlowRecord = serde_json::from_str(json).expect("Error parsing record");
        let flow = record.ipv6_flow().expect("IPv6 group missing");
        assert_eq!(flow.src_addr, [0x2001_0db8_0000_0001, 0xabcd]);
        assert_eq!(flow.dst_addr, [0, 1]);
        assert!(record.misc.is_none());
    }

    #[test]
    fn test_deserialize_bad_address() {
        let json = r#"{"addr": {"ipv4": {"src_addr": "300.1.1.1", "dst_addr": "10.0.0.1"}}}"#;
        let err = serde_json::from_str::<FlowRecord>(json).unwrap_err();
        assert!(err.to_string().contains("invalid IPv4 address"));
    }

    #[test]
    fn test_serialize_skips_absent_groups() {
        let record = FlowRecord::ipv4(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        let json = serde_json::to_string(&record).expect("Error serializing record");
        assert!(json.contains(r#""src_addr":"10.0.0.1""#));
        assert!(!json.contains("misc"));
        assert!(!json.contains("generic"));
    }
}
