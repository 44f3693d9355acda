//! Fixed-layout master record used as the aggregation key.
//!
//! A [`FlowRecord`] expands into a [`MasterRecord`]: a short header, a fixed
//! run of 64-bit words addressed by [`MasterField`], and trailing metadata.
//! Only the words take part in aggregation masking.

use super::addr::words_to_ipv6;
use super::record::{ExtensionId, FlowAddr, FlowExtensions, FlowRecord};
use serde::{Serialize, Serializer};
use std::net::{IpAddr, Ipv4Addr};

/// Header flag: address words hold an IPv6 address.
pub const FLAG_IPV6_ADDR: u16 = 0x1;

/// The aggregated 64-bit words of a [`MasterRecord`], in layout order.
///
/// IPv4 addresses live in the low 32 bits of the `*AddrLo` word with the
/// matching `*AddrHi` word set to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MasterField {
    First,
    Last,
    Proto,
    TcpFlags,
    SrcPort,
    DstPort,
    Input,
    Output,
    SrcAs,
    DstAs,
    SrcAddrHi,
    SrcAddrLo,
    DstAddrHi,
    DstAddrLo,
    SrcMask,
    DstMask,
    Packets,
    Bytes,
}

impl MasterField {
    /// Number of aggregated words.
    pub const COUNT: usize = 18;

    pub const ALL: [MasterField; MasterField::COUNT] = [
        MasterField::First,
        MasterField::Last,
        MasterField::Proto,
        MasterField::TcpFlags,
        MasterField::SrcPort,
        MasterField::DstPort,
        MasterField::Input,
        MasterField::Output,
        MasterField::SrcAs,
        MasterField::DstAs,
        MasterField::SrcAddrHi,
        MasterField::SrcAddrLo,
        MasterField::DstAddrHi,
        MasterField::DstAddrLo,
        MasterField::SrcMask,
        MasterField::DstMask,
        MasterField::Packets,
        MasterField::Bytes,
    ];

    /// Position of this field in the word sequence.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            MasterField::First => "first",
            MasterField::Last => "last",
            MasterField::Proto => "proto",
            MasterField::TcpFlags => "tcp_flags",
            MasterField::SrcPort => "src_port",
            MasterField::DstPort => "dst_port",
            MasterField::Input => "input",
            MasterField::Output => "output",
            MasterField::SrcAs => "src_as",
            MasterField::DstAs => "dst_as",
            MasterField::SrcAddrHi => "src_addr_hi",
            MasterField::SrcAddrLo => "src_addr_lo",
            MasterField::DstAddrHi => "dst_addr_hi",
            MasterField::DstAddrLo => "dst_addr_lo",
            MasterField::SrcMask => "src_mask",
            MasterField::DstMask => "dst_mask",
            MasterField::Packets => "packets",
            MasterField::Bytes => "bytes",
        }
    }
}

/// Flow record expanded into a fixed sequence of named 64-bit words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MasterRecord {
    /// Header flags, see [`FLAG_IPV6_ADDR`].
    pub flags: u16,
    /// Extensions present in the source record.
    pub ext_map: u16,
    pub exporter_id: u16,
    words: [u64; MasterField::COUNT],
    /// Collector receive time, never aggregated.
    pub received: u64,
    /// Free-form label, never aggregated.
    pub label: Option<String>,
}

impl MasterRecord {
    pub fn word(&self, field: MasterField) -> u64 {
        self.words[field.index()]
    }

    pub fn word_mut(&mut self, field: MasterField) -> &mut u64 {
        &mut self.words[field.index()]
    }

    pub fn set_word(&mut self, field: MasterField, value: u64) {
        self.words[field.index()] = value;
    }

    /// Iterate `(field, value)` pairs in layout order.
    pub fn words(&self) -> impl Iterator<Item = (MasterField, u64)> + '_ {
        MasterField::ALL
            .into_iter()
            .map(move |f| (f, self.word(f)))
    }

    pub fn is_ipv6(&self) -> bool {
        self.flags & FLAG_IPV6_ADDR != 0
    }

    fn has_addr(&self) -> bool {
        self.ext_map & (ExtensionId::Ipv4Flow.bit() | ExtensionId::Ipv6Flow.bit()) != 0
    }

    fn addr(&self, hi: MasterField, lo: MasterField) -> Option<IpAddr> {
        if !self.has_addr() {
            return None;
        }
        if self.is_ipv6() {
            Some(IpAddr::V6(words_to_ipv6([self.word(hi), self.word(lo)])))
        } else {
            Some(IpAddr::V4(Ipv4Addr::from(self.word(lo) as u32)))
        }
    }

    /// Source address, `None` when the record carried no address group.
    pub fn src_addr(&self) -> Option<IpAddr> {
        self.addr(MasterField::SrcAddrHi, MasterField::SrcAddrLo)
    }

    /// Destination address, `None` when the record carried no address group.
    pub fn dst_addr(&self) -> Option<IpAddr> {
        self.addr(MasterField::DstAddrHi, MasterField::DstAddrLo)
    }
}

impl From<&FlowRecord> for MasterRecord {
    fn from(record: &FlowRecord) -> Self {
        let mut master = MasterRecord {
            ext_map: record.ext_map(),
            exporter_id: record.exporter_id,
            received: record.received,
            label: record.label.clone(),
            ..Default::default()
        };

        if let Some(g) = &record.generic {
            master.set_word(MasterField::First, g.msec_first);
            master.set_word(MasterField::Last, g.msec_last);
            master.set_word(MasterField::Proto, g.proto as u64);
            master.set_word(MasterField::TcpFlags, g.tcp_flags as u64);
            master.set_word(MasterField::SrcPort, g.src_port as u64);
            master.set_word(MasterField::DstPort, g.dst_port as u64);
            master.set_word(MasterField::Packets, g.in_packets);
            master.set_word(MasterField::Bytes, g.in_bytes);
        }

        match &record.addr {
            FlowAddr::Ipv4(flow) => {
                master.set_word(MasterField::SrcAddrLo, flow.src_addr as u64);
                master.set_word(MasterField::DstAddrLo, flow.dst_addr as u64);
            }
            FlowAddr::Ipv6(flow) => {
                master.flags |= FLAG_IPV6_ADDR;
                master.set_word(MasterField::SrcAddrHi, flow.src_addr[0]);
                master.set_word(MasterField::SrcAddrLo, flow.src_addr[1]);
                master.set_word(MasterField::DstAddrHi, flow.dst_addr[0]);
                master.set_word(MasterField::DstAddrLo, flow.dst_addr[1]);
            }
            FlowAddr::None => {}
        }

        if let Some(misc) = record.flow_misc() {
            master.set_word(MasterField::SrcMask, misc.src_mask as u64);
            master.set_word(MasterField::DstMask, misc.dst_mask as u64);
            master.set_word(MasterField::Input, misc.input as u64);
            master.set_word(MasterField::Output, misc.output as u64);
        }

        if let Some(as_routing) = &record.as_routing {
            master.set_word(MasterField::SrcAs, as_routing.src_as as u64);
            master.set_word(MasterField::DstAs, as_routing.dst_as as u64);
        }

        master
    }
}

impl Serialize for MasterRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        if let Some(src) = self.src_addr() {
            map.serialize_entry("src_addr", &src.to_string())?;
        }
        if let Some(dst) = self.dst_addr() {
            map.serialize_entry("dst_addr", &dst.to_string())?;
        }
        for (field, value) in self.words() {
            match field {
                MasterField::SrcAddrHi
                | MasterField::SrcAddrLo
                | MasterField::DstAddrHi
                | MasterField::DstAddrLo => {}
                _ => map.serialize_entry(field.name(), &value)?,
            }
        }
        if let Some(label) = &self.label {
            map.serialize_entry("label", label)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AsRouting, GenericFlow};
    use std::net::Ipv6Addr;

    #[test]
    fn test_field_order() {
        for (i, field) in MasterField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i, "field {} out of order", field.name());
        }
    }

    #[test]
    fn test_from_ipv4_record() {
        let mut record =
            FlowRecord::ipv4(Ipv4Addr::new(192, 168, 1, 130), Ipv4Addr::new(10, 0, 0, 1))
                .with_masks(24, 8)
                .with_generic(GenericFlow {
                    proto: 17,
                    src_port: 53,
                    dst_port: 40000,
                    in_packets: 2,
                    in_bytes: 120,
                    ..Default::default()
                });
        record.as_routing = Some(AsRouting {
            src_as: 64512,
            dst_as: 65000,
        });
        record.received = 99;

        let master = MasterRecord::from(&record);
        assert!(!master.is_ipv6());
        assert_eq!(master.word(MasterField::SrcAddrHi), 0);
        assert_eq!(master.word(MasterField::SrcAddrLo), 0xC0A80182);
        assert_eq!(master.word(MasterField::Proto), 17);
        assert_eq!(master.word(MasterField::DstPort), 40000);
        assert_eq!(master.word(MasterField::SrcMask), 24);
        assert_eq!(master.word(MasterField::DstAs), 65000);
        assert_eq!(master.received, 99);
        assert_eq!(
            master.src_addr(),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 130)))
        );
    }

    #[test]
    fn test_from_ipv6_record() {
        let src: Ipv6Addr = "2001:db8:0:1::abcd".parse().unwrap();
        let record = FlowRecord::ipv6(src, Ipv6Addr::LOCALHOST);
        let master = MasterRecord::from(&record);
        assert!(master.is_ipv6());
        assert_eq!(master.word(MasterField::SrcAddrHi), 0x2001_0db8_0000_0001);
        assert_eq!(master.word(MasterField::SrcAddrLo), 0xabcd);
        assert_eq!(master.dst_addr(), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        assert_eq!(master.word(MasterField::SrcMask), 0);
    }

    #[test]
    fn test_from_record_without_address() {
        let master = MasterRecord::from(&FlowRecord::default());
        assert_eq!(master.src_addr(), None);
        assert!(master.words().all(|(_, v)| v == 0));
    }

    #[test]
    fn test_serialize_master() {
        let record = FlowRecord::ipv4(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2));
        let json = serde_json::to_value(MasterRecord::from(&record)).unwrap();
        assert_eq!(json["src_addr"], "10.0.0.1");
        assert_eq!(json["proto"], 0);
        assert!(json.get("src_addr_lo").is_none());
    }
}
