//! Apply a record's own prefix lengths to its source and destination addresses.
//!
//! Two entry points share one policy: [`apply_net_mask_bits`] looks the groups
//! up on a record, [`set_net_mask_bits`] takes them explicitly.

use super::bits::{mask_ipv4, mask_ipv6};
use crate::models::{FlowAddr, FlowExtensions, FlowMisc, Ipv4Flow, Ipv6Flow};
use std::error::Error;
use std::fmt;
use std::ops::BitOr;

/// Which addresses of a record get masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NetBits(u8);

impl NetBits {
    pub const NONE: NetBits = NetBits(0);
    pub const SRC: NetBits = NetBits(1);
    pub const DST: NetBits = NetBits(2);
    pub const BOTH: NetBits = NetBits(3);

    /// Build from raw flag bits; only 0..=3 are valid.
    pub fn new(bits: u8) -> Result<NetBits, Box<dyn Error>> {
        if bits > Self::BOTH.0 {
            return Err(format!("Invalid net bits flags {bits}, expected 0..=3").into());
        }
        Ok(NetBits(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn src(self) -> bool {
        self.0 & Self::SRC.0 != 0
    }

    pub fn dst(self) -> bool {
        self.0 & Self::DST.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for NetBits {
    type Output = NetBits;

    fn bitor(self, rhs: NetBits) -> NetBits {
        NetBits(self.0 | rhs.0)
    }
}

impl fmt::Display for NetBits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match (self.src(), self.dst()) {
            (false, false) => "none",
            (true, false) => "src",
            (false, true) => "dst",
            (true, true) => "both",
        };
        write!(f, "{name}")
    }
}

fn mask_v4_flow(flow: &mut Ipv4Flow, src_mask: u8, dst_mask: u8, flags: NetBits) {
    if flags.src() {
        flow.src_addr = mask_ipv4(flow.src_addr, src_mask);
    }
    if flags.dst() {
        flow.dst_addr = mask_ipv4(flow.dst_addr, dst_mask);
    }
}

fn mask_v6_flow(flow: &mut Ipv6Flow, src_mask: u8, dst_mask: u8, flags: NetBits) {
    if flags.src() {
        flow.src_addr = mask_ipv6(flow.src_addr, src_mask);
    }
    if flags.dst() {
        flow.dst_addr = mask_ipv6(flow.dst_addr, dst_mask);
    }
}

/// Mask the addresses of `record` with the prefix lengths it carries.
///
/// A record without a [`FlowMisc`] group is masked with prefix length 0 in
/// both directions, which clears the selected addresses completely. A record
/// without an address group is left alone.
pub fn apply_net_mask_bits<R: FlowExtensions>(record: &mut R, flags: NetBits) {
    if flags.is_empty() {
        return;
    }
    let (src_mask, dst_mask) = record
        .flow_misc()
        .map(|misc| (misc.src_mask, misc.dst_mask))
        .unwrap_or((0, 0));

    match record.flow_addr_mut() {
        FlowAddr::Ipv4(flow) => mask_v4_flow(flow, src_mask, dst_mask, flags),
        FlowAddr::Ipv6(flow) => mask_v6_flow(flow, src_mask, dst_mask, flags),
        FlowAddr::None => log::trace!("apply_net_mask_bits: no address group"),
    }
}

/// Mask explicitly supplied address groups with the lengths in `misc`.
///
/// The IPv6 group wins when both are given; the IPv4 group is then neither
/// read nor written. An address group with a non-empty `flags` but no `misc`
/// is rejected before anything is modified.
pub fn set_net_mask_bits(
    ipv4: Option<&mut Ipv4Flow>,
    ipv6: Option<&mut Ipv6Flow>,
    misc: Option<&FlowMisc>,
    flags: NetBits,
) -> Result<(), Box<dyn Error>> {
    if flags.is_empty() {
        return Ok(());
    }

    if let Some(flow) = ipv6 {
        let misc = misc.ok_or("Mask lengths missing: IPv6 addresses given without misc fields")?;
        mask_v6_flow(flow, misc.src_mask, misc.dst_mask, flags);
    } else if let Some(flow) = ipv4 {
        let misc = misc.ok_or("Mask lengths missing: IPv4 addresses given without misc fields")?;
        mask_v4_flow(flow, misc.src_mask, misc.dst_mask, flags);
    }
    Ok(())
}
