//! Aggregation key parsing.
//!
//! Turns a key list such as `"proto,srcip4/24,dstport"` into an
//! [`AggregationMask`] plus the [`NetBits`] needed for `srcnet`/`dstnet`.

use crate::masking::{AggregationMask, NetBits, MAX_LENGTH_V4, MAX_LENGTH_V6};
use crate::models::MasterField;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::error::Error;

lazy_static! {
    static ref AGGR_KEY_RE: Regex =
        Regex::new(r"^(?P<name>[a-z]+)(?P<family>[46])?(?:/(?P<len>\d+))?$")
            .expect("Invalid Regex?");
}

/// Parsed aggregation keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationSpec {
    /// Template applied to every expanded record.
    pub mask: AggregationMask,
    /// Record prefix lengths to apply before the template (`srcnet`/`dstnet`).
    pub net_bits: NetBits,
    /// Normalised keys in the order given.
    pub keys: Vec<String>,
}

/// Map a plain key to the word it keeps.
fn word_key(name: &str) -> Option<MasterField> {
    match name {
        "proto" => Some(MasterField::Proto),
        "tcpflags" => Some(MasterField::TcpFlags),
        "srcport" => Some(MasterField::SrcPort),
        "dstport" => Some(MasterField::DstPort),
        "inif" => Some(MasterField::Input),
        "outif" => Some(MasterField::Output),
        "srcas" => Some(MasterField::SrcAs),
        "dstas" => Some(MasterField::DstAs),
        _ => None,
    }
}

/// Prefix length of an address key; a missing length keeps the full address.
fn prefix_len(key: &str, len: Option<u8>, max: u8) -> Result<u8, Box<dyn Error>> {
    let len = len.unwrap_or(max);
    if len > max {
        Err(format!("Prefix length /{len} out of range in '{key}', max /{max}").into())
    } else {
        Ok(len)
    }
}

/// Parse a comma separated aggregation key list.
///
/// # Arguments
/// * `spec` - keys such as `proto`, `srcport`, `srcip`, `dstip6/64`, `srcnet`
///
/// # Returns
/// * `Ok(AggregationSpec)` - the template and net bits for the keys
/// * `Err` - on an empty list, unknown, duplicate or malformed key
///
/// # Examples
/// ```
/// use flow_netmask::models::MasterField;
/// use flow_netmask::processing::parse_aggregation;
/// let spec = parse_aggregation("srcip4/24,dstport").unwrap();
/// assert_eq!(spec.mask.v4_word(MasterField::SrcAddrLo), 0xFFFFFF00);
/// assert_eq!(spec.mask.v6_word(MasterField::SrcAddrLo), u64::MAX);
/// ```
pub fn parse_aggregation(spec: &str) -> Result<AggregationSpec, Box<dyn Error>> {
    let mut mask = AggregationMask::empty();
    let mut net_bits = NetBits::NONE;
    let mut keys = Vec::new();
    let mut seen = HashSet::new();

    for raw in spec.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        let key = raw.to_lowercase();
        let caps = AGGR_KEY_RE
            .captures(&key)
            .ok_or_else(|| format!("Invalid aggregation key '{raw}'"))?;
        let name = caps.name("name").map_or("", |m| m.as_str());
        let family = caps.name("family").map(|m| m.as_str());
        let len = caps
            .name("len")
            .map(|m| m.as_str().parse::<u8>())
            .transpose()
            .map_err(|e| format!("Invalid prefix length in '{raw}': {e}"))?;

        // address keys claim one slot per family: srcip4/N and srcip6/N
        // may be combined, srcip and srcnet take both
        let slots: Vec<String> = match (name, family) {
            ("srcip" | "dstip", Some(family)) => vec![format!("{}addr{family}", &name[..3])],
            ("srcip" | "srcnet", None) => vec!["srcaddr4".into(), "srcaddr6".into()],
            ("dstip" | "dstnet", None) => vec!["dstaddr4".into(), "dstaddr6".into()],
            (other, _) => vec![other.to_string()],
        };
        if slots.iter().any(|slot| seen.contains(slot)) {
            return Err(format!("Duplicate aggregation key '{raw}'").into());
        }
        seen.extend(slots);

        match (name, family, len) {
            ("srcip", None, None) => {
                mask.keep(MasterField::SrcAddrHi).keep(MasterField::SrcAddrLo);
            }
            ("dstip", None, None) => {
                mask.keep(MasterField::DstAddrHi).keep(MasterField::DstAddrLo);
            }
            ("srcip", Some("4"), len) => {
                mask.keep_src_prefix_v4(prefix_len(raw, len, MAX_LENGTH_V4)?);
            }
            ("dstip", Some("4"), len) => {
                mask.keep_dst_prefix_v4(prefix_len(raw, len, MAX_LENGTH_V4)?);
            }
            ("srcip", Some("6"), len) => {
                mask.keep_src_prefix_v6(prefix_len(raw, len, MAX_LENGTH_V6)?);
            }
            ("dstip", Some("6"), len) => {
                mask.keep_dst_prefix_v6(prefix_len(raw, len, MAX_LENGTH_V6)?);
            }
            ("srcnet", None, None) => {
                mask.keep(MasterField::SrcAddrHi).keep(MasterField::SrcAddrLo);
                net_bits = net_bits | NetBits::SRC;
            }
            ("dstnet", None, None) => {
                mask.keep(MasterField::DstAddrHi).keep(MasterField::DstAddrLo);
                net_bits = net_bits | NetBits::DST;
            }
            (name, None, None) => {
                let field =
                    word_key(name).ok_or_else(|| format!("Unknown aggregation key '{raw}'"))?;
                mask.keep(field);
            }
            _ => return Err(format!("Invalid aggregation key '{raw}'").into()),
        }
        keys.push(key);
    }

    if keys.is_empty() {
        return Err("Empty aggregation key list".into());
    }

    log::debug!(
        "parse_aggregation('{spec}') keys={:?} net_bits={net_bits}",
        keys
    );
    Ok(AggregationSpec {
        mask,
        net_bits,
        keys,
    })
}
