//! Aggregation mask: zero every non-key word of a master record.

use super::bits::{cidr_mask_v4, cidr_mask_v6};
use crate::models::{MasterField, MasterRecord};

/// Address direction inside a master record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Src = 0,
    Dst = 1,
}

impl Dir {
    fn fields(self) -> (MasterField, MasterField) {
        match self {
            Dir::Src => (MasterField::SrcAddrHi, MasterField::SrcAddrLo),
            Dir::Dst => (MasterField::DstAddrHi, MasterField::DstAddrLo),
        }
    }
}

/// Template of [`MasterRecord`] shape; each word is a bitmask.
///
/// A set bit keeps the matching bit of the target record, a clear bit zeroes
/// it. Header and trailing fields of the template are ignored.
///
/// Address prefixes are family specific, so the mask carries one template for
/// IPv4 records and one for IPv6 records. Non-address words are identical in
/// both. While only one family has a prefix for a direction, the other
/// family's address is kept in full.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationMask {
    v4: MasterRecord,
    v6: MasterRecord,
    // directions with an explicit prefix, indexed by `Dir`
    v4_prefix: [bool; 2],
    v6_prefix: [bool; 2],
}

impl AggregationMask {
    /// A mask that zeroes every aggregated word.
    pub fn empty() -> Self {
        AggregationMask::default()
    }

    /// A mask that keeps every aggregated word.
    pub fn full() -> Self {
        let mut mask = AggregationMask::empty();
        for field in MasterField::ALL {
            mask.keep(field);
        }
        mask
    }

    /// Template applied to IPv6 records when `ipv6`, else to all others.
    pub fn template(&self, ipv6: bool) -> &MasterRecord {
        if ipv6 {
            &self.v6
        } else {
            &self.v4
        }
    }

    /// Mask word applied to IPv4 records and records without addresses.
    pub fn v4_word(&self, field: MasterField) -> u64 {
        self.v4.word(field)
    }

    /// Mask word applied to IPv6 records.
    pub fn v6_word(&self, field: MasterField) -> u64 {
        self.v6.word(field)
    }

    /// Keep `field` entirely, for both address families.
    pub fn keep(&mut self, field: MasterField) -> &mut Self {
        self.v4.set_word(field, u64::MAX);
        self.v6.set_word(field, u64::MAX);
        self
    }

    fn keep_prefix_v4(&mut self, dir: Dir, len: u8) -> &mut Self {
        let (hi, lo) = dir.fields();
        self.v4.set_word(hi, 0);
        self.v4.set_word(lo, cidr_mask_v4(len) as u64);
        self.v4_prefix[dir as usize] = true;
        if !self.v6_prefix[dir as usize] {
            self.v6.set_word(hi, u64::MAX);
            self.v6.set_word(lo, u64::MAX);
        }
        self
    }

    fn keep_prefix_v6(&mut self, dir: Dir, len: u8) -> &mut Self {
        let (hi, lo) = dir.fields();
        let [hi_mask, lo_mask] = cidr_mask_v6(len);
        self.v6.set_word(hi, hi_mask);
        self.v6.set_word(lo, lo_mask);
        self.v6_prefix[dir as usize] = true;
        if !self.v4_prefix[dir as usize] {
            self.v4.set_word(hi, u64::MAX);
            self.v4.set_word(lo, u64::MAX);
        }
        self
    }

    /// Keep the leading `len` bits of an IPv4 source address.
    pub fn keep_src_prefix_v4(&mut self, len: u8) -> &mut Self {
        self.keep_prefix_v4(Dir::Src, len)
    }

    /// Keep the leading `len` bits of an IPv4 destination address.
    pub fn keep_dst_prefix_v4(&mut self, len: u8) -> &mut Self {
        self.keep_prefix_v4(Dir::Dst, len)
    }

    /// Keep the leading `len` bits of an IPv6 source address.
    pub fn keep_src_prefix_v6(&mut self, len: u8) -> &mut Self {
        self.keep_prefix_v6(Dir::Src, len)
    }

    /// Keep the leading `len` bits of an IPv6 destination address.
    pub fn keep_dst_prefix_v6(&mut self, len: u8) -> &mut Self {
        self.keep_prefix_v6(Dir::Dst, len)
    }

    /// Fields with at least one bit kept in either family's template.
    pub fn key_fields(&self) -> Vec<MasterField> {
        MasterField::ALL
            .into_iter()
            .filter(|f| self.v4.word(*f) != 0 || self.v6.word(*f) != 0)
            .collect()
    }
}

/// AND every aggregated word of `record` with the matching word of `mask`.
///
/// The template is picked by the record's address family. Header and
/// trailing fields are never touched. Applying the same mask twice gives the
/// same result as applying it once.
pub fn apply_aggr_mask(record: &mut MasterRecord, mask: &AggregationMask) {
    let template = mask.template(record.is_ipv6());
    for field in MasterField::ALL {
        *record.word_mut(field) &= template.word(field);
    }
}
