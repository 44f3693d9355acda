//! Bit masking of flow records.
//!
//! - [`bits`] - prefix masks for IPv4 and IPv6 addresses
//! - [`netmask`] - apply a record's own prefix lengths to its addresses
//! - [`aggregate`] - reduce a master record to its aggregation key

mod aggregate;
mod bits;
mod netmask;

// Re-export public functions
pub use aggregate::{apply_aggr_mask, AggregationMask};
pub use bits::{
    cidr_mask_v4, cidr_mask_v6, mask_ipv4, mask_ipv6, Ipv6Words, MAX_LENGTH_V4, MAX_LENGTH_V6,
};
pub use netmask::{apply_net_mask_bits, set_net_mask_bits, NetBits};
