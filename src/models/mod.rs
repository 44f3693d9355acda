//! Flow record data models.
//!
//! - [`FlowRecord`] - a flow with optional extension groups, looked up by [`ExtensionId`]
//! - [`MasterRecord`] - the fixed word layout records expand into for aggregation
//! - [`addr`] - address conversions and serde adapters

pub mod addr;
mod master;
mod record;

// Re-export public types
pub use master::{MasterField, MasterRecord, FLAG_IPV6_ADDR};
pub use record::{
    AsRouting, ExtensionId, FlowAddr, FlowExtensions, FlowMisc, FlowRecord, GenericFlow, Ipv4Flow,
    Ipv6Flow,
};
