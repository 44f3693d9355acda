//! Loading of decoded flow records.
//!
//! - [`json`] - JSON record files

mod json;

pub use json::{parse_flow_records, read_flow_records, FlowData};
