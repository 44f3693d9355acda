//! Flow record processing.
//!
//! - [`aggr_key`] - parsing of aggregation key lists
//! - [`pipeline`] - masking and aggregation of record batches

mod aggr_key;
mod pipeline;

// Re-export public functions
pub use aggr_key::{parse_aggregation, AggregationSpec};
pub use pipeline::{aggregate_records, mask_records};
