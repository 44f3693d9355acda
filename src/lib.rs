//! Subnet and aggregation-key masking of network flow records.
//!
//! - [`masking`] - prefix masks, record net-bits adapters and the aggregation mask
//! - [`models`] - flow records, extension groups and the master record layout
//! - [`processing`] - aggregation key parsing and batch masking
//! - [`source`] - JSON flow record files
//! - [`output`] - terminal and CSV output

pub mod config;
pub mod masking;
pub mod models;
pub mod output;
pub mod processing;
pub mod source;

use config::Config;
use models::MasterRecord;
use std::error::Error;

/// Masked records plus the aggregation keys that produced them.
#[derive(Debug, Default)]
pub struct MaskedRecords {
    pub records: Vec<MasterRecord>,
    pub keys: Vec<String>,
}

/// Read the configured record file and mask it.
///
/// # Returns
/// * `Ok(MaskedRecords)` - records after net bits and aggregation masking
/// * `Err` - if the file cannot be read or the aggregation keys do not parse
pub fn get_masked_records(config: &Config) -> Result<MaskedRecords, Box<dyn Error>> {
    let spec = config
        .aggregate
        .as_deref()
        .map(processing::parse_aggregation)
        .transpose()?;
    let data = source::read_flow_records(&config.input)?;
    if let Some(src) = &data.source {
        log::info!("Records source: {src}");
    }

    let records = processing::aggregate_records(data.records, spec.as_ref(), config.net_bits);
    Ok(MaskedRecords {
        records,
        keys: spec.map(|s| s.keys).unwrap_or_default(),
    })
}
