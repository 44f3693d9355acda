//! JSON flow record files.

use crate::models::FlowRecord;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// Contents of a flow record file.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct FlowData {
    /// Decoded flow records.
    pub records: Vec<FlowRecord>,
    /// Free-form description of where the records came from.
    #[serde(default)]
    pub source: Option<String>,
}

/// Parse flow records from a JSON string.
///
/// Errors name the JSON path of the offending field.
pub fn parse_flow_records(json: &str) -> Result<FlowData, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let data: FlowData = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing flow records: path={} error={}", e.path(), e))?;
    Ok(data)
}

/// Read flow records from a JSON file.
///
/// # Arguments
/// * `file` - Path to a `{"records": [...]}` JSON file
///
/// # Returns
/// * `Ok(FlowData)` - The parsed records
/// * `Err` - If the file does not exist, cannot be read or does not parse
pub fn read_flow_records(file: &str) -> Result<FlowData, Box<dyn Error>> {
    if !Path::new(file).exists() {
        return Err(format!("Flow record file does not exist: {file}").into());
    }
    log::info!("Reading flow records from: {file}");
    let json =
        std::fs::read_to_string(file).map_err(|e| format!("Error reading file {file}: {e}"))?;
    let data = parse_flow_records(&json).map_err(|e| format!("{file}: {e}"))?;
    log::info!("Got {} flow records from {file}", data.records.len());
    Ok(data)
}
