//! Batch masking of loaded flow records.

use super::aggr_key::AggregationSpec;
use crate::masking::{apply_aggr_mask, apply_net_mask_bits, NetBits};
use crate::models::{FlowRecord, MasterRecord};

/// Apply each record's own prefix lengths to its addresses.
///
/// # Returns
/// Number of records that carried an address group.
pub fn mask_records(records: &mut [FlowRecord], flags: NetBits) -> usize {
    let mut masked = 0;
    for record in records.iter_mut() {
        if record.addr.is_none() {
            continue;
        }
        if record.misc.is_none() && !flags.is_empty() {
            log::debug!("record without mask lengths, addresses masked to /0: {record:?}");
        }
        apply_net_mask_bits(record, flags);
        masked += 1;
    }
    log::info!(
        "mask_records: net bits '{flags}' on {masked} of {} records",
        records.len()
    );
    masked
}

/// Reduce records to their aggregation keys.
///
/// Net bits from `spec` and `extra` are applied first, then every record is
/// expanded and masked with the aggregation template. Order is preserved and
/// records are not merged.
pub fn aggregate_records(
    mut records: Vec<FlowRecord>,
    spec: Option<&AggregationSpec>,
    extra: NetBits,
) -> Vec<MasterRecord> {
    let flags = spec.map_or(extra, |s| s.net_bits | extra);
    if !flags.is_empty() {
        mask_records(&mut records, flags);
    }

    records
        .iter()
        .map(|record| {
            let mut master = MasterRecord::from(record);
            if let Some(spec) = spec {
                apply_aggr_mask(&mut master, &spec.mask);
            }
            master
        })
        .collect()
}
