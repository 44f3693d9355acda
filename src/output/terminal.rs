//! Terminal output with colors.

use crate::models::{MasterField, MasterRecord};
use colored::Colorize;

/// Right-align a value in a field of at least `width` characters.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    if value_str.len() >= width {
        value_str
    } else {
        format!("{value_str:>width$}")
    }
}

fn addr_column(record: &MasterRecord, src: bool) -> String {
    let addr = if src {
        record.src_addr()
    } else {
        record.dst_addr()
    };
    addr.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Format one record as an aligned table row, without colors.
pub fn format_row(record: &MasterRecord) -> String {
    format!(
        "{src} -> {dst} {proto} {sport}:{dport} {packets} {bytes}",
        src = format_field(addr_column(record, true), 39),
        dst = format_field(addr_column(record, false), 39),
        proto = format_field(record.word(MasterField::Proto), 5),
        sport = format_field(record.word(MasterField::SrcPort), 5),
        dport = format_field(record.word(MasterField::DstPort), 5),
        packets = format_field(record.word(MasterField::Packets), 10),
        bytes = format_field(record.word(MasterField::Bytes), 12),
    )
}

/// Print masked records as a table to stdout.
///
/// # Arguments
/// * `records` - The records to print
/// * `keys` - Aggregation keys in effect, shown in the footer
pub fn print_records(records: &[MasterRecord], keys: &[String]) {
    log::info!("#Start print_records() records={}", records.len());

    println!(
        "{}",
        format!(
            "{} -> {} {} {}:{} {} {}",
            format_field("src_addr", 39),
            format_field("dst_addr", 39),
            format_field("proto", 5),
            format_field("sport", 5),
            format_field("dport", 5),
            format_field("packets", 10),
            format_field("bytes", 12),
        )
        .bold()
    );

    for record in records {
        let row = format_row(record);
        if record.src_addr().is_none() {
            println!("{}", row.dimmed());
        } else {
            println!("{row}");
        }
    }

    let keys = if keys.is_empty() {
        "none".to_string()
    } else {
        keys.join(",")
    };
    println!(
        "#{}# {} records, aggregation keys: {}",
        "NOTE".on_blue(),
        records.len(),
        keys.yellow()
    );
}
