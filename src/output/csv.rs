//! CSV output of masked master records.

use crate::models::{MasterField, MasterRecord};
use itertools::Itertools;
use std::net::IpAddr;

const CSV_HEADER: &str = "src_addr,dst_addr,proto,src_port,dst_port,packets,bytes,label";

/// Quote a CSV field when it contains a comma or double quote.
fn escape_csv_field(input: &str) -> String {
    if input.contains(',') || input.contains('"') {
        format!("\"{}\"", input.replace('"', "\"\""))
    } else {
        input.to_string()
    }
}

fn addr_field(addr: Option<IpAddr>) -> String {
    addr.map(|a| a.to_string()).unwrap_or_default()
}

/// Render one record as a CSV line, without trailing newline.
pub fn csv_row(record: &MasterRecord) -> String {
    let fields = [
        addr_field(record.src_addr()),
        addr_field(record.dst_addr()),
        record.word(MasterField::Proto).to_string(),
        record.word(MasterField::SrcPort).to_string(),
        record.word(MasterField::DstPort).to_string(),
        record.word(MasterField::Packets).to_string(),
        record.word(MasterField::Bytes).to_string(),
        record.label.clone().unwrap_or_default(),
    ];
    fields.iter().map(|f| escape_csv_field(f)).join(",")
}

/// Render records as CSV with a header line.
pub fn records_to_csv(records: &[MasterRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&csv_row(record));
        out.push('\n');
    }
    out
}

/// Print records as CSV to stdout.
pub fn print_csv(records: &[MasterRecord]) {
    log::info!("#Start print_csv() records={}", records.len());
    print!("{}", records_to_csv(records));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlowRecord, GenericFlow};
    use std::net::Ipv4Addr;

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_row() {
        let mut record = FlowRecord::ipv4(Ipv4Addr::new(10, 0, 0, 0), Ipv4Addr::new(8, 8, 8, 8))
            .with_generic(GenericFlow {
                proto: 17,
                src_port: 5353,
                dst_port: 53,
                in_packets: 1,
                in_bytes: 80,
                ..Default::default()
            });
        record.label = Some("dns,edge".to_string());
        let row = csv_row(&MasterRecord::from(&record));
        assert_eq!(row, "10.0.0.0,8.8.8.8,17,5353,53,1,80,\"dns,edge\"");
    }

    #[test]
    fn test_records_to_csv() {
        let records = vec![MasterRecord::from(&FlowRecord::default())];
        let csv = records_to_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], ",,0,0,0,0,0,");
    }
}
