//! JSON Export
//!
//! Writes typed records rather than display strings, so numbers stay numbers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{NetworkId, Records};

#[derive(Serialize)]
struct ExportDocument<'a> {
    kind: &'a str,
    network: &'a str,
    address: &'a str,
    exported_at: String,
    rows: usize,
    records: &'a Records,
}

/// Write records with a small header describing the query
pub fn write_records(
    path: &Path,
    records: &Records,
    network: NetworkId,
    address: &str,
) -> anyhow::Result<usize> {
    let document = ExportDocument {
        kind: records.kind().slug(),
        network: network.id(),
        address,
        exported_at: chrono::Local::now().to_rfc3339(),
        rows: records.len(),
        records,
    };

    let json = serde_json::to_string_pretty(&document)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(records.len())
}
