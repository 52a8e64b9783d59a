//! Export Module
//!
//! Writes the active tab's result to disk.
//!
//! - 'x' key or `:export csv` → presented table as CSV
//! - 'X' key or `:export json` → typed records as JSON
//! - Files saved to `<data dir>/exports/`

mod csv_export;
mod json_export;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use tracing::{info, warn};

use crate::core::Action;
use crate::domain::{present, NetworkId, Records};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unknown export format '{other}' (use csv or json)")),
        }
    }
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Write `records` into `dir`, creating it if needed. Returns the file path
/// and the number of rows written.
pub fn export_to(
    dir: &Path,
    records: &Records,
    format: ExportFormat,
    network: NetworkId,
    address: &str,
) -> anyhow::Result<(PathBuf, usize)> {
    if records.is_empty() {
        anyhow::bail!("No {} rows to export", records.kind().title());
    }
    fs::create_dir_all(dir)?;

    let path = dir.join(generate_filename(records.kind().slug(), format.extension()));
    let count = match format {
        ExportFormat::Csv => csv_export::write_presentation(&path, &present(records))?,
        ExportFormat::Json => json_export::write_records(&path, records, network, address)?,
    };
    Ok((path, count))
}

/// Export the active result into the default export directory
pub fn export_result(
    records: Option<&Records>,
    format: ExportFormat,
    network: NetworkId,
    address: &str,
) -> Action {
    let Some(records) = records.filter(|r| !r.is_empty()) else {
        return Action::warn("Nothing to export for this tab");
    };

    let dir = crate::config::export_dir();
    match export_to(&dir, records, format, network, address) {
        Ok((path, count)) => {
            info!(path = %path.display(), count, "exported result");
            Action::info(format!("Exported {} rows to {}", count, path.display()))
        }
        Err(e) => {
            warn!(error = %e, "export failed");
            Action::error(format!("Export failed: {}", e))
        }
    }
}
