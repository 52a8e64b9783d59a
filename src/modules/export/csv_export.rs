//! CSV Export
//!
//! Writes the presented grid, so the file holds the same text the table shows.

use std::path::Path;

use crate::domain::Presentation;

/// Write a presentation to CSV; detail views become `field,value` rows
pub fn write_presentation(path: &Path, presentation: &Presentation) -> anyhow::Result<usize> {
    let Some((columns, rows)) = presentation.to_grid() else {
        anyhow::bail!("nothing to write");
    };

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&columns)?;
    for row in &rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}
