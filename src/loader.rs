use crate::error::Result;
use crate::types::RawRow;
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Read the fleet CSV export from disk.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_path(path)?;
    let rows = collect(rdr)?;
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read fleet rows from any reader (in-memory data, stdin).
pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);
    collect(rdr)
}

fn collect<R: Read>(mut rdr: csv::Reader<R>) -> Result<Vec<RawRow>> {
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        rows.push(result?);
    }
    Ok(rows)
}
