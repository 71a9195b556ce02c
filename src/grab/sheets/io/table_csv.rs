use std::path::Path;

use tracing::{debug, instrument};

use crate::grab::sheets::error::Result;
use crate::grab::sheets::model::AggregateTable;

/// Loads a previously saved table, or `None` when nothing has been saved yet.
///
/// Rows with any blank field are dropped.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_table(path: &Path) -> Result<Option<AggregateTable>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path)?;
    let columns = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = AggregateTable::with_columns(columns);

    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        if record.iter().any(|field| field.trim().is_empty()) {
            dropped += 1;
            continue;
        }
        table.rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(rows = table.len(), dropped, "existing table loaded");
    Ok(Some(table))
}

/// Writes the full table to `path`, replacing any existing content.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), rows = table.len()))]
pub fn write_table(path: &Path, table: &AggregateTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
