use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use tracing::{debug, instrument};

use crate::grab::sheets::error::{Result, ToolError};
use crate::grab::sheets::model::{Cell, ExtractedSheet, Row};

/// Reads every row of the sheet named `sheet_name` (exact, case-sensitive)
/// from the workbook at `path`.
///
/// The workbook format is chosen from the file extension. Cell values are
/// kept as the file encodes them.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), sheet = sheet_name))]
pub fn extract(path: &Path, sheet_name: &str) -> Result<ExtractedSheet> {
    let mut workbook = open_workbook_auto(path)?;

    let range = workbook
        .worksheet_range(sheet_name)
        .ok_or_else(|| ToolError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet_name.to_string(),
        })?
        .map_err(ToolError::from)?;

    let sheet = range_to_sheet(&range);
    debug!(rows = sheet.rows.len(), "sheet extracted");
    Ok(sheet)
}

fn range_to_sheet(range: &Range<DataType>) -> ExtractedSheet {
    let origin = range
        .start()
        .map(|(row, col)| (row, col as u16))
        .unwrap_or((0, 0));
    let rows = range
        .rows()
        .map(|row| row.iter().map(to_cell).collect::<Row>())
        .collect();
    ExtractedSheet { origin, rows }
}

fn to_cell(value: &DataType) -> Cell {
    match value {
        DataType::Empty => Cell::Empty,
        DataType::String(text) => Cell::Text(text.clone()),
        DataType::Float(number) => Cell::Number(*number),
        DataType::Int(number) => Cell::Number(*number as f64),
        DataType::Bool(flag) => Cell::Bool(*flag),
        DataType::DateTime(serial) => Cell::DateTime(*serial),
        other => Cell::Text(other.to_string()),
    }
}
