use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, info, instrument};

use crate::grab::sheets::error::{Result, ToolError};
use crate::grab::sheets::model::{Cell, ExtractedSheet};

const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Destination workbook for copy mode: one tab per appended sheet.
///
/// Nothing touches the destination until [`OutputWorkbook::save`] is called;
/// dropping the handle without saving leaves the destination untouched.
pub struct OutputWorkbook {
    path: PathBuf,
    workbook: Workbook,
    tabs: BTreeSet<String>,
    date_format: Format,
}

impl OutputWorkbook {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            workbook: Workbook::new(),
            tabs: BTreeSet::new(),
            date_format: Format::new().set_num_format(DATE_TIME_FORMAT),
        }
    }

    /// Adds a tab named `name` holding `sheet`'s rows at their original
    /// positions. Rows are written once, top to bottom.
    pub fn append_tab(&mut self, name: &str, sheet: &ExtractedSheet) -> Result<()> {
        if !self.tabs.insert(name.to_string()) {
            return Err(ToolError::DuplicateTab(name.to_string()));
        }

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(name)?;

        let (first_row, first_col) = sheet.origin;
        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = first_row + row_idx as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = first_col + col_idx as u16;
                write_cell(worksheet, row_num, col_num, cell, &self.date_format)?;
            }
        }

        debug!(tab = name, rows = sheet.rows.len(), "tab appended");
        Ok(())
    }

    /// Writes the workbook to its destination, replacing any existing file.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub fn save(mut self) -> Result<()> {
        info!(tabs = self.tabs.len(), "saving workbook");
        self.workbook.save(&self.path)?;
        info!("save complete");
        Ok(())
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    date_format: &Format,
) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(value) => {
            worksheet.write_string(row, col, value)?;
        }
        Cell::Number(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        Cell::Bool(value) => {
            worksheet.write_boolean(row, col, *value)?;
        }
        Cell::DateTime(serial) => {
            worksheet.write_number_with_format(row, col, *serial, date_format)?;
        }
    }
    Ok(())
}
