use tracing::{info, instrument, warn};

use crate::grab::sheets::codec;
use crate::grab::sheets::config::CopyConfig;
use crate::grab::sheets::discovery::{self, FileSelector};
use crate::grab::sheets::error::Result;
use crate::grab::sheets::io::sheet_read;
use crate::grab::sheets::io::workbook_write::OutputWorkbook;

/// Result of a copy-mode run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopySummary {
    /// Names of the tabs written, in the order they were added.
    pub tabs: Vec<String>,
    /// Whether an output workbook was written.
    pub saved: bool,
}

/// Copies the configured sheet out of every matching workbook into one
/// output workbook, one tab per file named after the file's date token.
///
/// Any failure aborts the run before the output is written. When no file
/// matches, nothing is written.
#[instrument(
    level = "info",
    skip_all,
    fields(folder = %config.data_folder.display(), sheet = %config.sheet_name)
)]
pub fn run_copy(config: &CopyConfig) -> Result<CopySummary> {
    let selector = FileSelector::new(&config.extension, config.start_date, config.end_date);
    let file_names = discovery::select_files(&config.data_folder, &selector)?;
    if file_names.is_empty() {
        warn!("no files found in the requested date range");
        return Ok(CopySummary::default());
    }

    let mut output = OutputWorkbook::new(&config.save_path);
    let mut tabs = Vec::with_capacity(file_names.len());
    let total = file_names.len();

    for (idx, file_name) in file_names.iter().enumerate() {
        info!("processing file {} of {total}", idx + 1);

        let tab_name = codec::date_token(file_name)?;
        let sheet = sheet_read::extract(&config.data_folder.join(file_name), &config.sheet_name)?;
        output.append_tab(tab_name, &sheet)?;
        tabs.push(tab_name.to_string());
    }

    output.save()?;
    Ok(CopySummary { tabs, saved: true })
}
