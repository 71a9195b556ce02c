use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool discovers, reads, consolidates, or saves sheet data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as listing folders or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the configuration file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the delimited output table cannot be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    /// Raised when a filename does not carry a `yyyy.mm.dd` date token at the
    /// expected position.
    #[error("invalid date in file name '{name}': {reason}")]
    InvalidFileName { name: String, reason: String },

    /// Raised when a workbook has no sheet with the requested name.
    #[error("sheet '{sheet}' not found in {}", path.display())]
    SheetNotFound { path: PathBuf, sheet: String },

    /// Raised when no aggregation rule is configured for a sheet name.
    #[error("{0} is not recognized as a valid sheet")]
    UnknownSheet(String),

    /// Raised when the run configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Raised when an extracted sheet lacks a column named by a rule.
    #[error("column '{0}' not found in sheet header")]
    MissingColumn(String),

    /// Raised when a summed column holds a value that is not a number.
    #[error("non-numeric value '{value}' in column {column}")]
    NonNumeric { column: String, value: String },

    /// Raised when previously saved output cannot be merged with this run.
    #[error("invalid existing output: {0}")]
    InvalidOutput(String),

    /// Raised when two output tabs would share one name.
    #[error("duplicate output tab '{0}'")]
    DuplicateTab(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    /// Short, stable name of the failure class, used in per-file error
    /// summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Io(_) => "Io",
            ToolError::Json(_) => "Json",
            ToolError::Csv(_) => "Csv",
            ToolError::ExcelWrite(_) => "ExcelWrite",
            ToolError::ExcelRead(_) => "ExcelRead",
            ToolError::InvalidFileName { .. } => "InvalidFileName",
            ToolError::SheetNotFound { .. } => "SheetNotFound",
            ToolError::UnknownSheet(_) => "UnknownSheet",
            ToolError::Config(_) => "Config",
            ToolError::MissingColumn(_) => "MissingColumn",
            ToolError::NonNumeric { .. } => "NonNumeric",
            ToolError::InvalidOutput(_) => "InvalidOutput",
            ToolError::DuplicateTab(_) => "DuplicateTab",
            ToolError::MissingInput(_) => "MissingInput",
            ToolError::Logging(_) => "Logging",
        }
    }
}
