use std::fmt;

use chrono::NaiveDate;

use crate::grab::sheets::codec::OUTPUT_DATE_FORMAT;
use crate::grab::sheets::error::ToolError;

/// A single scalar cell value as stored in the source workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Blank cell.
    Empty,
    /// Text literal.
    Text(String),
    /// Numeric literal.
    Number(f64),
    /// Boolean literal.
    Bool(bool),
    /// Date or time stored as an Excel serial number.
    DateTime(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(value) => f.write_str(value),
            Cell::Number(value) | Cell::DateTime(value) => write!(f, "{value}"),
            Cell::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// One line of a source sheet, in column order.
pub type Row = Vec<Cell>;

/// All rows of one sheet read from one workbook.
///
/// `origin` is the zero-based (row, column) of the first cell in `rows`, so
/// that a copy can be laid out at the same position as the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSheet {
    pub origin: (u32, u16),
    pub rows: Vec<Row>,
}

impl ExtractedSheet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            origin: (0, 0),
            rows,
        }
    }

    /// Header row used for named-column access.
    pub fn header(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
            .unwrap_or_default()
    }

    /// Rows following the header.
    pub fn records(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or_default()
    }
}

/// Flat accumulated table persisted in aggregation mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl AggregateTable {
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

/// A failure recorded against one source file during aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub date: NaiveDate,
    pub kind: &'static str,
    pub message: String,
}

impl ErrorRecord {
    pub fn from_error(date: NaiveDate, error: &ToolError) -> Self {
        Self {
            date,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error processing {} - ({}): {}",
            self.date.format(OUTPUT_DATE_FORMAT),
            self.kind,
            self.message
        )
    }
}
