//! Reads the trading date embedded at the end of a daily workbook's name.
//!
//! File names follow one fixed convention, `<anything> yyyy.mm.dd.<ext>` with
//! a four character extension, so the date is located by counting characters
//! back from the end of the name rather than by pattern matching. Keeping the
//! slicing here means a different naming scheme only touches this module.

use chrono::NaiveDate;

use crate::grab::sheets::error::{Result, ToolError};

/// Format of the date token as it appears in file names and output tab names.
pub const TOKEN_FORMAT: &str = "%Y.%m.%d";
/// Format of the `Date` column in aggregated output.
pub const OUTPUT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Offset from the end of the name where the token starts.
const TOKEN_START: usize = 15;
/// Offset from the end of the name where the token stops (`.ext`).
const TOKEN_END: usize = 5;

/// Returns the `yyyy.mm.dd` token verbatim.
pub fn date_token(file_name: &str) -> Result<&str> {
    slice_from_end(file_name, TOKEN_START, TOKEN_END)
}

/// Parses the token into a calendar date.
///
/// Only integer parseability and calendar validity are checked; the
/// separators between the components are not inspected.
pub fn parse_date(file_name: &str) -> Result<NaiveDate> {
    let year = parse_component(file_name, 15, 11, "year")?;
    let month = parse_component(file_name, 10, 8, "month")?;
    let day = parse_component(file_name, 7, 5, "day")?;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or_else(|| {
        ToolError::InvalidFileName {
            name: file_name.to_string(),
            reason: format!("{year:04}-{month:02}-{day:02} is not a calendar date"),
        }
    })
}

/// Renders a date the way it appears inside file names.
pub fn format_token(date: NaiveDate) -> String {
    date.format(TOKEN_FORMAT).to_string()
}

fn parse_component(file_name: &str, start: usize, end: usize, label: &str) -> Result<i32> {
    let digits = slice_from_end(file_name, start, end)?;
    digits.parse::<i32>().map_err(|err| ToolError::InvalidFileName {
        name: file_name.to_string(),
        reason: format!("{label} '{digits}': {err}"),
    })
}

fn slice_from_end(file_name: &str, start: usize, end: usize) -> Result<&str> {
    let len = file_name.len();
    if len < start {
        return Err(ToolError::InvalidFileName {
            name: file_name.to_string(),
            reason: format!("name is shorter than {start} characters"),
        });
    }
    file_name
        .get(len - start..len - end)
        .ok_or_else(|| ToolError::InvalidFileName {
            name: file_name.to_string(),
            reason: "date token does not fall on character boundaries".into(),
        })
}
