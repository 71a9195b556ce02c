use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::grab::sheets::codec::{self, OUTPUT_DATE_FORMAT};
use crate::grab::sheets::config::{AggregateConfig, AggregationRule, DATE_COLUMN};
use crate::grab::sheets::discovery::{self, FileSelector};
use crate::grab::sheets::error::{Result, ToolError};
use crate::grab::sheets::io::{sheet_read, table_csv};
use crate::grab::sheets::model::{AggregateTable, Cell, ErrorRecord, ExtractedSheet};
use crate::grab::sheets::prompt::Confirm;

pub const OVERWRITE_QUESTION: &str = "Are you sure you want to overwrite existing data?";
pub const SAVE_WITH_ERRORS_QUESTION: &str = "Would you still like to save the data?";

static EMPTY_CELL: Cell = Cell::Empty;

/// Typed group key. Keys of different cell types never merge; numbers sort
/// by value and come before dates, booleans, and text.
#[derive(Debug, Clone)]
enum GroupKey {
    Number(f64),
    DateTime(f64),
    Bool(bool),
    Text(String),
}

impl GroupKey {
    fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Empty => None,
            Cell::Text(text) if text.trim().is_empty() => None,
            Cell::Text(text) => Some(GroupKey::Text(text.clone())),
            Cell::Number(value) => Some(GroupKey::Number(*value)),
            Cell::DateTime(value) => Some(GroupKey::DateTime(*value)),
            Cell::Bool(value) => Some(GroupKey::Bool(*value)),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            GroupKey::Number(_) => 0,
            GroupKey::DateTime(_) => 1,
            GroupKey::Bool(_) => 2,
            GroupKey::Text(_) => 3,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(lhs), GroupKey::Number(rhs))
            | (GroupKey::DateTime(lhs), GroupKey::DateTime(rhs)) => lhs.total_cmp(rhs),
            (GroupKey::Bool(lhs), GroupKey::Bool(rhs)) => lhs.cmp(rhs),
            (GroupKey::Text(lhs), GroupKey::Text(rhs)) => lhs.cmp(rhs),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Number(value) | GroupKey::DateTime(value) => {
                f.write_str(&format_number(*value))
            }
            GroupKey::Bool(value) => write!(f, "{value}"),
            GroupKey::Text(value) => f.write_str(value),
        }
    }
}

/// How an aggregation run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateOutcome {
    /// No new files to process; nothing was written.
    UpToDate { last_date: Option<NaiveDate> },
    /// The user declined the overwrite confirmation; nothing was processed.
    OverwriteDeclined,
    /// Files were processed but the user declined saving after errors.
    SaveDeclined { errors: Vec<ErrorRecord> },
    /// The accumulated table was written.
    Saved(AggregateReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub path: PathBuf,
    pub files: usize,
    pub new_rows: usize,
    pub total_rows: usize,
    pub errors: Vec<ErrorRecord>,
}

/// Filters, groups, and sums the configured sheet of every new workbook and
/// appends the result to the saved table.
///
/// Unless `overwrite_existing` is set, dates already present in the saved
/// table are skipped. A failing file is recorded and the run moves on.
#[instrument(
    level = "info",
    skip_all,
    fields(folder = %config.data_folder.display(), sheet = %config.sheet_name)
)]
pub fn run_aggregate(
    config: &AggregateConfig,
    confirm: &mut dyn Confirm,
) -> Result<AggregateOutcome> {
    config.validate()?;
    let rule = config.rule()?;
    let save_path = config.resolved_save_path();

    let (mut table, existing_dates) = if config.overwrite_existing {
        (AggregateTable::with_columns(rule.output_columns()), BTreeSet::new())
    } else {
        load_existing(&save_path, rule)?
    };

    let selector = FileSelector::new(&config.extension, config.start_date, config.end_date)
        .excluding(existing_dates.clone());
    let file_names = discovery::select_files(&config.data_folder, &selector)?;

    if file_names.is_empty() {
        let last_date = existing_dates.last().copied();
        info!(
            last_date = ?last_date.map(|date| date.format(OUTPUT_DATE_FORMAT).to_string()),
            "all data previously processed"
        );
        return Ok(AggregateOutcome::UpToDate { last_date });
    }

    if config.overwrite_existing && !confirm.confirm(OVERWRITE_QUESTION)? {
        info!("exiting without processing");
        return Ok(AggregateOutcome::OverwriteDeclined);
    }

    info!(count = file_names.len(), "new files found to process");

    let before = table.len();
    let errors = process_files(
        &config.data_folder,
        &file_names,
        &config.sheet_name,
        rule,
        &mut table,
    )?;
    let new_rows = table.len() - before;
    info!(new_rows, errors = errors.len(), "processing complete");

    if !errors.is_empty() && !confirm.confirm(&error_summary(&errors))? {
        info!("exiting without saving");
        return Ok(AggregateOutcome::SaveDeclined { errors });
    }

    table_csv::write_table(&save_path, &table)?;
    info!(path = %save_path.display(), "output saved");

    Ok(AggregateOutcome::Saved(AggregateReport {
        path: save_path,
        files: file_names.len(),
        new_rows,
        total_rows: table.len(),
        errors,
    }))
}

fn process_files(
    folder: &Path,
    file_names: &[String],
    sheet_name: &str,
    rule: &AggregationRule,
    table: &mut AggregateTable,
) -> Result<Vec<ErrorRecord>> {
    let mut errors = Vec::new();
    let total = file_names.len();

    for (idx, file_name) in file_names.iter().enumerate() {
        info!("processing file {} of {total}", idx + 1);
        let date = codec::parse_date(file_name)?;

        let result = sheet_read::extract(&folder.join(file_name), sheet_name)
            .and_then(|sheet| aggregate_sheet(&sheet, rule, date));
        match result {
            Ok(rows) => {
                debug!(file = %file_name, rows = rows.len(), "file aggregated");
                table.rows.extend(rows);
            }
            Err(error) => {
                let record = ErrorRecord::from_error(date, &error);
                warn!(file = %file_name, "{record}");
                errors.push(record);
            }
        }
    }

    Ok(errors)
}

/// Applies `rule` to one extracted sheet: keep rows whose filter column equals
/// the filter value, group them by the group column, and sum the sum columns.
///
/// Returns one row per group in ascending key order (numbers by value, before
/// text), laid out as
/// [`AggregationRule::output_columns`] with `date` in the last column. Rows
/// with a blank group key are left out.
pub fn aggregate_sheet(
    sheet: &ExtractedSheet,
    rule: &AggregationRule,
    date: NaiveDate,
) -> Result<Vec<Vec<String>>> {
    let header = sheet.header();
    let position = |name: &str| {
        header
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| ToolError::MissingColumn(name.to_string()))
    };

    let filter_idx = position(&rule.filter_column)?;
    let group_idx = position(&rule.group_column)?;
    let sum_idx = rule
        .sum_columns
        .iter()
        .map(|name| position(name))
        .collect::<Result<Vec<_>>>()?;

    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for row in sheet.records() {
        let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);

        if cell(filter_idx).to_string() != rule.filter_value {
            continue;
        }
        let Some(key) = GroupKey::from_cell(cell(group_idx)) else {
            continue;
        };

        let totals = groups
            .entry(key)
            .or_insert_with(|| vec![0.0; sum_idx.len()]);
        let columns = sum_idx.iter().zip(&rule.sum_columns);
        for (total, (&idx, column)) in totals.iter_mut().zip(columns) {
            *total += numeric_value(cell(idx), column)?;
        }
    }

    let stamp = date.format(OUTPUT_DATE_FORMAT).to_string();
    Ok(groups
        .into_iter()
        .map(|(key, totals)| {
            let mut row = Vec::with_capacity(totals.len() + 2);
            row.push(key.to_string());
            row.extend(totals.into_iter().map(format_number));
            row.push(stamp.clone());
            row
        })
        .collect())
}

/// Distinct dates held in the table's `Date` column.
pub fn covered_dates(table: &AggregateTable) -> Result<BTreeSet<NaiveDate>> {
    let idx = table
        .column_index(DATE_COLUMN)
        .ok_or_else(|| ToolError::InvalidOutput(format!("missing '{DATE_COLUMN}' column")))?;

    table
        .rows
        .iter()
        .filter_map(|row| row.get(idx))
        .map(|value| {
            NaiveDate::parse_from_str(value.trim(), OUTPUT_DATE_FORMAT).map_err(|err| {
                ToolError::InvalidOutput(format!("unreadable date '{value}': {err}"))
            })
        })
        .collect()
}

fn load_existing(
    path: &Path,
    rule: &AggregationRule,
) -> Result<(AggregateTable, BTreeSet<NaiveDate>)> {
    let expected = rule.output_columns();
    let Some(table) = table_csv::read_table(path)? else {
        debug!(path = %path.display(), "no existing output, starting fresh");
        return Ok((AggregateTable::with_columns(expected), BTreeSet::new()));
    };

    if table.columns != expected {
        return Err(ToolError::InvalidOutput(format!(
            "columns {:?} do not match the configured layout {:?}",
            table.columns, expected
        )));
    }

    let dates = covered_dates(&table)?;
    info!(rows = table.len(), dates = dates.len(), "existing output loaded");
    Ok((table, dates))
}

fn numeric_value(cell: &Cell, column: &str) -> Result<f64> {
    match cell {
        Cell::Empty => Ok(0.0),
        Cell::Number(value) => Ok(*value),
        Cell::Bool(value) => Ok(f64::from(u8::from(*value))),
        Cell::Text(text) if text.trim().is_empty() => Ok(0.0),
        Cell::Text(text) => text.trim().parse::<f64>().map_err(|_| ToolError::NonNumeric {
            column: column.to_string(),
            value: text.clone(),
        }),
        other => Err(ToolError::NonNumeric {
            column: column.to_string(),
            value: other.to_string(),
        }),
    }
}

fn format_number(value: f64) -> String {
    // -0.0 would otherwise print as "-0"
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

fn error_summary(errors: &[ErrorRecord]) -> String {
    let mut summary = String::from("The following errors occurred:\n");
    for error in errors {
        let _ = writeln!(summary, "* {error}");
    }
    summary.push_str(SAVE_WITH_ERRORS_QUESTION);
    summary
}
