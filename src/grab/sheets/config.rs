use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::grab::sheets::error::{Result, ToolError};

/// Extension of the daily source workbooks.
pub const DEFAULT_EXTENSION: &str = ".xlsm";
/// Placeholder replaced by the sheet name inside `save_path`.
pub const SHEET_NAME_PLACEHOLDER: &str = "{sheet_name}";

/// Settings for a copy-mode run.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyConfig {
    pub data_folder: PathBuf,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sheet_name: String,
    pub save_path: PathBuf,
    pub extension: String,
}

/// Filter, group, and sum settings for one sheet name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregationRule {
    pub sheet_name: String,
    pub filter_column: String,
    pub filter_value: String,
    pub group_column: String,
    pub sum_columns: Vec<String>,
}

impl AggregationRule {
    /// Columns of the aggregated output, in order.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.sum_columns.len() + 2);
        columns.push(self.group_column.clone());
        columns.extend(self.sum_columns.iter().cloned());
        columns.push(DATE_COLUMN.to_string());
        columns
    }
}

/// Name of the column stamped with each source file's date.
pub const DATE_COLUMN: &str = "Date";

/// Settings for an aggregation-mode run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregateConfig {
    pub data_folder: PathBuf,
    pub start_date: NaiveDate,
    #[serde(default = "today")]
    pub end_date: NaiveDate,
    pub sheet_name: String,
    pub save_path: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub overwrite_existing: bool,
    #[serde(default)]
    pub rules: Vec<AggregationRule>,
}

impl AggregateConfig {
    /// Reads the configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Looks up the rule configured for `sheet_name`.
    pub fn rule(&self) -> Result<&AggregationRule> {
        self.rules
            .iter()
            .find(|rule| rule.sheet_name == self.sheet_name)
            .ok_or_else(|| ToolError::UnknownSheet(self.sheet_name.clone()))
    }

    /// Output path with the sheet name substituted.
    pub fn resolved_save_path(&self) -> PathBuf {
        let raw = self.save_path.to_string_lossy();
        if raw.contains(SHEET_NAME_PLACEHOLDER) {
            PathBuf::from(raw.replace(SHEET_NAME_PLACEHOLDER, &self.sheet_name))
        } else {
            self.save_path.clone()
        }
    }

    /// Checks the rule table. An inverted date range is not an error; it
    /// simply selects no files.
    pub fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            if rule.sum_columns.is_empty() {
                return Err(ToolError::Config(format!(
                    "rule for sheet '{}' has no sum columns",
                    rule.sheet_name
                )));
            }
            if rule.group_column == DATE_COLUMN || rule.sum_columns.iter().any(|c| c == DATE_COLUMN)
            {
                return Err(ToolError::Config(format!(
                    "rule for sheet '{}' reuses the reserved '{DATE_COLUMN}' column",
                    rule.sheet_name
                )));
            }
        }
        Ok(())
    }
}

/// Current local date, the default end of the range.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}
