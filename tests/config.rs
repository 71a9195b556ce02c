use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use grab_sheets::ToolError;
use grab_sheets::config::{self, AggregateConfig};
use tempfile::tempdir;

const CONFIG: &str = r#"{
    "data_folder": "/data/trade-email",
    "start_date": "2017-07-01",
    "sheet_name": "SOTER",
    "save_path": "/data/out/{sheet_name}.csv",
    "rules": [
        {
            "sheet_name": "SOTER",
            "filter_column": "Strategy",
            "filter_value": "X",
            "group_column": "SubStrategy",
            "sum_columns": ["Day P&L", "Qty"]
        },
        {
            "sheet_name": "Fills",
            "filter_column": "Strategy",
            "filter_value": "X",
            "group_column": "SubStrategy",
            "sum_columns": ["Quantity"]
        }
    ]
}"#;

#[test]
fn loads_json_with_defaults() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("run.json");
    fs::write(&path, CONFIG).expect("config written");

    let config = AggregateConfig::load(&path).expect("config loaded");

    assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2017, 7, 1).unwrap());
    assert_eq!(config.end_date, config::today());
    assert_eq!(config.extension, ".xlsm");
    assert!(!config.overwrite_existing);
    assert_eq!(
        config.resolved_save_path(),
        PathBuf::from("/data/out/SOTER.csv")
    );

    let rule = config.rule().expect("rule found");
    assert_eq!(rule.output_columns(), vec!["SubStrategy", "Day P&L", "Qty", "Date"]);
}

#[test]
fn unknown_sheet_has_no_rule() {
    let mut config: AggregateConfig = serde_json::from_str(CONFIG).expect("config parsed");
    config.sheet_name = "Unlisted".to_string();

    assert!(matches!(config.rule(), Err(ToolError::UnknownSheet(_))));
}

#[test]
fn rule_without_sum_columns_is_rejected() {
    let mut config: AggregateConfig = serde_json::from_str(CONFIG).expect("config parsed");
    config.rules[0].sum_columns.clear();

    assert!(matches!(config.validate(), Err(ToolError::Config(_))));
}

#[test]
fn missing_file_is_reported() {
    let error = AggregateConfig::load(std::path::Path::new("/no/such/run.json")).unwrap_err();
    assert!(matches!(error, ToolError::MissingInput(_)));
}
