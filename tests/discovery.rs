mod common;

use std::collections::BTreeSet;
use std::fs;

use chrono::NaiveDate;
use grab_sheets::ToolError;
use grab_sheets::codec;
use grab_sheets::discovery::{self, FileSelector};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn touch_all(folder: &std::path::Path, names: &[&str]) {
    for name in names {
        fs::write(folder.join(name), b"").expect("file created");
    }
}

#[test]
fn selects_only_dates_inside_inclusive_range() {
    let temp_dir = tempdir().expect("temporary directory");
    let tokens = ["2017.06.30", "2017.07.01", "2017.07.02", "2017.07.03", "2017.07.04"];
    let names: Vec<String> = tokens.iter().map(|t| common::daily_name(t)).collect();
    touch_all(temp_dir.path(), &names.iter().map(String::as_str).collect::<Vec<_>>());

    let start = date(2017, 7, 1);
    let end = date(2017, 7, 3);
    let selector = FileSelector::new(".xlsm", start, end);
    let mut selected = discovery::select_files(temp_dir.path(), &selector).expect("listing");
    selected.sort();

    assert_eq!(selected.len(), 3);
    for name in &selected {
        let file_date = codec::parse_date(name).expect("date parsed");
        assert!(start <= file_date && file_date <= end, "{name}");
    }
}

#[test]
fn other_extensions_are_ignored_without_parsing() {
    let temp_dir = tempdir().expect("temporary directory");
    touch_all(
        temp_dir.path(),
        &["notes.txt", "summary.csv", &common::daily_name("2017.07.01")],
    );

    let selector = FileSelector::new(".xlsm", date(2017, 1, 1), date(2017, 12, 31));
    let selected = discovery::select_files(temp_dir.path(), &selector).expect("listing");

    assert_eq!(selected, vec![common::daily_name("2017.07.01")]);
}

#[test]
fn excluded_dates_are_skipped() {
    let temp_dir = tempdir().expect("temporary directory");
    touch_all(
        temp_dir.path(),
        &[&common::daily_name("2017.07.01"), &common::daily_name("2017.07.02")],
    );

    let selector = FileSelector::new(".xlsm", date(2017, 7, 1), date(2017, 7, 31))
        .excluding(BTreeSet::from([date(2017, 7, 1)]));
    let selected = discovery::select_files(temp_dir.path(), &selector).expect("listing");

    assert_eq!(selected, vec![common::daily_name("2017.07.02")]);
}

#[test]
fn malformed_name_with_expected_extension_fails_the_listing() {
    let temp_dir = tempdir().expect("temporary directory");
    touch_all(temp_dir.path(), &["Archive - 2017.xx.01.xlsm"]);

    let selector = FileSelector::new(".xlsm", date(2017, 1, 1), date(2017, 12, 31));
    let error = discovery::select_files(temp_dir.path(), &selector).unwrap_err();

    assert!(matches!(error, ToolError::InvalidFileName { .. }));
}

#[test]
fn custom_predicate_sees_every_entry() {
    let temp_dir = tempdir().expect("temporary directory");
    touch_all(temp_dir.path(), &["a", "b", "c"]);
    fs::create_dir(temp_dir.path().join("nested")).expect("dir created");

    let mut seen = Vec::new();
    let selected = discovery::list_candidates(temp_dir.path(), |name| {
        seen.push(name.to_string());
        Ok(name != "b")
    })
    .expect("listing");

    assert_eq!(seen.len(), 4);
    assert_eq!(selected.len(), 3);
    assert!(!selected.contains(&"b".to_string()));
}
