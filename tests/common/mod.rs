#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use grab_sheets::Result;
use grab_sheets::model::Cell;
use grab_sheets::prompt::Confirm;
use rust_xlsxwriter::{Workbook, Worksheet};

pub const PREFIX: &str = "Trade E-mail Archive - ";

/// Daily workbook file name for `token` (`yyyy.mm.dd`).
pub fn daily_name(token: &str) -> String {
    format!("{PREFIX}{token}.xlsm")
}

pub fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

pub fn num(value: f64) -> Cell {
    Cell::Number(value)
}

/// Writes a workbook holding the given sheets, each starting at A1.
pub fn write_fixture(path: &Path, sheets: &[(&str, Vec<Vec<Cell>>)]) -> PathBuf {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet named");
        write_rows(worksheet, (0, 0), rows);
    }
    workbook.save(path).expect("fixture saved");
    path.to_path_buf()
}

/// Writes a single-sheet workbook whose first cell sits at `origin`
/// (zero-based row, column).
pub fn write_fixture_at(path: &Path, sheet: &str, origin: (u32, u16), rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).expect("sheet named");
    write_rows(worksheet, origin, rows);
    workbook.save(path).expect("fixture saved");
}

fn write_rows(worksheet: &mut Worksheet, origin: (u32, u16), rows: &[Vec<Cell>]) {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (origin.0 + row_idx as u32, origin.1 + col_idx as u16);
            match cell {
                Cell::Empty => {}
                Cell::Text(value) => {
                    worksheet.write_string(r, c, value).expect("string written");
                }
                Cell::Number(value) | Cell::DateTime(value) => {
                    worksheet.write_number(r, c, *value).expect("number written");
                }
                Cell::Bool(value) => {
                    worksheet.write_boolean(r, c, *value).expect("bool written");
                }
            }
        }
    }
}

/// Writes a daily workbook into `folder` with a single sheet.
pub fn write_daily(folder: &Path, token: &str, sheet: &str, rows: Vec<Vec<Cell>>) -> PathBuf {
    write_fixture(&folder.join(daily_name(token)), &[(sheet, rows)])
}

/// A trade sheet with the columns used by the aggregation tests.
pub fn trades(rows: &[(&str, &str, f64)]) -> Vec<Vec<Cell>> {
    let mut sheet = vec![vec![text("Strategy"), text("SubStrategy"), text("Qty")]];
    for (strategy, sub, qty) in rows {
        sheet.push(vec![text(strategy), text(sub), num(*qty)]);
    }
    sheet
}

/// Replays canned answers in order and records the questions it was asked.
/// Once the answers run out every further question is declined.
#[derive(Debug, Default)]
pub struct Scripted {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl Scripted {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.asked.push(question.to_string());
        Ok(self
            .answers
            .pop_front()
            .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y")))
    }
}
