use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::grab::sheets::codec;
use crate::grab::sheets::error::Result;

/// Lists the entry names of `directory` (non-recursive) for which `include`
/// returns `true`, in the order the directory listing yields them.
///
/// Entry kinds are not distinguished. A predicate error aborts the listing.
#[instrument(level = "debug", skip_all, fields(directory = %directory.display()))]
pub fn list_candidates<F>(directory: &Path, mut include: F) -> Result<Vec<String>>
where
    F: FnMut(&str) -> Result<bool>,
{
    let mut names = Vec::new();
    for entry in fs::read_dir(directory)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if include(&name)? {
            names.push(name);
        }
    }
    debug!(count = names.len(), "candidate files selected");
    Ok(names)
}

/// The standard selection rule: extension, inclusive date range, and dates
/// already covered by an earlier run.
#[derive(Debug, Clone)]
pub struct FileSelector {
    pub extension: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub exclude: BTreeSet<NaiveDate>,
}

impl FileSelector {
    pub fn new(extension: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            extension: extension.into(),
            start_date,
            end_date,
            exclude: BTreeSet::new(),
        }
    }

    /// Skips the given dates in addition to the range check.
    pub fn excluding(mut self, dates: BTreeSet<NaiveDate>) -> Self {
        self.exclude = dates;
        self
    }

    /// Names without the extension are rejected before their date is read,
    /// so only conforming files can fail date parsing.
    pub fn matches(&self, name: &str) -> Result<bool> {
        if !name.ends_with(&self.extension) {
            return Ok(false);
        }
        let date = codec::parse_date(name)?;
        Ok(self.start_date <= date && date <= self.end_date && !self.exclude.contains(&date))
    }
}

/// Convenience wrapper combining [`list_candidates`] with a [`FileSelector`].
pub fn select_files(directory: &Path, selector: &FileSelector) -> Result<Vec<String>> {
    list_candidates(directory, |name| selector.matches(name))
}
