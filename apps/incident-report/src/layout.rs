//! Results folder layout.
//!
//! Each run writes into `<root>/<YYYY-MM-DD>/`, so reports from different
//! days sit side by side and a rerun on the same day replaces its own files.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub const WORKBOOK_FILE: &str = "remedy_data.xlsx";
pub const SNAPSHOT_FILE: &str = "data.snapshot";
pub const CHART_FILE: &str = "QPPO2.svg";

/// Paths of one day's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsLayout {
    dir: PathBuf,
}

impl ResultsLayout {
    #[must_use]
    pub fn new(root: &Path, as_of: NaiveDate) -> Self {
        Self {
            dir: root.join(as_of.format("%Y-%m-%d").to_string()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn workbook(&self) -> PathBuf {
        self.dir.join(WORKBOOK_FILE)
    }

    #[must_use]
    pub fn snapshot(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    #[must_use]
    pub fn chart(&self) -> PathBuf {
        self.dir.join(CHART_FILE)
    }
}
