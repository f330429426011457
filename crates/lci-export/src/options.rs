use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use lci_model::TargetDatabase;

pub const DEFAULT_ECOINVENT_VERSION: &str = "3.9";

/// Settings of one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub target: TargetDatabase,
    pub ecoinvent_version: String,
    /// Written to the header, the `Date` field and the file name.
    pub date: NaiveDate,
    pub output_dir: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            target: TargetDatabase::default(),
            ecoinvent_version: DEFAULT_ECOINVENT_VERSION.to_string(),
            date: Local::now().date_naive(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn with_target(mut self, target: TargetDatabase) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// `dd.mm.yyyy`, as SimaPro expects inside the file.
    pub fn simapro_date(&self) -> String {
        self.date.format("%d.%m.%Y").to_string()
    }

    /// `simapro_<target>_<dd-mm-yyyy>.csv`
    pub fn file_name(&self) -> String {
        format!(
            "simapro_{}_{}.csv",
            self.target.as_str(),
            self.date.format("%d-%m-%Y")
        )
    }
}
