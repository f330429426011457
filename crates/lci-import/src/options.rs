use std::path::Path;

pub const DEFAULT_ECOINVENT_VERSION: &str = "3.9";
pub const BIOSPHERE_DATABASE: &str = "biosphere3";

/// Settings of one import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub ecoinvent_version: String,
    /// Database linked by production and technosphere exchanges. Defaults
    /// to the SimaPro file stem.
    pub database: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            ecoinvent_version: DEFAULT_ECOINVENT_VERSION.to_string(),
            database: None,
        }
    }
}

impl ImportOptions {
    #[must_use]
    pub fn with_ecoinvent_version(mut self, version: impl Into<String>) -> Self {
        self.ecoinvent_version = version.into();
        self
    }

    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn database_for(&self, input: &Path) -> String {
        self.database.clone().unwrap_or_else(|| {
            input
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("simapro")
                .to_string()
        })
    }
}
