//! SimaPro CSV → Brightway import.
//!
//! [`read_simapro_csv`] turns the process blocks of an export into raw
//! datasets; [`normalize_datasets`] splits their composite names, fixes
//! signs and reconciles biosphere flows. [`import_simapro`] runs both.

mod error;
mod normalize;
mod options;
mod reader;

use std::path::{Path, PathBuf};

use lci_model::Activity;
use lci_standards::ReferenceTables;
use tracing::{info, info_span};

pub use error::{ImportError, Result};
pub use normalize::{NormalizeSummary, normalize_datasets};
pub use options::{BIOSPHERE_DATABASE, DEFAULT_ECOINVENT_VERSION, ImportOptions};
pub use reader::{SIMAPRO_METADATA_KEY, parse_simapro, read_simapro_csv};

/// Normalised datasets and what the pass did to them.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub database: String,
    pub datasets: Vec<Activity>,
    pub summary: NormalizeSummary,
}

/// Read and normalise the SimaPro export at `path`.
pub fn import_simapro(
    path: &Path,
    options: &ImportOptions,
    tables: &ReferenceTables,
) -> Result<ImportOutcome> {
    let span = info_span!("import", path = %path.display());
    let _guard = span.enter();

    let raw = read_simapro_csv(path, tables)?;
    info!(datasets = raw.len(), "SimaPro process blocks read");
    let database = options.database_for(path);
    let (datasets, summary) = normalize_datasets(raw, &database, options, tables);
    Ok(ImportOutcome {
        database,
        datasets,
        summary,
    })
}

/// `<input stem>.json` next to the SimaPro file.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("json")
}

/// Write datasets as pretty-printed JSON, creating the parent directory.
pub fn write_datasets(datasets: &[Activity], path: &Path) -> Result<()> {
    let write_error = |source| ImportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    let json = serde_json::to_string_pretty(datasets)?;
    std::fs::write(path, json).map_err(write_error)?;
    info!(path = %path.display(), datasets = datasets.len(), "datasets written");
    Ok(())
}
