//! Brightway inventory → SimaPro CSV export.
//!
//! - **input**: inventory and metadata loading with the up-front checks
//! - **rows**: the per-section row builder
//! - **transport**: distribution transport for the `uvek` target
//! - **writer**: semicolon CSV encoding

mod error;
mod input;
mod options;
pub mod rows;
mod transport;
mod writer;

use std::path::PathBuf;

use lci_model::{Activity, InventoryMetadata};
use lci_standards::ReferenceTables;
use lci_validate::UnusedExchange;
use tracing::{info, info_span, warn};

pub use error::{ExportError, Result};
pub use input::{ensure_input, load_inventory, load_inventory_metadata};
pub use options::{DEFAULT_ECOINVENT_VERSION, ExportOptions};
pub use rows::{Row, RowBuilder, SimaproRows};
pub use transport::add_distribution_transport;
pub use writer::{encode_rows, write_rows};

/// What an export run produced.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub activities: usize,
    pub rows: usize,
    pub unused: Vec<UnusedExchange>,
}

/// Build the SimaPro rows for `activities` without touching the filesystem.
pub fn build_rows(
    activities: &[Activity],
    metadata: Option<&InventoryMetadata>,
    options: &ExportOptions,
    tables: &ReferenceTables,
) -> Result<SimaproRows> {
    RowBuilder::new(tables, options, metadata).build(activities)
}

/// Convert `activities` and write `simapro_<target>_<date>.csv` into the
/// output directory.
pub fn export_to_simapro(
    activities: &[Activity],
    metadata: Option<&InventoryMetadata>,
    options: &ExportOptions,
    tables: &ReferenceTables,
) -> Result<ExportOutcome> {
    let span = info_span!(
        "export",
        target = options.target.as_str(),
        ecoinvent_version = %options.ecoinvent_version
    );
    let _guard = span.enter();

    let built = build_rows(activities, metadata, options, tables)?;
    let path = options.output_dir.join(options.file_name());
    write_rows(&built.rows, &path)?;
    if !built.unused.is_empty() {
        warn!(count = built.unused.len(), "exchanges not written to any section");
    }
    info!(
        path = %path.display(),
        activities = built.activities,
        rows = built.rows.len(),
        "SimaPro file written"
    );
    Ok(ExportOutcome {
        path,
        activities: built.activities,
        rows: built.rows.len(),
        unused: built.unused,
    })
}
