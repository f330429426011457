//! Loading of the Brightway inventory and the optional metadata document.

use std::path::Path;

use lci_model::{Activity, InventoryMetadata};
use lci_validate::check_inventories;
use tracing::info;

use crate::error::{ExportError, Result};

/// Fail early when `path` is absent or does not carry one of `extensions`.
pub fn ensure_input(path: &Path, extensions: &[&str], expected: &'static str) -> Result<()> {
    if !path.is_file() {
        return Err(ExportError::MissingInput(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !extensions.contains(&extension.as_str()) {
        return Err(ExportError::UnsupportedInput {
            path: path.to_path_buf(),
            expected,
        });
    }
    Ok(())
}

/// Read a JSON array of activities and check mandatory exchange fields.
pub fn load_inventory(path: &Path) -> Result<Vec<Activity>> {
    ensure_input(path, &["json"], ".json")?;
    let bytes = std::fs::read(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let activities: Vec<Activity> =
        serde_json::from_slice(&bytes).map_err(|source| ExportError::Inventory {
            path: path.to_path_buf(),
            source,
        })?;
    check_inventories(&activities)?;
    info!(path = %path.display(), activities = activities.len(), "inventory loaded");
    Ok(activities)
}

/// Read and validate the YAML metadata document.
pub fn load_inventory_metadata(path: &Path) -> Result<InventoryMetadata> {
    ensure_input(path, &["yaml", "yml"], ".yaml")?;
    let text = std::fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata: InventoryMetadata =
        serde_yaml::from_str(&text).map_err(|source| ExportError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
    metadata.validate()?;
    Ok(metadata)
}
