//! Reference data directory resolution.

use std::path::PathBuf;

/// Environment variable for overriding the data directory.
pub const DATA_ENV_VAR: &str = "LCI_DATA_DIR";

/// Get the reference data root directory.
///
/// Resolution order:
/// 1. `LCI_DATA_DIR` environment variable
/// 2. `data/` directory relative to the workspace root
pub fn default_data_root() -> PathBuf {
    if let Ok(root) = std::env::var(DATA_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}
