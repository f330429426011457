use std::path::PathBuf;

use lci_model::ModelError;
use lci_validate::ValidateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("{path} must be a {expected} file")]
    UnsupportedInput {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse inventory {path}: {source}")]
    Inventory {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse metadata {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid metadata: {0}")]
    InvalidMetadata(#[from] ModelError),

    #[error(transparent)]
    MandatoryFields(#[from] ValidateError),

    #[error("activity `{activity}` has no production exchange")]
    MissingProduction { activity: String },

    #[error("unit `{unit}` of `{exchange}` in activity `{activity}` has no SimaPro equivalent")]
    UnknownUnit {
        unit: String,
        exchange: String,
        activity: String,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode CSV row: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
