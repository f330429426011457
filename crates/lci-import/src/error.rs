use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("SimaPro file not found: {0}")]
    MissingInput(PathBuf),

    #[error("{0} must be a .csv file")]
    UnsupportedInput(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV record: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}, section `{section}`: {message}")]
    MalformedRow {
        line: u64,
        section: String,
        message: String,
    },

    #[error("process starting on line {line} has no `End`")]
    UnterminatedProcess { line: u64 },

    #[error("failed to encode datasets: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ImportError>;
