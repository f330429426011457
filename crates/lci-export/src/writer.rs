//! Semicolon-delimited output for SimaPro.

use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::error::{ExportError, Result};
use crate::rows::Row;

fn encode_row(row: &[String]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(row)?;
    writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))
}

/// Encode rows as SimaPro CSV. An empty row becomes an empty line.
pub fn encode_rows(rows: &[Row]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for row in rows {
        if row.is_empty() {
            out.push(b'\n');
        } else {
            out.extend(encode_row(row)?);
        }
    }
    Ok(out)
}

/// Write rows to `path`, creating its parent directory when missing.
pub fn write_rows(rows: &[Row], path: &Path) -> Result<()> {
    let write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    let bytes = encode_rows(rows)?;
    std::fs::write(path, bytes).map_err(write_error)
}
