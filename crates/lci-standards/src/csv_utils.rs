//! Shared CSV utilities for loading reference tables.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::StandardsError;

/// Read a delimited file into a vector of row maps.
///
/// Each row is represented as a BTreeMap with column headers as keys.
/// Handles BOM characters and trims whitespace from values.
pub fn read_csv_rows(
    path: &Path,
    delimiter: u8,
) -> Result<Vec<BTreeMap<String, String>>, StandardsError> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(bytes.as_slice());

    let headers = reader
        .headers()
        .map_err(|e| StandardsError::csv(path, &e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StandardsError::csv(path, &e))?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim()
                .trim_matches('\u{feff}')
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Get a required field value from a row.
pub fn require_field<'a>(
    row: &'a BTreeMap<String, String>,
    key: &str,
    path: &Path,
) -> Result<&'a str, StandardsError> {
    row.get(key)
        .map(String::as_str)
        .ok_or_else(|| StandardsError::MissingColumn {
            path: path.to_path_buf(),
            column: key.to_string(),
        })
}

/// Parse a numeric field, reporting the file on failure.
pub fn parse_number(raw: &str, path: &Path) -> Result<f64, StandardsError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| StandardsError::InvalidValue {
            path: path.to_path_buf(),
            message: format!("`{raw}` is not a number"),
        })
}
