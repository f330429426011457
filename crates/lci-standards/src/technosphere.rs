//! Technosphere tables used by the UVEK target: direct name mappings,
//! unit conversions and distribution transport distances.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::csv_utils::{parse_number, read_csv_rows, require_field};
use crate::error::StandardsError;

type UvekKey = (String, String, String, String);

/// UVEK process names keyed by `(name, location, unit, reference product)`.
#[derive(Debug, Clone, Default)]
pub struct UvekNames {
    names: BTreeMap<UvekKey, String>,
}

impl UvekNames {
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let mut table = Self::default();
        for row in read_csv_rows(path, b';')? {
            let uvek = require_field(&row, "uvek name", path)?;
            if uvek.is_empty() {
                continue;
            }
            table.insert(
                require_field(&row, "name", path)?,
                require_field(&row, "location", path)?,
                require_field(&row, "unit", path)?,
                require_field(&row, "reference product", path)?,
                uvek,
            );
        }
        Ok(table)
    }

    pub fn insert(&mut self, name: &str, location: &str, unit: &str, product: &str, uvek: &str) {
        self.names.insert(
            (
                name.to_string(),
                location.to_string(),
                unit.to_string(),
                product.to_string(),
            ),
            uvek.to_string(),
        );
    }

    pub fn get(&self, name: &str, location: &str, unit: &str, product: &str) -> Option<&str> {
        let key = (
            name.to_string(),
            location.to_string(),
            unit.to_string(),
            product.to_string(),
        );
        self.names.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitConversion {
    pub factor: f64,
    pub unit: String,
}

/// Conversion factors keyed by exchange name.
pub(crate) fn load_unit_conversions(
    path: &Path,
) -> Result<BTreeMap<String, UnitConversion>, StandardsError> {
    let mut conversions = BTreeMap::new();
    for row in read_csv_rows(path, b';')? {
        let name = require_field(&row, "name", path)?;
        if name.is_empty() {
            continue;
        }
        let factor = parse_number(require_field(&row, "factor", path)?, path)?;
        let unit = require_field(&row, "unit", path)?;
        conversions.insert(
            name.to_string(),
            UnitConversion {
                factor,
                unit: unit.to_string(),
            },
        );
    }
    Ok(conversions)
}

/// A transport activity appended as a synthetic exchange.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransportDataset {
    pub name: String,
    pub reference_product: String,
    pub location: String,
    pub unit: String,
}

/// Distribution distances in kilometres.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransportDistance {
    pub lorry: f64,
    pub rail: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransportTable {
    pub lorry: TransportDataset,
    pub rail: TransportDataset,
    #[serde(skip)]
    pub distances: BTreeMap<String, TransportDistance>,
}

impl TransportTable {
    pub(crate) fn load_distances(&mut self, path: &Path) -> Result<(), StandardsError> {
        for row in read_csv_rows(path, b';')? {
            let name = require_field(&row, "name", path)?;
            if name.is_empty() {
                continue;
            }
            let lorry = parse_number(require_field(&row, "lorry", path)?, path)?;
            let rail = parse_number(require_field(&row, "rail", path)?, path)?;
            self.distances
                .insert(name.to_string(), TransportDistance { lorry, rail });
        }
        Ok(())
    }

    pub fn distance(&self, name: &str) -> Option<TransportDistance> {
        self.distances.get(name).copied()
    }
}
