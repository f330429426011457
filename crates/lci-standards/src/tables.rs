//! The full set of reference tables for one conversion run.
//!
//! Tables are loaded once into a [`ReferenceTables`] value and passed to
//! the components that need them. Every table type also has a public
//! constructor path (`Default` plus `insert`/field access) so tests can
//! build small substitute tables in memory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::biosphere::{BiosphereCorrespondence, KnownFlows, SimaproBiosphere};
use crate::csv_utils::{read_csv_rows, require_field};
use crate::error::StandardsError;
use crate::paths::default_data_root;
use crate::technosphere::{TransportTable, UnitConversion, UvekNames, load_unit_conversions};

/// Brightway → SimaPro unit names, plus the units routed to `Electricity/heat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitTable {
    #[serde(default)]
    pub energy: Vec<String>,
    pub units: BTreeMap<String, String>,
    /// Brightway name read back for symbols shared by several units.
    #[serde(default)]
    pub preferred: BTreeMap<String, String>,
}

impl UnitTable {
    pub fn simapro(&self, unit: &str) -> Option<&str> {
        self.units.get(unit).map(String::as_str)
    }

    /// Brightway unit for a SimaPro symbol.
    pub fn brightway(&self, symbol: &str) -> Option<&str> {
        if let Some(preferred) = self.preferred.get(symbol) {
            return Some(preferred);
        }
        self.units
            .iter()
            .find(|(_, simapro)| simapro.as_str() == symbol)
            .map(|(brightway, _)| brightway.as_str())
    }

    pub fn is_energy(&self, unit: &str) -> bool {
        self.energy.iter().any(|energy| energy == unit)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Blacklist {
    #[serde(default)]
    pub primary: BTreeSet<String>,
    #[serde(default)]
    pub uvek: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteTerms {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub not_waste: Vec<String>,
    #[serde(default)]
    pub uvek_exceptions: Vec<String>,
}

/// How a generic activity word is combined with the reference product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameForm {
    /// `<word> <product>`
    Prefix,
    /// `<product> (<word>)`
    Suffix,
    /// Name left as is.
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenericNameRule {
    pub form: NameForm,
    /// Replacement for the matched word in the rebuilt name.
    #[serde(default)]
    pub word: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameRules {
    #[serde(default)]
    pub strip_suffixes: Vec<String>,
    #[serde(default)]
    pub market_exceptions: BTreeSet<String>,
    #[serde(default)]
    pub location_aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub generic_names: BTreeMap<String, GenericNameRule>,
}

#[derive(Debug, Deserialize)]
struct FieldsFile {
    fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HeadersFile {
    headers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CandidatesFile {
    candidates: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SubcompartmentsFile {
    subcompartments: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub units: UnitTable,
    pub fields: Vec<String>,
    pub headers: Vec<String>,
    pub blacklist: Blacklist,
    pub waste: WasteTerms,
    pub names: NameRules,
    /// Ordered fallback subcompartments per compartment.
    pub biosphere_candidates: BTreeMap<String, Vec<String>>,
    /// ecoinvent → SimaPro subcompartment names.
    pub subcompartments: BTreeMap<String, String>,
    pub simapro_biosphere: SimaproBiosphere,
    pub known_flows: KnownFlows,
    pub correspondence: BiosphereCorrespondence,
    pub uvek_names: UvekNames,
    pub unit_conversions: BTreeMap<String, UnitConversion>,
    pub transport: TransportTable,
    /// `(token, replacement)` pairs applied to raw SimaPro unit cells.
    pub forbidden_units: Vec<(String, String)>,
}

impl ReferenceTables {
    /// Load every table from `dir`.
    pub fn load(dir: &Path) -> Result<Self, StandardsError> {
        let units: UnitTable = read_toml(&dir.join("units.toml"))?;
        let fields: FieldsFile = read_toml(&dir.join("fields.toml"))?;
        let headers: HeadersFile = read_toml(&dir.join("headers.toml"))?;
        let blacklist: Blacklist = read_toml(&dir.join("blacklist.toml"))?;
        let waste: WasteTerms = read_toml(&dir.join("waste_treatment.toml"))?;
        let names: NameRules = read_toml(&dir.join("names.toml"))?;
        let candidates: CandidatesFile = read_toml(&dir.join("biosphere_candidates.toml"))?;
        let subcompartments: SubcompartmentsFile = read_toml(&dir.join("subcompartments.toml"))?;
        let mut transport: TransportTable = read_toml(&dir.join("transport.toml"))?;
        transport.load_distances(&dir.join("transport_distances.csv"))?;

        let tables = Self {
            units,
            fields: fields.fields,
            headers: headers.headers,
            blacklist,
            waste,
            names,
            biosphere_candidates: candidates.candidates,
            subcompartments: subcompartments.subcompartments,
            simapro_biosphere: SimaproBiosphere::load(&dir.join("simapro_biosphere.json"))?,
            known_flows: KnownFlows::load(&dir.join("biosphere_flows.csv"))?,
            correspondence: BiosphereCorrespondence::load(
                &dir.join("biosphere_correspondence.csv"),
            )?,
            uvek_names: UvekNames::load(&dir.join("technosphere_uvek.csv"))?,
            unit_conversions: load_unit_conversions(&dir.join("unit_conversion.csv"))?,
            transport,
            forbidden_units: load_forbidden_units(&dir.join("forbidden_units.csv"))?,
        };
        debug!(
            dir = %dir.display(),
            known_flows = tables.known_flows.len(),
            units = tables.units.units.len(),
            "reference tables loaded"
        );
        Ok(tables)
    }

    /// SimaPro subcompartment for an ecoinvent one.
    pub fn simapro_subcompartment(&self, subcompartment: &str) -> Option<&str> {
        self.subcompartments.get(subcompartment).map(String::as_str)
    }

    /// ecoinvent subcompartment for a SimaPro one; the empty SimaPro
    /// subcompartment reads back as `unspecified`.
    pub fn ecoinvent_subcompartment(&self, simapro: &str) -> Option<&str> {
        if simapro.is_empty() {
            return Some("unspecified");
        }
        self.subcompartments
            .iter()
            .find(|(_, value)| value.as_str() == simapro)
            .map(|(key, _)| key.as_str())
    }

    /// Table name and entry count, for display.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("units", self.units.units.len()),
            ("fields", self.fields.len()),
            ("headers", self.headers.len()),
            (
                "blacklist",
                self.blacklist.primary.len() + self.blacklist.uvek.len(),
            ),
            (
                "waste terms",
                self.waste.keywords.len()
                    + self.waste.not_waste.len()
                    + self.waste.uvek_exceptions.len(),
            ),
            ("location aliases", self.names.location_aliases.len()),
            ("generic names", self.names.generic_names.len()),
            ("subcompartments", self.subcompartments.len()),
            ("simapro biosphere", self.simapro_biosphere.len()),
            ("known flows", self.known_flows.len()),
            ("correspondences", self.correspondence.len()),
            ("uvek names", self.uvek_names.len()),
            ("unit conversions", self.unit_conversions.len()),
            ("transport distances", self.transport.distances.len()),
            ("forbidden units", self.forbidden_units.len()),
        ]
    }
}

/// Load the tables bundled with the workspace (or from `LCI_DATA_DIR`).
pub fn load_default_tables() -> Result<ReferenceTables, StandardsError> {
    ReferenceTables::load(&default_data_root())
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, StandardsError> {
    let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    toml::from_str(&text).map_err(|source| StandardsError::Toml {
        path: PathBuf::from(path),
        source,
    })
}

fn load_forbidden_units(path: &Path) -> Result<Vec<(String, String)>, StandardsError> {
    let mut pairs = Vec::new();
    for row in read_csv_rows(path, b';')? {
        let token = require_field(&row, "token", path)?;
        let replacement = require_field(&row, "replacement", path)?;
        if token.is_empty() {
            continue;
        }
        pairs.push((token.to_string(), replacement.to_string()));
    }
    Ok(pairs)
}
