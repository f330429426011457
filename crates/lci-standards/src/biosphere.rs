//! Biosphere flow tables: the known ecoinvent flow list, name
//! correspondences and the ecoinvent → SimaPro name mapping.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::csv_utils::{read_csv_rows, require_field};
use crate::error::StandardsError;

/// Known `(name, compartment, subcompartment)` triples.
///
/// Flows without a subcompartment are stored under `unspecified`.
#[derive(Debug, Clone, Default)]
pub struct KnownFlows {
    flows: BTreeSet<(String, String, String)>,
}

impl KnownFlows {
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let mut flows = BTreeSet::new();
        for row in read_csv_rows(path, b',')? {
            let name = require_field(&row, "name", path)?;
            let compartment = require_field(&row, "compartment", path)?;
            let subcompartment = require_field(&row, "subcompartment", path)?;
            if name.is_empty() || compartment.is_empty() {
                continue;
            }
            let subcompartment = if subcompartment.is_empty() {
                "unspecified"
            } else {
                subcompartment
            };
            flows.insert((
                name.to_string(),
                compartment.to_string(),
                subcompartment.to_string(),
            ));
        }
        Ok(Self { flows })
    }

    pub fn insert(&mut self, name: &str, compartment: &str, subcompartment: &str) {
        self.flows.insert((
            name.to_string(),
            compartment.to_string(),
            subcompartment.to_string(),
        ));
    }

    pub fn contains(&self, name: &str, compartment: &str, subcompartment: &str) -> bool {
        self.flows.contains(&(
            name.to_string(),
            compartment.to_string(),
            subcompartment.to_string(),
        ))
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

impl FromIterator<(String, String, String)> for KnownFlows {
    fn from_iter<T: IntoIterator<Item = (String, String, String)>>(iter: T) -> Self {
        Self {
            flows: iter.into_iter().collect(),
        }
    }
}

/// Flow renames keyed by compartment, then by source name.
#[derive(Debug, Clone, Default)]
pub struct BiosphereCorrespondence {
    by_compartment: BTreeMap<String, BTreeMap<String, String>>,
}

impl BiosphereCorrespondence {
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let mut table = Self::default();
        for row in read_csv_rows(path, b',')? {
            let compartment = require_field(&row, "compartment", path)?;
            let source = require_field(&row, "source name", path)?;
            let target = require_field(&row, "target name", path)?;
            if source.is_empty() || target.is_empty() {
                continue;
            }
            table.insert(compartment, source, target);
        }
        Ok(table)
    }

    pub fn insert(&mut self, compartment: &str, source: &str, target: &str) {
        self.by_compartment
            .entry(compartment.to_string())
            .or_default()
            .insert(source.to_string(), target.to_string());
    }

    pub fn get(&self, compartment: &str, name: &str) -> Option<&str> {
        self.by_compartment
            .get(compartment)
            .and_then(|names| names.get(name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_compartment.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// SimaPro name for an ecoinvent flow: one name, or one per location.
///
/// In the per-location form the empty key holds the location-less default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BiosphereName {
    Plain(String),
    ByLocation(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Default)]
pub struct SimaproBiosphere {
    entries: BTreeMap<String, BiosphereName>,
}

impl SimaproBiosphere {
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
        let entries = serde_json::from_slice(&bytes).map_err(|source| StandardsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { entries })
    }

    pub fn insert(&mut self, name: impl Into<String>, simapro: BiosphereName) {
        self.entries.insert(name.into(), simapro);
    }

    /// SimaPro name of a flow.
    ///
    /// Per-location entries are tried with the exchange location, its
    /// parent region (text before the first `-`), the activity location,
    /// `GLO`, then the location-less default. Unmapped flows keep their name.
    pub fn resolve<'a>(
        &'a self,
        name: &'a str,
        exchange_location: Option<&str>,
        activity_location: Option<&str>,
    ) -> &'a str {
        match self.entries.get(name) {
            None => name,
            Some(BiosphereName::Plain(simapro)) => simapro,
            Some(BiosphereName::ByLocation(by_location)) => {
                let parent = exchange_location
                    .and_then(|loc| loc.split_once('-'))
                    .map(|(parent, _)| parent);
                [
                    exchange_location,
                    parent,
                    activity_location,
                    Some("GLO"),
                    Some(""),
                ]
                .into_iter()
                .flatten()
                .find_map(|location| by_location.get(location))
                .map_or(name, String::as_str)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water_table(locations: &[(&str, &str)]) -> SimaproBiosphere {
        let mut table = SimaproBiosphere::default();
        let by_location = locations
            .iter()
            .map(|(loc, name)| ((*loc).to_string(), (*name).to_string()))
            .collect();
        table.insert("Water", BiosphereName::ByLocation(by_location));
        table
    }

    #[test]
    fn unmapped_flow_keeps_its_name() {
        let table = SimaproBiosphere::default();
        assert_eq!(
            table.resolve("Water, river", Some("CH"), Some("GLO")),
            "Water, river"
        );
    }

    #[test]
    fn plain_mapping_ignores_location() {
        let mut table = SimaproBiosphere::default();
        table.insert("Water", BiosphereName::Plain("Water, resource".to_string()));
        assert_eq!(table.resolve("Water", Some("CH"), None), "Water, resource");
    }

    #[test]
    fn exchange_location_wins() {
        let table = water_table(&[("CH", "Water, CH"), ("GLO", "Water, GLO")]);
        assert_eq!(table.resolve("Water", Some("CH"), Some("DE")), "Water, CH");
    }

    #[test]
    fn sub_regions_fall_back_to_parent() {
        let table = water_table(&[("CH", "Water, CH"), ("GLO", "Water, GLO")]);
        assert_eq!(table.resolve("Water", Some("CH-01"), None), "Water, CH");
    }

    #[test]
    fn activity_location_is_used_when_exchange_has_none() {
        let table = water_table(&[("BR", "Water, BR"), ("GLO", "Water, GLO")]);
        assert_eq!(table.resolve("Water", None, Some("BR")), "Water, BR");
    }

    #[test]
    fn global_then_default() {
        let table = water_table(&[("GLO", "Water, GLO"), ("", "Water")]);
        assert_eq!(table.resolve("Water", None, None), "Water, GLO");
        let table = water_table(&[("", "Water")]);
        assert_eq!(table.resolve("Water", None, None), "Water");
    }

    #[test]
    fn per_location_without_match_keeps_name() {
        let table = water_table(&[("CH", "Water, CH")]);
        assert_eq!(table.resolve("Water", Some("FR"), Some("DE")), "Water");
    }

    #[test]
    fn known_flows_membership() {
        let flows: KnownFlows = [(
            "Carbon dioxide, fossil".to_string(),
            "air".to_string(),
            "unspecified".to_string(),
        )]
        .into_iter()
        .collect();
        assert!(flows.contains("Carbon dioxide, fossil", "air", "unspecified"));
        assert!(!flows.contains("Carbon dioxide, fossil", "air", "indoor"));
    }
}
