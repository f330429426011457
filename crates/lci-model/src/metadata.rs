//! Inventory metadata supplied by the user: system descriptions and
//! literature references appended to the SimaPro export.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryMetadata {
    #[serde(rename = "system description")]
    pub system_description: Vec<SystemDescription>,
    #[serde(rename = "literature reference")]
    pub literature_reference: Vec<LiteratureReference>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemDescription {
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "cut-off rules",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cut_off_rules: Option<String>,
    #[serde(
        rename = "energy model",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub energy_model: Option<String>,
    #[serde(
        rename = "transport model",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transport_model: Option<String>,
    #[serde(
        rename = "allocation rules",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allocation_rules: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteratureReference {
    pub name: String,
    pub category: String,
    #[serde(
        rename = "documentation link",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub documentation_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SystemDescription {
    /// Key/value pairs in SimaPro block order; absent optional keys are skipped.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = vec![("Name", self.name.as_str()), ("Category", self.category.as_str())];
        let optional = [
            ("Description", &self.description),
            ("Cut-off rules", &self.cut_off_rules),
            ("Energy model", &self.energy_model),
            ("Transport model", &self.transport_model),
            ("Allocation rules", &self.allocation_rules),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                entries.push((label, value.as_str()));
            }
        }
        entries
    }
}

impl LiteratureReference {
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = vec![("Name", self.name.as_str()), ("Category", self.category.as_str())];
        let optional = [
            ("Documentation link", &self.documentation_link),
            ("Comment", &self.comment),
            ("Description", &self.description),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                entries.push((label, value.as_str()));
            }
        }
        entries
    }
}

impl InventoryMetadata {
    /// Check the constraints serde cannot express: non-empty required
    /// values and unique names within each list.
    pub fn validate(&self) -> Result<()> {
        let system = self
            .system_description
            .iter()
            .map(|item| (item.name.as_str(), item.category.as_str()));
        check_list("system description", system)?;
        let literature = self
            .literature_reference
            .iter()
            .map(|item| (item.name.as_str(), item.category.as_str()));
        check_list("literature reference", literature)
    }

    /// Name of the first system description, used for the process field.
    pub fn system_description_name(&self) -> Option<&str> {
        self.system_description.first().map(|item| item.name.as_str())
    }

    pub fn literature_reference_name(&self) -> Option<&str> {
        self.literature_reference
            .first()
            .map(|item| item.name.as_str())
    }
}

fn check_list<'a>(
    list: &'static str,
    items: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<()> {
    let mut seen = BTreeSet::new();
    for (index, (name, category)) in items.enumerate() {
        if name.trim().is_empty() {
            return Err(ModelError::EmptyField {
                list,
                index,
                key: "name",
            });
        }
        if category.trim().is_empty() {
            return Err(ModelError::EmptyField {
                list,
                index,
                key: "category",
            });
        }
        if !seen.insert(name) {
            return Err(ModelError::DuplicateName {
                list,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
