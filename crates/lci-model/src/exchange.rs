//! Exchanges: the flows attached to an activity.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Exchange type as written in the `type` field.
///
/// Unrecognised types are kept verbatim so the validation pass can report
/// them instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExchangeKind {
    Production,
    #[default]
    Technosphere,
    Substitution,
    Biosphere,
    Other(String),
}

impl ExchangeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Production => "production",
            Self::Technosphere => "technosphere",
            Self::Substitution => "substitution",
            Self::Biosphere => "biosphere",
            Self::Other(raw) => raw,
        }
    }

    /// Placeholder for an exchange read without a `type` field.
    pub fn missing() -> Self {
        Self::Other(String::new())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Other(raw) if raw.trim().is_empty())
    }

    /// True for the types a finished Brightway dataset may contain.
    pub fn is_known(&self) -> bool {
        matches!(
            self,
            Self::Production | Self::Technosphere | Self::Biosphere
        )
    }
}

impl From<String> for ExchangeKind {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" => Self::Production,
            "technosphere" => Self::Technosphere,
            "substitution" => Self::Substitution,
            "biosphere" => Self::Biosphere,
            _ => Self::Other(value),
        }
    }
}

impl From<ExchangeKind> for String {
    fn from(value: ExchangeKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flow of an activity.
///
/// Identity fields are optional because inventories are checked for
/// mandatory fields as a batch after loading; accessors return an empty
/// string for absent values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "reference product",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", default = "ExchangeKind::missing")]
    pub kind: ExchangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(
        rename = "uncertainty type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub uncertainty_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(
        rename = "simapro category",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub simapro_category: Option<String>,
    /// Name of the flow before normalization, as found in the source file.
    #[serde(
        rename = "simapro name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Exchange {
    pub fn new(name: impl Into<String>, amount: f64, kind: ExchangeKind) -> Self {
        Self {
            name: Some(name.into()),
            amount,
            kind,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.reference_product = Some(product.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = Some(categories.iter().map(|c| (*c).to_string()).collect());
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn reference_product(&self) -> &str {
        self.reference_product.as_deref().unwrap_or("")
    }

    pub fn unit(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }

    /// Location, `GLO` when absent.
    pub fn location_or_global(&self) -> &str {
        self.location
            .as_deref()
            .filter(|loc| !loc.is_empty())
            .unwrap_or("GLO")
    }

    /// First category (the compartment of a biosphere flow).
    pub fn compartment(&self) -> Option<&str> {
        self.categories
            .as_ref()
            .and_then(|cats| cats.first())
            .map(String::as_str)
    }

    /// Second category, if any.
    pub fn subcompartment(&self) -> Option<&str> {
        self.categories
            .as_ref()
            .and_then(|cats| cats.get(1))
            .map(String::as_str)
    }

    pub fn is_production(&self) -> bool {
        self.kind == ExchangeKind::Production
    }

    pub fn is_technosphere(&self) -> bool {
        self.kind == ExchangeKind::Technosphere
    }

    pub fn is_biosphere(&self) -> bool {
        self.kind == ExchangeKind::Biosphere
    }
}
