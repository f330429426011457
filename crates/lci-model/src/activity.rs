//! Activities (Brightway) or datasets (SimaPro): one process record each.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::exchange::{Exchange, ExchangeKind};

/// Explicit activity type from the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Process,
    WasteTreatment,
}

impl ActivityKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "process" => Some(Self::Process),
            "waste treatment" => Some(Self::WasteTreatment),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Process => "process",
            Self::WasteTreatment => "waste treatment",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "reference product", default)]
    pub reference_product: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
    /// Free-form documentation fields (`technology`, `time period`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Activity {
    pub fn new(
        name: impl Into<String>,
        reference_product: impl Into<String>,
        location: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reference_product: reference_product.into(),
            location: location.into(),
            unit: unit.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_exchange(mut self, exchange: Exchange) -> Self {
        self.exchanges.push(exchange);
        self
    }

    /// Parsed `type` field; `None` when absent or not one of the two known kinds.
    pub fn kind(&self) -> Option<ActivityKind> {
        self.activity_type.as_deref().and_then(ActivityKind::parse)
    }

    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.name, &self.reference_product, &self.location)
    }

    /// First production exchange with its index.
    pub fn production_exchange(&self) -> Option<(usize, &Exchange)> {
        self.exchanges
            .iter()
            .enumerate()
            .find(|(_, exchange)| exchange.kind == ExchangeKind::Production)
    }

    pub fn production_count(&self) -> usize {
        self.exchanges
            .iter()
            .filter(|exchange| exchange.kind == ExchangeKind::Production)
            .count()
    }

    /// Documentation field rendered as text, looked up case-insensitively.
    pub fn field_text(&self, field: &str) -> Option<String> {
        let key = field.to_lowercase();
        let value = self
            .extra
            .iter()
            .find(|(name, _)| name.to_lowercase() == key)
            .map(|(_, value)| value)?;
        match value {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_text_is_case_insensitive() {
        let mut activity = Activity::new("a", "b", "CH", "kilogram");
        activity
            .extra
            .insert("Time Period".to_string(), Value::from("2020-2022"));
        activity.extra.insert("record".to_string(), Value::from(7));
        assert_eq!(
            activity.field_text("time period").as_deref(),
            Some("2020-2022")
        );
        assert_eq!(activity.field_text("Record").as_deref(), Some("7"));
        assert_eq!(activity.field_text("technology"), None);
    }

    #[test]
    fn kind_reads_type_field() {
        let mut activity = Activity::new("a", "b", "CH", "kilogram");
        assert_eq!(activity.kind(), None);
        activity.activity_type = Some("Waste treatment".to_string());
        assert_eq!(activity.kind(), Some(ActivityKind::WasteTreatment));
        activity.activity_type = Some("process".to_string());
        assert_eq!(activity.kind(), Some(ActivityKind::Process));
    }
}
