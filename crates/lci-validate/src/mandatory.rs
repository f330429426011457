//! Mandatory exchange fields, checked for a whole inventory before export.

use lci_model::{Activity, Exchange, ExchangeKind};
use tracing::warn;

use crate::error::ValidateError;
use crate::render::missing_fields_table;

/// One exchange missing at least one mandatory field.
///
/// `None` marks a missing field; fields that do not apply to the exchange
/// type hold `Some("--")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields {
    pub activity: String,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub reference_product: Option<String>,
    pub location: Option<String>,
    pub categories: Option<String>,
    pub unit: Option<String>,
}

const NOT_APPLICABLE: &str = "--";

fn present(value: Option<&String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty()).cloned()
}

fn joined_categories(exchange: &Exchange) -> Option<String> {
    exchange
        .categories
        .as_ref()
        .filter(|categories| !categories.is_empty())
        .map(|categories| categories.join("/"))
}

fn missing_fields(activity: &Activity, exchange: &Exchange) -> Option<MissingFields> {
    let name = present(exchange.name.as_ref());
    let unit = present(exchange.unit.as_ref());
    let kind = Some(exchange.kind.as_str().to_string());
    let row = match &exchange.kind {
        missing if missing.is_missing() => MissingFields {
            activity: activity.name.clone(),
            kind: None,
            name,
            reference_product: present(exchange.reference_product.as_ref()),
            location: present(exchange.location.as_ref()),
            categories: joined_categories(exchange),
            unit,
        },
        ExchangeKind::Production | ExchangeKind::Technosphere | ExchangeKind::Substitution => {
            let reference_product = present(exchange.reference_product.as_ref());
            let location = present(exchange.location.as_ref());
            let complete = name.is_some()
                && reference_product.is_some()
                && location.is_some()
                && unit.is_some();
            if complete {
                return None;
            }
            MissingFields {
                activity: activity.name.clone(),
                kind,
                name,
                reference_product,
                location,
                categories: Some(NOT_APPLICABLE.to_string()),
                unit,
            }
        }
        _ => {
            let categories = joined_categories(exchange);
            if name.is_some() && categories.is_some() && unit.is_some() {
                return None;
            }
            MissingFields {
                activity: activity.name.clone(),
                kind,
                name,
                reference_product: Some(NOT_APPLICABLE.to_string()),
                location: Some(NOT_APPLICABLE.to_string()),
                categories,
                unit,
            }
        }
    };
    Some(row)
}

/// Every exchange of every activity missing a mandatory field.
///
/// Every exchange needs a `type`. Production, technosphere and substitution
/// exchanges need a name, reference product, location and unit; all other
/// exchanges need a name, categories and unit.
pub fn find_missing_fields(activities: &[Activity]) -> Vec<MissingFields> {
    activities
        .iter()
        .flat_map(|activity| {
            activity
                .exchanges
                .iter()
                .filter_map(move |exchange| missing_fields(activity, exchange))
        })
        .collect()
}

/// Fail once for the whole inventory when any mandatory field is missing.
pub fn check_inventories(activities: &[Activity]) -> Result<(), ValidateError> {
    let missing = find_missing_fields(activities);
    if missing.is_empty() {
        return Ok(());
    }
    warn!(count = missing.len(), "exchanges without mandatory fields");
    Err(ValidateError::MissingMandatoryFields {
        count: missing.len(),
        table: missing_fields_table(&missing).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biosphere_needs_categories() {
        let activity = Activity::new("a", "b", "CH", "kilogram").with_exchange(
            Exchange::new("Carbon dioxide, fossil", 1.0, ExchangeKind::Biosphere)
                .with_unit("kilogram"),
        );
        let missing = find_missing_fields(&[activity]);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].categories, None);
        assert_eq!(missing[0].location.as_deref(), Some("--"));
    }

    #[test]
    fn avoided_product_needs_technosphere_fields() {
        let activity = Activity::new("a", "b", "CH", "kilogram").with_exchange(
            Exchange::new("market for heat", -2.0, ExchangeKind::Substitution)
                .with_product("heat")
                .with_location("CH")
                .with_unit("megajoule"),
        );
        assert!(check_inventories(&[activity]).is_ok());

        let activity = Activity::new("a", "b", "CH", "kilogram").with_exchange(
            Exchange::new("market for heat", -2.0, ExchangeKind::Substitution)
                .with_unit("megajoule"),
        );
        let missing = find_missing_fields(&[activity]);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].reference_product, None);
        assert_eq!(missing[0].categories.as_deref(), Some("--"));
    }

    #[test]
    fn exchange_without_type_is_missing_a_field() {
        let exchange = Exchange::new("market for steel", 1.0, ExchangeKind::missing())
            .with_product("steel")
            .with_location("GLO")
            .with_unit("kilogram");
        let activity = Activity::new("a", "b", "CH", "kilogram").with_exchange(exchange);

        let missing = find_missing_fields(&[activity]);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].kind, None);
        assert_eq!(missing[0].location.as_deref(), Some("GLO"));
    }

    #[test]
    fn complete_technosphere_passes() {
        let activity = Activity::new("a", "b", "CH", "kilogram").with_exchange(
            Exchange::new("market for steel", 1.0, ExchangeKind::Technosphere)
                .with_product("steel")
                .with_location("GLO")
                .with_unit("kilogram"),
        );
        assert!(check_inventories(&[activity]).is_ok());
    }
}
