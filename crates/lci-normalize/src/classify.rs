//! Exchange classification: waste treatments, blacklist, unit conversion.

use std::collections::BTreeMap;

use lci_model::{Activity, ActivityKind, Exchange, TargetDatabase};
use lci_standards::{Blacklist, UnitConversion, WasteTerms};

/// Whether a name reads like a waste treatment.
///
/// A keyword match is overridden by any `not_waste` term. For UVEK the
/// target-specific exceptions override it as well.
pub fn is_a_waste_treatment(name: &str, target: TargetDatabase, terms: &WasteTerms) -> bool {
    let name = name.to_lowercase();
    let contains_any =
        |list: &[String]| list.iter().any(|term| name.contains(&term.to_lowercase()));

    if !contains_any(&terms.keywords) {
        return false;
    }
    if contains_any(&terms.not_waste) {
        return false;
    }
    if target == TargetDatabase::Uvek && contains_any(&terms.uvek_exceptions) {
        return false;
    }
    true
}

/// An explicit `type` wins; otherwise the activity name decides.
pub fn is_activity_waste_treatment(
    activity: &Activity,
    target: TargetDatabase,
    terms: &WasteTerms,
) -> bool {
    match activity.kind() {
        Some(ActivityKind::Process) => false,
        Some(ActivityKind::WasteTreatment) => true,
        None => is_a_waste_treatment(&activity.name, target, terms),
    }
}

pub fn is_blacklisted(name: &str, target: TargetDatabase, blacklist: &Blacklist) -> bool {
    blacklist.primary.contains(name)
        || (target == TargetDatabase::Uvek && blacklist.uvek.contains(name))
}

/// Exchange with amount and unit converted for the target, when a
/// conversion is listed for its name. Only UVEK converts units.
pub fn convert_exchange_unit(
    exchange: &Exchange,
    target: TargetDatabase,
    conversions: &BTreeMap<String, UnitConversion>,
) -> Exchange {
    let mut converted = exchange.clone();
    if target != TargetDatabase::Uvek {
        return converted;
    }
    if let Some(conversion) = conversions.get(exchange.name()) {
        converted.amount *= conversion.factor;
        converted.unit = Some(conversion.unit.clone());
    }
    converted
}

/// [`convert_exchange_unit`] over a list; the input is left untouched.
pub fn check_exchanges_for_conversion(
    exchanges: &[Exchange],
    target: TargetDatabase,
    conversions: &BTreeMap<String, UnitConversion>,
) -> Vec<Exchange> {
    exchanges
        .iter()
        .map(|exchange| convert_exchange_unit(exchange, target, conversions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lci_model::ExchangeKind;

    fn terms() -> WasteTerms {
        WasteTerms {
            keywords: vec!["waste".to_string(), "treatment of".to_string()],
            not_waste: vec!["waste heat".to_string()],
            uvek_exceptions: vec!["treatment of wastewater".to_string()],
        }
    }

    #[test]
    fn keyword_marks_waste() {
        assert!(is_a_waste_treatment(
            "treatment of waste plastic, incineration",
            TargetDatabase::Ecoinvent,
            &terms()
        ));
        assert!(!is_a_waste_treatment(
            "market for steel",
            TargetDatabase::Ecoinvent,
            &terms()
        ));
    }

    #[test]
    fn override_wins_over_keyword() {
        assert!(!is_a_waste_treatment(
            "Waste heat, from incineration",
            TargetDatabase::Ecoinvent,
            &terms()
        ));
    }

    #[test]
    fn uvek_exceptions_only_apply_to_uvek() {
        let name = "treatment of wastewater, average";
        assert!(is_a_waste_treatment(name, TargetDatabase::Ecoinvent, &terms()));
        assert!(!is_a_waste_treatment(name, TargetDatabase::Uvek, &terms()));
    }

    #[test]
    fn explicit_activity_type_wins() {
        let mut activity = Activity::new("treatment of waste", "waste", "CH", "kilogram");
        activity.activity_type = Some("process".to_string());
        assert!(!is_activity_waste_treatment(
            &activity,
            TargetDatabase::Ecoinvent,
            &terms()
        ));
        activity.activity_type = None;
        assert!(is_activity_waste_treatment(
            &activity,
            TargetDatabase::Ecoinvent,
            &terms()
        ));
        let mut plant = Activity::new("steel production", "steel", "CH", "kilogram");
        plant.activity_type = Some("waste treatment".to_string());
        assert!(is_activity_waste_treatment(&plant, TargetDatabase::Ecoinvent, &terms()));
    }

    #[test]
    fn uvek_blacklist_is_additive() {
        let mut blacklist = Blacklist::default();
        blacklist.primary.insert("Occupation, unspecified".to_string());
        blacklist.uvek.insert("market for water, decarbonised".to_string());
        assert!(is_blacklisted("Occupation, unspecified", TargetDatabase::Ecoinvent, &blacklist));
        assert!(!is_blacklisted(
            "market for water, decarbonised",
            TargetDatabase::Ecoinvent,
            &blacklist
        ));
        assert!(is_blacklisted(
            "market for water, decarbonised",
            TargetDatabase::Uvek,
            &blacklist
        ));
    }

    #[test]
    fn conversion_only_for_uvek() {
        let mut conversions = BTreeMap::new();
        conversions.insert(
            "market for natural gas, high pressure".to_string(),
            UnitConversion {
                factor: 36.0,
                unit: "megajoule".to_string(),
            },
        );
        let exchanges = vec![
            Exchange::new("market for natural gas, high pressure", 2.0, ExchangeKind::Technosphere)
                .with_unit("cubic meter"),
            Exchange::new("market for steel", 1.0, ExchangeKind::Technosphere)
                .with_unit("kilogram"),
        ];

        let uvek = check_exchanges_for_conversion(&exchanges, TargetDatabase::Uvek, &conversions);
        assert!((uvek[0].amount - 72.0).abs() < 1e-9);
        assert_eq!(uvek[0].unit(), "megajoule");
        assert_eq!(uvek[1], exchanges[1]);

        let ecoinvent =
            check_exchanges_for_conversion(&exchanges, TargetDatabase::Ecoinvent, &conversions);
        assert_eq!(ecoinvent, exchanges);
        assert_eq!(exchanges[0].unit(), "cubic meter");
    }
}
