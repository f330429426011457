//! Biosphere flow reconciliation.
//!
//! SimaPro and successive ecoinvent releases disagree on a handful of flow
//! names and on which subcompartment a flow lives in. Flows are matched
//! against the known `(name, compartment, subcompartment)` list, first as
//! given, then under their corresponding name, then under each fallback
//! subcompartment of the compartment.

use lci_model::Exchange;
use lci_standards::ReferenceTables;
use tracing::debug;

const IN_GROUND_SUFFIX: &str = ", in ground";
const NATURAL_RESOURCE: &str = "natural resource";
const UNSPECIFIED: &str = "unspecified";

/// What [`format_biosphere_exchange`] did to a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiosphereResolution {
    /// Matched a known flow as given (after version fixes).
    Known,
    /// Matched after renaming through the correspondence table.
    Remapped,
    /// Matched after moving the flow to a fallback subcompartment.
    Recategorized,
    /// No known flow matched; the exchange is left as it was.
    Unresolved,
}

impl BiosphereResolution {
    pub fn is_resolved(self) -> bool {
        self != Self::Unresolved
    }
}

/// Normalise a biosphere exchange in place against the known flow list.
///
/// From ecoinvent 3.9 on, resources drop their `, in ground` suffix and sit
/// in `natural resource/in ground`; earlier versions get the suffix back
/// when that is the known spelling.
pub fn format_biosphere_exchange(
    exchange: &mut Exchange,
    ecoinvent_version: &str,
    tables: &ReferenceTables,
) -> BiosphereResolution {
    apply_version_fixes(exchange, ecoinvent_version, tables);

    let Some(compartment) = exchange.compartment().map(str::to_string) else {
        debug!(flow = exchange.name(), "biosphere flow without categories");
        return BiosphereResolution::Unresolved;
    };
    let subcompartment = exchange.subcompartment().unwrap_or(UNSPECIFIED).to_string();
    let known = &tables.known_flows;

    if known.contains(exchange.name(), &compartment, &subcompartment) {
        return BiosphereResolution::Known;
    }

    let mut remapped = false;
    if let Some(target) = tables.correspondence.get(&compartment, exchange.name()) {
        exchange.name = Some(target.to_string());
        remapped = true;
        if known.contains(target, &compartment, &subcompartment) {
            return BiosphereResolution::Remapped;
        }
    }

    let candidates = tables
        .biosphere_candidates
        .get(&compartment)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if let Some(candidate) = candidates
        .iter()
        .find(|candidate| known.contains(exchange.name(), &compartment, candidate))
    {
        exchange.categories = Some(vec![compartment, candidate.clone()]);
        return BiosphereResolution::Recategorized;
    }

    debug!(
        flow = exchange.name(),
        compartment = %compartment,
        subcompartment = %subcompartment,
        remapped,
        "biosphere flow not found in the known flow list"
    );
    BiosphereResolution::Unresolved
}

fn apply_version_fixes(exchange: &mut Exchange, ecoinvent_version: &str, tables: &ReferenceTables) {
    let name = exchange.name().to_string();

    if version_at_least(ecoinvent_version, (3, 9)) {
        if name.contains(IN_GROUND_SUFFIX) {
            exchange.name = Some(name.replace(IN_GROUND_SUFFIX, ""));
            exchange.categories = Some(vec![NATURAL_RESOURCE.to_string(), "in ground".to_string()]);
        }
    } else if exchange.compartment() == Some(NATURAL_RESOURCE)
        && exchange.subcompartment() == Some("in ground")
        && !name.contains(IN_GROUND_SUFFIX)
    {
        let suffixed = format!("{name}{IN_GROUND_SUFFIX}");
        if tables
            .known_flows
            .contains(&suffixed, NATURAL_RESOURCE, "in ground")
        {
            exchange.name = Some(suffixed);
        }
    }

    let name = exchange.name();
    if name.starts_with("Water, well") {
        exchange.name = Some("Water, well, in ground".to_string());
    } else if (name.starts_with("Water, lake") || name.starts_with("Water, cooling"))
        && exchange.compartment() == Some(NATURAL_RESOURCE)
    {
        exchange.categories = Some(vec![NATURAL_RESOURCE.to_string(), "in water".to_string()]);
    }
}

/// `major.minor` comparison; unparsable versions count as the newest.
fn version_at_least(version: &str, minimum: (u32, u32)) -> bool {
    let mut parts = version.trim().split('.').map(str::parse::<u32>);
    match (parts.next(), parts.next()) {
        (Some(Ok(major)), Some(Ok(minor))) => (major, minor) >= minimum,
        (Some(Ok(major)), None) => (major, 0) >= minimum,
        _ => true,
    }
}

/// SimaPro subcategory of a `simapro category` path: everything after the
/// first segment, joined with backslashes.
pub fn get_subcategory(category: &str) -> String {
    category
        .split('/')
        .skip(1)
        .collect::<Vec<_>>()
        .join("\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lci_model::ExchangeKind;

    fn biosphere(name: &str, categories: &[&str]) -> Exchange {
        Exchange::new(name, 1.0, ExchangeKind::Biosphere)
            .with_unit("kilogram")
            .with_categories(categories)
    }

    fn tables() -> ReferenceTables {
        let mut tables = ReferenceTables::default();
        tables.known_flows.insert("Carbon dioxide, fossil", "air", "unspecified");
        tables
            .known_flows
            .insert("Zinc", "soil", "industrial");
        tables
            .known_flows
            .insert("Oil, crude", "natural resource", "in ground");
        tables
            .known_flows
            .insert("Water, well, in ground", "natural resource", "in water");
        tables
            .correspondence
            .insert("air", "Carbon dioxide", "Carbon dioxide, fossil");
        tables.biosphere_candidates.insert(
            "soil".to_string(),
            vec!["agricultural".to_string(), "industrial".to_string()],
        );
        tables
    }

    #[test]
    fn known_flow_is_untouched() {
        let mut exchange = biosphere("Carbon dioxide, fossil", &["air"]);
        let outcome = format_biosphere_exchange(&mut exchange, "3.9", &tables());
        assert_eq!(outcome, BiosphereResolution::Known);
        assert_eq!(exchange.categories, Some(vec!["air".to_string()]));
    }

    #[test]
    fn correspondence_renames_flow() {
        let mut exchange = biosphere("Carbon dioxide", &["air", "unspecified"]);
        let outcome = format_biosphere_exchange(&mut exchange, "3.9", &tables());
        assert_eq!(outcome, BiosphereResolution::Remapped);
        assert_eq!(exchange.name(), "Carbon dioxide, fossil");
    }

    #[test]
    fn fallback_subcompartment_is_first_match() {
        let mut exchange = biosphere("Zinc", &["soil"]);
        let outcome = format_biosphere_exchange(&mut exchange, "3.9", &tables());
        assert_eq!(outcome, BiosphereResolution::Recategorized);
        assert_eq!(exchange.subcompartment(), Some("industrial"));
    }

    #[test]
    fn in_ground_suffix_dropped_from_3_9() {
        let mut exchange = biosphere("Oil, crude, in ground", &["natural resource"]);
        let outcome = format_biosphere_exchange(&mut exchange, "3.10", &tables());
        assert_eq!(outcome, BiosphereResolution::Known);
        assert_eq!(exchange.name(), "Oil, crude");
        assert_eq!(exchange.subcompartment(), Some("in ground"));
    }

    #[test]
    fn in_ground_suffix_restored_before_3_9() {
        let mut tables = tables();
        tables
            .known_flows
            .insert("Gas, natural, in ground", "natural resource", "in ground");
        let mut exchange = biosphere("Gas, natural", &["natural resource", "in ground"]);
        let outcome = format_biosphere_exchange(&mut exchange, "3.8", &tables);
        assert_eq!(outcome, BiosphereResolution::Known);
        assert_eq!(exchange.name(), "Gas, natural, in ground");
    }

    #[test]
    fn well_water_is_renamed() {
        let mut exchange = biosphere("Water, well, DE", &["natural resource", "in water"]);
        let outcome = format_biosphere_exchange(&mut exchange, "3.8", &tables());
        assert_eq!(exchange.name(), "Water, well, in ground");
        assert_eq!(outcome, BiosphereResolution::Known);
    }

    #[test]
    fn unknown_flow_is_left_alone() {
        let mut exchange = biosphere("Unobtainium", &["air", "indoor"]);
        let before = exchange.clone();
        let outcome = format_biosphere_exchange(&mut exchange, "3.9", &tables());
        assert_eq!(outcome, BiosphereResolution::Unresolved);
        assert_eq!(exchange, before);
    }

    #[test]
    fn version_comparison() {
        assert!(version_at_least("3.9", (3, 9)));
        assert!(version_at_least("3.10", (3, 9)));
        assert!(version_at_least("4", (3, 9)));
        assert!(!version_at_least("3.8", (3, 9)));
    }

    #[test]
    fn subcategory_joins_with_backslash() {
        assert_eq!(get_subcategory("materials/plastics"), "plastics");
        assert_eq!(get_subcategory("materials/plastics/granulate"), "plastics\\granulate");
        assert_eq!(get_subcategory("materials"), "");
    }
}
