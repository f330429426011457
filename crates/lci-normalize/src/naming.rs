//! Process names in the convention of the linked database.

use lci_model::TargetDatabase;
use lci_standards::ReferenceTables;

const SYSTEM_MODEL: &str = "Cut-off, U";
const MARKET_PREFIXES: [&str; 2] = ["market group for", "market for"];

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name of an exchange as SimaPro knows it in the target database.
///
/// ecoinvent names read `<Product> {<Location>}| <activity> | Cut-off, U`.
/// A global market for one of the listed market-exception products drops
/// the repeated product and keeps only its `market for` prefix; every
/// other name is kept in full. UVEK names come from the UVEK table,
/// falling back to `<name>/<location> U`.
///
/// Names already in the target form are returned unchanged.
pub fn format_exchange_name(
    name: &str,
    reference_product: &str,
    location: &str,
    unit: &str,
    target: TargetDatabase,
    tables: &ReferenceTables,
) -> String {
    match target {
        TargetDatabase::Ecoinvent => ecoinvent_name(name, reference_product, location, tables),
        TargetDatabase::Uvek => {
            if let Some(uvek) = tables
                .uvek_names
                .get(name, location, unit, reference_product)
            {
                return uvek.to_string();
            }
            let suffix = format!("/{location} U");
            if name.ends_with(&suffix) {
                return name.to_string();
            }
            format!("{name}{suffix}")
        }
    }
}

fn ecoinvent_name(
    name: &str,
    reference_product: &str,
    location: &str,
    tables: &ReferenceTables,
) -> String {
    if is_ecoinvent_formatted(name) {
        return name.to_string();
    }
    let activity = collapse_market(name, reference_product, location, tables);
    format!(
        "{} {{{location}}}| {activity} | {SYSTEM_MODEL}",
        capitalize_first(reference_product)
    )
}

fn is_ecoinvent_formatted(name: &str) -> bool {
    name.contains('{') && name.contains("}|") && name.ends_with(SYSTEM_MODEL)
}

fn collapse_market<'a>(
    name: &'a str,
    reference_product: &str,
    location: &str,
    tables: &ReferenceTables,
) -> &'a str {
    let lower = name.to_lowercase();
    let product = reference_product.to_lowercase();
    for prefix in MARKET_PREFIXES {
        let Some(rest) = lower.strip_prefix(prefix) else {
            continue;
        };
        let collapses = rest.trim() == product
            && location == "GLO"
            && tables.names.market_exceptions.contains(&product);
        if !collapses {
            return name;
        }
        return name.get(..prefix.len()).unwrap_or(prefix);
    }
    name
}
