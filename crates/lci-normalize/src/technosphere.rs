//! Parsing of SimaPro technosphere names.
//!
//! SimaPro writes ecoinvent processes as
//! `<Product> {<Location>}| <activity> | <system model>`, optionally with a
//! fourth qualifier. This module splits such a string back into the
//! Brightway triple.

use lci_standards::{NameForm, NameRules};

/// Location used when the composite name carries none.
pub const GLOBAL_LOCATION: &str = "GLO";

/// Brightway identity recovered from a SimaPro name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnosphereName {
    pub name: String,
    pub reference_product: String,
    pub location: String,
}

/// Split a pipe-delimited SimaPro name into `(name, reference product, location)`.
///
/// With a single segment the product doubles as the name. Only the first
/// two segments are read; trailing qualifiers are dropped.
pub fn format_technosphere_exchange(raw: &str, rules: &NameRules) -> TechnosphereName {
    let mut segments = raw.split('|');
    let product_segment = segments.next().unwrap_or_default();
    let name_segment = segments.next();

    let (product, location) = split_location(product_segment);

    let mut reference_product = product.trim().to_string();
    while reference_product.ends_with([',', '.']) {
        reference_product.pop();
        reference_product.truncate(reference_product.trim_end().len());
    }

    let mut name = name_segment
        .map(|segment| strip_markers(segment, rules))
        .unwrap_or_default();
    if name.is_empty() {
        name.clone_from(&reference_product);
    } else if let Some(rule) = rules.generic_names.get(&name) {
        let word = rule.word.as_deref().unwrap_or(&name);
        name = match rule.form {
            NameForm::Prefix => format!("{word} {reference_product}"),
            NameForm::Suffix => format!("{reference_product} ({word})"),
            NameForm::Passthrough => name.clone(),
        };
    }

    let location = location.replace('}', "");
    let location = location.trim();
    let location = rules
        .location_aliases
        .get(location)
        .map_or(location, String::as_str)
        .to_string();

    TechnosphereName {
        name,
        reference_product,
        location,
    }
}

/// Separate the `{Location}` part of a product segment.
///
/// Text after the closing brace belongs to the product.
fn split_location(segment: &str) -> (String, String) {
    let Some((product, rest)) = segment.split_once('{') else {
        return (segment.to_string(), GLOBAL_LOCATION.to_string());
    };
    let (location, trailing) = rest.split_once('}').unwrap_or((rest, ""));
    let trailing = trailing.trim();
    let product = if trailing.is_empty() {
        product.to_string()
    } else {
        format!("{product} {trailing}").replace("  ", " ")
    };
    (product, location.to_string())
}

fn strip_markers(segment: &str, rules: &NameRules) -> String {
    let mut name = segment.trim().to_lowercase();
    for marker in &rules.strip_suffixes {
        name = name.replace(marker.as_str(), "");
    }
    name.trim().to_string()
}
