use lci_standards::{NameForm, ReferenceTables, StandardsError, load_default_tables};

#[test]
fn loads_bundled_tables() {
    let tables = load_default_tables().expect("load tables");
    assert_eq!(tables.units.simapro("kilogram"), Some("kg"));
    assert!(tables.units.is_energy("kilowatt hour"));
    assert!(!tables.units.is_energy("kilogram"));
    assert_eq!(tables.fields.first().map(String::as_str), Some("Process"));
    assert_eq!(tables.fields.last().map(String::as_str), Some("End"));
    assert!(tables.headers.iter().any(|line| line.contains("today_date")));
    assert!(!tables.known_flows.is_empty());
    assert!(!tables.blacklist.primary.is_empty());
}

#[test]
fn name_rules_cover_market_words() {
    let tables = load_default_tables().expect("load tables");
    let market = tables
        .names
        .generic_names
        .get("market")
        .expect("market rule");
    assert_eq!(market.form, NameForm::Prefix);
    assert_eq!(market.word.as_deref(), Some("market for"));
    assert_eq!(
        tables.names.generic_names["production"].form,
        NameForm::Suffix
    );
    assert_eq!(
        tables.names.location_aliases.get("WECC, US only").map(String::as_str),
        Some("US-WECC")
    );
}

#[test]
fn biosphere_tables_are_consistent() {
    let tables = load_default_tables().expect("load tables");
    assert!(
        tables
            .known_flows
            .contains("Carbon dioxide, fossil", "air", "low population density, long-term")
    );
    assert_eq!(
        tables.correspondence.get("air", "Carbon dioxide"),
        Some("Carbon dioxide, fossil")
    );
    assert_eq!(
        tables.simapro_biosphere.resolve("Water, river", Some("CH"), None),
        "Water, river, CH"
    );
}

#[test]
fn subcompartments_map_both_ways() {
    let tables = load_default_tables().expect("load tables");
    assert_eq!(
        tables.simapro_subcompartment("urban air close to ground"),
        Some("high. pop.")
    );
    assert_eq!(
        tables.ecoinvent_subcompartment("high. pop."),
        Some("urban air close to ground")
    );
    assert_eq!(tables.ecoinvent_subcompartment(""), Some("unspecified"));
    assert_eq!(tables.units.brightway("kWh"), Some("kilowatt hour"));
    assert_eq!(tables.units.brightway("p"), Some("unit"));
    assert_eq!(tables.units.brightway("l"), Some("litre"));
}

#[test]
fn uvek_tables_are_keyed_by_identity() {
    let tables = load_default_tables().expect("load tables");
    assert_eq!(
        tables.uvek_names.get(
            "market for electricity, low voltage",
            "CH",
            "kilowatt hour",
            "electricity, low voltage"
        ),
        Some("Electricity, low voltage, at grid/CH U")
    );
    let conversion = tables
        .unit_conversions
        .get("market for natural gas, high pressure")
        .expect("conversion");
    assert_eq!(conversion.unit, "megajoule");
    let distance = tables
        .transport
        .distance("market for steel, low-alloyed")
        .expect("distance");
    assert!((distance.lorry - 100.0).abs() < f64::EPSILON);
    assert_eq!(tables.transport.lorry.unit, "ton kilometer");
}

#[test]
fn counts_list_every_table() {
    let tables = load_default_tables().expect("load tables");
    let counts = tables.counts();
    assert_eq!(counts.len(), 15);
    assert!(counts.iter().all(|(_, count)| *count > 0));
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = ReferenceTables::load(dir.path()).expect_err("no tables");
    assert!(matches!(error, StandardsError::Io { .. }));
}

#[test]
fn malformed_toml_is_reported_with_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("units.toml"), "units = [").expect("write");
    let error = ReferenceTables::load(dir.path()).expect_err("bad toml");
    match error {
        StandardsError::Toml { path, .. } => assert!(path.ends_with("units.toml")),
        other => panic!("unexpected error: {other}"),
    }
}
