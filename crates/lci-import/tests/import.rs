//! SimaPro exports normalised against the bundled reference tables.

use std::path::Path;
use std::sync::LazyLock;

use lci_import::{
    BIOSPHERE_DATABASE, ImportError, ImportOptions, default_output_path, import_simapro,
    write_datasets,
};
use lci_model::{Activity, Exchange, ExchangeKind, IssueKind};
use lci_standards::{ReferenceTables, load_default_tables};

static TABLES: LazyLock<ReferenceTables> =
    LazyLock::new(|| load_default_tables().expect("bundled tables load"));

const EXPORT: &str = "{SimaPro 9.5.0.1}
{processes}

Process

Category type
material

Process name
Widget, at plant

Products
Widget {CH}| production | Cut-off, U;kg;2;100;not defined;Plastics\\Granulate;

Avoided products
Heat {CH}| market for | Cut-off, U;MJ;4;Undefined;0;0;0;

Materials/fuels
Steel {GLO}| market for | Cut-off, U;kg;1.5;Lognormal;1.2;0;0;
Copper {GLO}| market for | Cut-off, U;kg;0;Undefined;0;0;0;

Emissions to air
Methane;;kg;0.01;Undefined;0;0;0;

Emissions to soil
Unobtainium;;kg;1;Undefined;0;0;0;

Waste to treatment
Scrap {CH}| treatment of | Cut-off, U;kg;0.2;Undefined;0;0;0;

End

Process

Waste treatment
Used widget {CH}| treatment of | Cut-off, U;kg;1;not defined;Waste treatment\\Others;

End

Process

End

System description

Name
Widget system

End
";

fn write_export(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("widgets.csv");
    std::fs::write(&path, EXPORT).unwrap();
    path
}

fn find<'a>(activity: &'a Activity, name: &str) -> &'a Exchange {
    activity
        .exchanges
        .iter()
        .find(|exchange| exchange.name() == name)
        .unwrap_or_else(|| panic!("no exchange named {name}"))
}

#[test]
fn datasets_take_brightway_names() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = import_simapro(&write_export(dir.path()), &ImportOptions::default(), &TABLES)
        .unwrap();

    assert_eq!(outcome.database, "widgets");
    assert_eq!(outcome.datasets.len(), 2);
    let widget = &outcome.datasets[0];
    assert_eq!(widget.name, "Widget (production)");
    assert_eq!(widget.reference_product, "Widget");
    assert_eq!(widget.location, "CH");

    let production = &widget.exchanges[0];
    assert_eq!(production.kind, ExchangeKind::Production);
    assert_eq!(production.name(), widget.name);
    assert_eq!(
        production.original_name.as_deref(),
        Some("Widget {CH}| production | Cut-off, U")
    );
    assert!(outcome.summary.report.is_empty());
}

#[test]
fn signs_follow_brightway_conventions() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = import_simapro(&write_export(dir.path()), &ImportOptions::default(), &TABLES)
        .unwrap();
    let widget = &outcome.datasets[0];

    let heat = find(widget, "market for Heat");
    assert_eq!(heat.kind, ExchangeKind::Technosphere);
    assert_eq!(heat.unit(), "megajoule");
    assert!((heat.amount + 4.0).abs() < f64::EPSILON);

    let scrap = find(widget, "treatment of Scrap");
    assert!((scrap.amount + 0.2).abs() < f64::EPSILON);

    let treatment = &outcome.datasets[1];
    assert_eq!(treatment.activity_type.as_deref(), Some("waste treatment"));
    assert!((treatment.exchanges[0].amount + 1.0).abs() < f64::EPSILON);
    assert_eq!(outcome.summary.substitutions, 1);
}

#[test]
fn empty_datasets_and_zero_exchanges_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = import_simapro(&write_export(dir.path()), &ImportOptions::default(), &TABLES)
        .unwrap();

    assert_eq!(outcome.summary.dropped_datasets, 1);
    assert_eq!(outcome.summary.dropped_exchanges, 1);
    assert!(
        outcome.datasets[0]
            .exchanges
            .iter()
            .all(|exchange| exchange.name() != "market for Copper")
    );
}

#[test]
fn biosphere_flows_are_reconciled() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = import_simapro(&write_export(dir.path()), &ImportOptions::default(), &TABLES)
        .unwrap();
    let widget = &outcome.datasets[0];

    let methane = find(widget, "Methane, fossil");
    assert_eq!(methane.database.as_deref(), Some(BIOSPHERE_DATABASE));
    assert_eq!(outcome.summary.biosphere_remapped, 1);

    let unknown = find(widget, "Unobtainium");
    assert_eq!(unknown.compartment(), Some("soil"));
    assert_eq!(outcome.summary.biosphere_unresolved, 1);

    let steel = find(widget, "market for Steel");
    assert_eq!(steel.database.as_deref(), Some("widgets"));
    assert_eq!(steel.uncertainty_type, Some(2));
}

#[test]
fn configured_database_name_wins() {
    let dir = tempfile::tempdir().unwrap();
    let options = ImportOptions::default().with_database("widget-db");
    let outcome = import_simapro(&write_export(dir.path()), &options, &TABLES).unwrap();
    assert_eq!(outcome.datasets[0].database.as_deref(), Some("widget-db"));
}

#[test]
fn missing_production_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orphans.csv");
    std::fs::write(
        &path,
        "Process\n\nMaterials/fuels\nSteel {GLO}| market for | Cut-off, U;kg;1;Undefined;0;0;0;\n\nEnd\n",
    )
    .unwrap();
    let outcome = import_simapro(&path, &ImportOptions::default(), &TABLES).unwrap();
    assert_eq!(outcome.summary.report.count(IssueKind::ProductionCount), 1);
}

#[test]
fn output_is_pretty_json_with_metadata_key() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());
    let outcome = import_simapro(&input, &ImportOptions::default(), &TABLES).unwrap();

    let output = default_output_path(&input);
    assert_eq!(output.file_name().unwrap(), "widgets.json");
    write_datasets(&outcome.datasets, &output).unwrap();

    let written: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0]["metadata"]["Process name"], "Widget, at plant");
    assert!(written[0].get("simapro metadata").is_none());
    assert_eq!(written[0]["reference product"], "Widget");
}

#[test]
fn input_must_be_an_existing_csv() {
    let dir = tempfile::tempdir().unwrap();
    let options = ImportOptions::default();
    assert!(matches!(
        import_simapro(&dir.path().join("absent.csv"), &options, &TABLES),
        Err(ImportError::MissingInput(_))
    ));

    let text = dir.path().join("export.txt");
    std::fs::write(&text, EXPORT).unwrap();
    assert!(matches!(
        import_simapro(&text, &options, &TABLES),
        Err(ImportError::UnsupportedInput(_))
    ));
}
