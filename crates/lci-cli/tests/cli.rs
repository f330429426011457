//! Argument parsing and end-to-end runs of both conversion directions.

use std::path::Path;

use clap::Parser;
use lci_cli::cli::{Cli, Command, TargetArg};
use lci_cli::commands::{load_tables, run_to_brightway, run_to_simapro};
use lci_cli::logging::LogConfig;
use lci_cli::summary::{export_summary_table, import_summary_table, reference_tables_table};
use lci_model::TargetDatabase;
use tracing::level_filters::LevelFilter;

const INVENTORY: &str = r#"[
  {
    "name": "widget production",
    "reference product": "widget",
    "location": "CH",
    "unit": "kilogram",
    "exchanges": [
      {
        "name": "widget production",
        "reference product": "widget",
        "location": "CH",
        "unit": "kilogram",
        "amount": 1.0,
        "type": "production",
        "simapro category": "material/plastics"
      },
      {
        "name": "market for electricity, low voltage",
        "reference product": "electricity, low voltage",
        "location": "CH",
        "unit": "kilowatt hour",
        "amount": 2.5,
        "type": "technosphere"
      }
    ]
  }
]"#;

const EXPORT: &str = "{SimaPro 9.5.0.1}

Process

Category type
material

Process name
Widget, at plant

Products
Widget {CH}| production | Cut-off, U;kg;1;100;not defined;Plastics;

Electricity/heat
Electricity, low voltage {CH}| market for | Cut-off, U;kWh;2.5;Undefined;0;0;0;

End
";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn to_simapro_defaults() {
    let cli = Cli::try_parse_from(["lci-bridge", "to-simapro", "inventory.json"]).unwrap();
    let Command::ToSimapro(args) = cli.command else {
        panic!("expected to-simapro");
    };
    assert_eq!(args.target, TargetArg::Ecoinvent);
    assert_eq!(args.ecoinvent_version, "3.9");
    assert!(args.metadata.is_none());
    assert!(args.output_dir.is_none());
}

#[test]
fn unknown_target_is_rejected() {
    let parsed = Cli::try_parse_from([
        "lci-bridge",
        "to-simapro",
        "inventory.json",
        "--target",
        "agribalyse",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn uvek_target_maps_to_database() {
    assert_eq!(TargetDatabase::from(TargetArg::Uvek), TargetDatabase::Uvek);
}

#[test]
fn log_level_flag_disables_rust_log() {
    let cli = Cli::try_parse_from(["lci-bridge", "--log-level", "debug", "tables"]).unwrap();
    let config = cli.log_config();
    assert_eq!(config.level_filter, LevelFilter::DEBUG);
    assert!(!config.use_env_filter);

    let cli = Cli::try_parse_from(["lci-bridge", "tables"]).unwrap();
    let config = cli.log_config();
    assert_eq!(config.level_filter, LevelFilter::WARN);
    assert!(config.use_env_filter);
}

#[test]
fn verbose_flag_raises_level() {
    let cli = Cli::try_parse_from(["lci-bridge", "-v", "tables"]).unwrap();
    let config = cli.log_config();
    assert_eq!(config.level_filter, LevelFilter::INFO);
    assert!(!config.use_env_filter);
}

#[test]
fn filter_directive_covers_workspace_crates() {
    let directive = LogConfig::default()
        .with_level_filter(LevelFilter::DEBUG)
        .filter_directive();
    assert!(directive.starts_with("warn,"));
    assert!(directive.contains("lci_export=debug"));
    assert!(directive.contains("lci_import=debug"));
}

#[test]
fn to_simapro_writes_csv_into_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let inventory = write(dir.path(), "inventory.json", INVENTORY);
    let output = dir.path().join("out");
    let cli = Cli::try_parse_from([
        "lci-bridge",
        "to-simapro",
        inventory.to_str().unwrap(),
        "--output-dir",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let Command::ToSimapro(args) = cli.command else {
        panic!("expected to-simapro");
    };

    let tables = load_tables().unwrap();
    let run = run_to_simapro(&args, &tables).unwrap();
    assert_eq!(run.outcome.activities, 1);
    assert!(run.outcome.path.starts_with(&output));
    let file_name = run.outcome.path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("simapro_ecoinvent_"));

    let text = std::fs::read_to_string(&run.outcome.path).unwrap();
    assert!(text.starts_with("{SimaPro 9.5.0.1}"));
    assert!(text.contains("Products\n"));
    assert!(text.contains(";kWh;2.500E+00;"));

    let summary = export_summary_table(&run).to_string();
    assert!(summary.contains("Activities"));
    assert!(summary.contains("ecoinvent"));
}

#[test]
fn to_simapro_reports_missing_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let cli = Cli::try_parse_from(["lci-bridge", "to-simapro", missing.to_str().unwrap()]).unwrap();
    let Command::ToSimapro(args) = cli.command else {
        panic!("expected to-simapro");
    };
    let error = run_to_simapro(&args, &load_tables().unwrap()).unwrap_err();
    assert!(format!("{error:#}").contains("load inventory"));
}

#[test]
fn to_brightway_writes_json_next_to_export() {
    let dir = tempfile::tempdir().unwrap();
    let export = write(dir.path(), "widgets.csv", EXPORT);
    let cli =
        Cli::try_parse_from(["lci-bridge", "to-brightway", export.to_str().unwrap()]).unwrap();
    let Command::ToBrightway(args) = cli.command else {
        panic!("expected to-brightway");
    };

    let run = run_to_brightway(&args, &load_tables().unwrap()).unwrap();
    assert_eq!(run.output, dir.path().join("widgets.json"));
    assert_eq!(run.outcome.database, "widgets");

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&run.output).unwrap()).unwrap();
    assert_eq!(written[0]["name"], "Widget (production)");
    assert_eq!(written[0]["exchanges"][1]["unit"], "kilowatt hour");

    let summary = import_summary_table(&run).to_string();
    assert!(summary.contains("Datasets"));
    assert!(summary.contains("widgets"));
}

const WASTE_INVENTORY: &str = r#"[
  {
    "name": "treatment of used widget",
    "reference product": "used widget",
    "location": "CH",
    "unit": "kilogram",
    "type": "waste treatment",
    "exchanges": [
      {
        "name": "treatment of used widget",
        "reference product": "used widget",
        "location": "CH",
        "unit": "kilogram",
        "amount": -1.0,
        "type": "production",
        "simapro category": "waste treatment/landfill"
      }
    ]
  }
]"#;

#[test]
fn waste_treatment_survives_export_and_import() {
    let dir = tempfile::tempdir().unwrap();
    let inventory = write(dir.path(), "inventory.json", WASTE_INVENTORY);
    let output = dir.path().join("out");
    let tables = load_tables().unwrap();

    let cli = Cli::try_parse_from([
        "lci-bridge",
        "to-simapro",
        inventory.to_str().unwrap(),
        "--output-dir",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let Command::ToSimapro(args) = cli.command else {
        panic!("expected to-simapro");
    };
    let exported = run_to_simapro(&args, &tables).unwrap();
    let text = std::fs::read_to_string(&exported.outcome.path).unwrap();
    assert!(text.contains(";kg;1.000E+00;100;not defined;landfill;"));

    let cli = Cli::try_parse_from([
        "lci-bridge",
        "to-brightway",
        exported.outcome.path.to_str().unwrap(),
    ])
    .unwrap();
    let Command::ToBrightway(args) = cli.command else {
        panic!("expected to-brightway");
    };
    let imported = run_to_brightway(&args, &tables).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&imported.output).unwrap()).unwrap();
    let production = &written[0]["exchanges"][0];
    assert_eq!(production["type"], "production");
    assert_eq!(production["simapro category"], "waste treatment/landfill");
    assert_eq!(production["amount"], -1.0);
    assert_eq!(written[0]["type"], "waste treatment");
}

#[test]
fn tables_listing_names_every_table() {
    let table = reference_tables_table(&load_tables().unwrap()).to_string();
    for name in ["units", "simapro biosphere", "forbidden units"] {
        assert!(table.contains(name), "missing {name}");
    }
}
