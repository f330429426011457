use std::path::PathBuf;

use anyhow::{Context, Result};
use lci_export::{
    ExportOptions, ExportOutcome, export_to_simapro, load_inventory, load_inventory_metadata,
};
use lci_import::{
    ImportOptions, ImportOutcome, default_output_path, import_simapro, write_datasets,
};
use lci_model::TargetDatabase;
use lci_standards::{ReferenceTables, load_default_tables};
use tracing::info;

use crate::cli::{ToBrightwayArgs, ToSimaproArgs};

/// Result of `to-simapro`.
#[derive(Debug)]
pub struct ExportRun {
    pub inventory: PathBuf,
    pub target: TargetDatabase,
    pub outcome: ExportOutcome,
}

/// Result of `to-brightway`.
#[derive(Debug)]
pub struct ImportRun {
    pub export: PathBuf,
    pub output: PathBuf,
    pub outcome: ImportOutcome,
}

pub fn load_tables() -> Result<ReferenceTables> {
    load_default_tables().context("load reference tables")
}

pub fn run_to_simapro(args: &ToSimaproArgs, tables: &ReferenceTables) -> Result<ExportRun> {
    let activities = load_inventory(&args.inventory)
        .with_context(|| format!("load inventory {}", args.inventory.display()))?;
    let metadata = args
        .metadata
        .as_deref()
        .map(load_inventory_metadata)
        .transpose()
        .context("load inventory metadata")?;

    let target = TargetDatabase::from(args.target);
    let mut options = ExportOptions::default().with_target(target);
    options.ecoinvent_version.clone_from(&args.ecoinvent_version);
    if let Some(dir) = &args.output_dir {
        options = options.with_output_dir(dir);
    }

    let outcome = export_to_simapro(&activities, metadata.as_ref(), &options, tables)
        .context("export to SimaPro")?;
    Ok(ExportRun {
        inventory: args.inventory.clone(),
        target,
        outcome,
    })
}

pub fn run_to_brightway(args: &ToBrightwayArgs, tables: &ReferenceTables) -> Result<ImportRun> {
    let mut options = ImportOptions::default().with_ecoinvent_version(&args.ecoinvent_version);
    if let Some(database) = &args.database {
        options = options.with_database(database);
    }
    let outcome = import_simapro(&args.export, &options, tables)
        .with_context(|| format!("import {}", args.export.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.export));
    write_datasets(&outcome.datasets, &output).context("write Brightway datasets")?;
    info!(output = %output.display(), "import finished");
    Ok(ImportRun {
        export: args.export.clone(),
        output,
        outcome,
    })
}
