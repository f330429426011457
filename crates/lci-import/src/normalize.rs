//! Brightway conventions applied to datasets read from SimaPro.

use lci_model::{Activity, ExchangeKind, TargetDatabase, ValidationReport};
use lci_normalize::{
    BiosphereResolution, format_biosphere_exchange, format_technosphere_exchange,
    is_a_waste_treatment, is_activity_waste_treatment,
};
use lci_standards::ReferenceTables;
use lci_validate::validate_datasets;
use tracing::{debug, info, info_span};

use crate::options::{BIOSPHERE_DATABASE, ImportOptions};
use crate::reader::SIMAPRO_METADATA_KEY;

const METADATA_KEY: &str = "metadata";

/// Counters for one normalisation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeSummary {
    pub datasets: usize,
    pub exchanges: usize,
    pub waste_flipped: usize,
    pub substitutions: usize,
    pub biosphere_remapped: usize,
    pub biosphere_recategorized: usize,
    pub biosphere_unresolved: usize,
    pub dropped_datasets: usize,
    pub dropped_exchanges: usize,
    pub report: ValidationReport,
}

impl NormalizeSummary {
    fn record(&mut self, resolution: BiosphereResolution) {
        match resolution {
            BiosphereResolution::Known => {}
            BiosphereResolution::Remapped => self.biosphere_remapped += 1,
            BiosphereResolution::Recategorized => self.biosphere_recategorized += 1,
            BiosphereResolution::Unresolved => self.biosphere_unresolved += 1,
        }
    }
}

fn normalize_dataset(
    dataset: &mut Activity,
    database: &str,
    options: &ImportOptions,
    tables: &ReferenceTables,
    summary: &mut NormalizeSummary,
) {
    let target = TargetDatabase::Ecoinvent;
    if let Some(metadata) = dataset.extra.remove(SIMAPRO_METADATA_KEY) {
        dataset.extra.insert(METADATA_KEY.to_string(), metadata);
    }

    let identity = format_technosphere_exchange(&dataset.name, &tables.names);
    dataset.name = identity.name;
    dataset.reference_product = identity.reference_product;
    dataset.location = identity.location;
    dataset.database = Some(database.to_string());
    let waste_treatment = is_activity_waste_treatment(dataset, target, &tables.waste);

    for exchange in &mut dataset.exchanges {
        if exchange.original_name.is_none() {
            exchange.original_name = exchange.name.clone();
        }
        match exchange.kind {
            ExchangeKind::Production => {
                exchange.name = Some(dataset.name.clone());
                exchange.reference_product = Some(dataset.reference_product.clone());
                exchange.location = Some(dataset.location.clone());
                if waste_treatment {
                    exchange.amount = -exchange.amount;
                    summary.waste_flipped += 1;
                }
            }
            ExchangeKind::Technosphere | ExchangeKind::Substitution => {
                let parsed = format_technosphere_exchange(exchange.name(), &tables.names);
                exchange.name = Some(parsed.name);
                exchange.reference_product = Some(parsed.reference_product);
                exchange.location = Some(parsed.location);
                if is_a_waste_treatment(exchange.name(), target, &tables.waste) {
                    debug!(
                        exchange = exchange.name(),
                        "waste treatment input, amount sign flipped"
                    );
                    exchange.amount = -exchange.amount;
                    summary.waste_flipped += 1;
                }
                if exchange.kind == ExchangeKind::Substitution {
                    exchange.kind = ExchangeKind::Technosphere;
                    exchange.amount = -exchange.amount;
                    summary.substitutions += 1;
                }
            }
            ExchangeKind::Biosphere => {
                let resolution =
                    format_biosphere_exchange(exchange, &options.ecoinvent_version, tables);
                summary.record(resolution);
            }
            ExchangeKind::Other(_) => {}
        }

        if exchange.database.is_none() {
            let linked = if exchange.kind == ExchangeKind::Biosphere {
                BIOSPHERE_DATABASE
            } else {
                database
            };
            exchange.database = Some(linked.to_string());
        }
    }
}

/// Rewrite raw SimaPro datasets into Brightway form.
///
/// Datasets without exchanges and exchanges with a zero amount are
/// dropped; the consistency checks run on what remains.
pub fn normalize_datasets(
    mut datasets: Vec<Activity>,
    database: &str,
    options: &ImportOptions,
    tables: &ReferenceTables,
) -> (Vec<Activity>, NormalizeSummary) {
    let span = info_span!("normalize", database, datasets = datasets.len());
    let _guard = span.enter();

    let mut summary = NormalizeSummary::default();
    for dataset in &mut datasets {
        normalize_dataset(dataset, database, options, tables, &mut summary);
    }

    let before = datasets.len();
    datasets.retain(|dataset| !dataset.exchanges.is_empty());
    summary.dropped_datasets = before - datasets.len();

    for dataset in &mut datasets {
        let before = dataset.exchanges.len();
        dataset.exchanges.retain(|exchange| exchange.amount != 0.0);
        summary.dropped_exchanges += before - dataset.exchanges.len();
    }

    summary.datasets = datasets.len();
    summary.exchanges = datasets.iter().map(|dataset| dataset.exchanges.len()).sum();
    summary.report = validate_datasets(&datasets);
    info!(
        datasets = summary.datasets,
        exchanges = summary.exchanges,
        unresolved_biosphere = summary.biosphere_unresolved,
        "datasets normalised"
    );
    (datasets, summary)
}
