//! SimaPro process blocks built from Brightway activities.
//!
//! Each activity is written as one block whose section order comes from
//! the `fields` table. Every section label maps to a handler in
//! [`SECTIONS`]; labels without a handler fall back to a documentation
//! field lookup or a bare label. Exchanges written by a handler are
//! recorded in a consumed set that feeds the unused-exchange report.

use std::collections::BTreeSet;

use lci_model::{Activity, Exchange, ExchangeKind, InventoryMetadata, TargetDatabase};
use lci_normalize::{
    SimaproUncertainty, check_exchanges_for_conversion, convert_sd_to_sd2, format_exchange_name,
    format_scientific, get_subcategory, is_a_waste_treatment, is_activity_waste_treatment,
    is_blacklisted, round_floats_in_string,
};
use lci_standards::ReferenceTables;
use lci_validate::{UnusedExchange, unused_exchanges};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::options::ExportOptions;
use crate::transport::add_distribution_transport;

pub type Row = Vec<String>;

/// Rows of a complete export plus the exchanges no section consumed.
#[derive(Debug, Clone, Default)]
pub struct SimaproRows {
    pub rows: Vec<Row>,
    pub unused: Vec<UnusedExchange>,
    pub activities: usize,
}

type SectionHandler = fn(&mut RowBuilder<'_>, &ActivityContext<'_>, &str) -> Result<()>;

const SECTIONS: &[(&str, SectionHandler)] = &[
    ("Process", blank_line),
    ("End", blank_line),
    ("Category type", category_type),
    ("Type", process_type),
    ("Process name", process_name),
    ("Geography", geography),
    ("Date", date),
    ("Comment", comment),
    ("Products", production_output),
    ("Waste treatment", production_output),
    ("Avoided products", avoided_products),
    ("Materials/fuels", materials_fuels),
    ("Electricity/heat", electricity_heat),
    ("Resources", resources),
    ("Emissions to air", emissions),
    ("Emissions to water", emissions),
    ("Emissions to soil", emissions),
    ("Final waste flows", blank_line),
    ("Non material emission", blank_line),
    ("Social issues", blank_line),
    ("Economic issues", blank_line),
    ("Waste to treatment", waste_to_treatment),
];

const DOCUMENTATION_FIELDS: &[&str] = &[
    "Time period",
    "Record",
    "Generator",
    "Cut off rules",
    "Capital goods",
    "Technology",
    "Representativeness",
    "Boundary with nature",
    "Infrastructure",
    "External documents",
    "System description",
    "Allocation rules",
    "Literature references",
    "Collection method",
    "Data treatment",
    "Verification",
];

fn section_handler(label: &str) -> Option<SectionHandler> {
    if let Some((_, handler)) = SECTIONS.iter().find(|(name, _)| *name == label) {
        return Some(*handler);
    }
    DOCUMENTATION_FIELDS
        .contains(&label)
        .then_some(documentation as SectionHandler)
}

/// Per-activity values shared by the section handlers.
struct ActivityContext<'a> {
    index: usize,
    activity: &'a Activity,
    /// Exchanges in target units, index-aligned with `activity.exchanges`.
    converted: Vec<Exchange>,
    waste_treatment: bool,
    process_name: String,
}

impl ActivityContext<'_> {
    fn production(&self) -> Result<(usize, &Exchange)> {
        self.activity
            .production_exchange()
            .ok_or_else(|| ExportError::MissingProduction {
                activity: self.activity.name.clone(),
            })
    }
}

pub struct RowBuilder<'a> {
    tables: &'a ReferenceTables,
    options: &'a ExportOptions,
    metadata: Option<&'a InventoryMetadata>,
    rows: Vec<Row>,
    used: BTreeSet<(usize, usize)>,
}

impl<'a> RowBuilder<'a> {
    pub fn new(
        tables: &'a ReferenceTables,
        options: &'a ExportOptions,
        metadata: Option<&'a InventoryMetadata>,
    ) -> Self {
        Self {
            tables,
            options,
            metadata,
            rows: Vec::new(),
            used: BTreeSet::new(),
        }
    }

    /// Build every row of the export. The input activities are not modified.
    pub fn build(mut self, activities: &[Activity]) -> Result<SimaproRows> {
        let tables = self.tables;
        let target = self.options.target;
        let prepared: Vec<Activity> = activities
            .iter()
            .map(|activity| match target {
                TargetDatabase::Uvek => add_distribution_transport(activity, &tables.transport),
                TargetDatabase::Ecoinvent => activity.clone(),
            })
            .collect();

        self.push_header();
        for (index, activity) in prepared.iter().enumerate() {
            let context = ActivityContext {
                index,
                activity,
                converted: check_exchanges_for_conversion(
                    &activity.exchanges,
                    target,
                    &tables.unit_conversions,
                ),
                waste_treatment: is_activity_waste_treatment(activity, target, &tables.waste),
                process_name: format_exchange_name(
                    &activity.name,
                    &activity.reference_product,
                    &activity.location,
                    &activity.unit,
                    target,
                    tables,
                ),
            };
            debug!(
                activity = %activity.name,
                waste_treatment = context.waste_treatment,
                "building process block"
            );
            for label in &tables.fields {
                let skipped = match label.as_str() {
                    "Products" => context.waste_treatment,
                    "Waste treatment" => !context.waste_treatment,
                    _ => false,
                };
                if skipped {
                    continue;
                }
                self.rows.push(vec![label.clone()]);
                match section_handler(label) {
                    Some(handler) => handler(&mut self, &context, label)?,
                    None => {
                        debug!(section = %label, "no handler for section");
                        self.blank();
                    }
                }
            }
            self.blank();
        }
        self.push_metadata_blocks();

        let unused = unused_exchanges(&prepared, &self.used);
        Ok(SimaproRows {
            rows: self.rows,
            unused,
            activities: prepared.len(),
        })
    }

    fn blank(&mut self) {
        self.rows.push(Vec::new());
    }

    fn value(&mut self, value: impl Into<String>) {
        self.rows.push(vec![value.into()]);
        self.blank();
    }

    fn mark_used(&mut self, context: &ActivityContext<'_>, exchange_idx: usize) {
        self.used.insert((context.index, exchange_idx));
    }

    fn push_header(&mut self) {
        let date = self.options.simapro_date();
        for line in &self.tables.headers {
            let line = if line.starts_with("{Date") {
                line.replace("today_date", &date)
            } else {
                line.clone()
            };
            self.rows.push(vec![line]);
        }
        self.blank();
    }

    fn push_metadata_blocks(&mut self) {
        let Some(metadata) = self.metadata else {
            return;
        };
        for entry in &metadata.system_description {
            self.push_metadata_block("System description", &entry.entries());
        }
        for entry in &metadata.literature_reference {
            self.push_metadata_block("Literature reference", &entry.entries());
        }
    }

    fn push_metadata_block(&mut self, label: &str, entries: &[(&str, &str)]) {
        self.value(label);
        for (key, value) in entries {
            self.rows.push(vec![(*key).to_string()]);
            self.value(*value);
        }
        self.blank();
        self.value("End");
    }

    fn simapro_unit(&self, unit: &str, exchange: &Exchange, activity: &Activity) -> Result<String> {
        self.tables
            .units
            .simapro(unit)
            .map(str::to_string)
            .ok_or_else(|| ExportError::UnknownUnit {
                unit: unit.to_string(),
                exchange: exchange.name().to_string(),
                activity: activity.name.clone(),
            })
    }

    fn blacklisted(&self, exchange: &Exchange) -> bool {
        is_blacklisted(exchange.name(), self.options.target, &self.tables.blacklist)
    }

    fn waste(&self, exchange: &Exchange) -> bool {
        is_a_waste_treatment(exchange.name(), self.options.target, &self.tables.waste)
    }

    /// Technosphere-shaped row: name, unit, amount, distribution, spread,
    /// min, max, comment. Unit and amount come from the converted exchange;
    /// the name keeps the source unit for the UVEK lookup.
    fn technosphere_row(
        &self,
        context: &ActivityContext<'_>,
        idx: usize,
        amount_sign: AmountSign,
    ) -> Result<Row> {
        let target = self.options.target;
        let exchange = &context.activity.exchanges[idx];
        let converted = &context.converted[idx];
        let name = format_exchange_name(
            exchange.name(),
            exchange.reference_product(),
            exchange.location_or_global(),
            exchange.unit(),
            target,
            self.tables,
        );
        let unit = self.simapro_unit(converted.unit(), exchange, context.activity)?;
        let amount = amount_sign.apply(converted.amount);
        let mut row = vec![name, unit, format_scientific(amount)];
        row.extend(uncertainty_cells(converted));
        row.push(exchange.comment.clone().unwrap_or_default());
        Ok(row)
    }

    fn technosphere_section(
        &mut self,
        context: &ActivityContext<'_>,
        select: impl Fn(&Self, &Exchange) -> bool,
        amount_sign: AmountSign,
    ) -> Result<()> {
        for (idx, exchange) in context.activity.exchanges.iter().enumerate() {
            if !exchange.is_technosphere()
                || self.blacklisted(exchange)
                || !select(&*self, exchange)
            {
                continue;
            }
            let row = self.technosphere_row(context, idx, amount_sign)?;
            self.rows.push(row);
            self.mark_used(context, idx);
        }
        self.blank();
        Ok(())
    }

    fn biosphere_section(
        &mut self,
        context: &ActivityContext<'_>,
        compartment: &str,
    ) -> Result<()> {
        let tables = self.tables;
        for (idx, exchange) in context.activity.exchanges.iter().enumerate() {
            if !exchange.is_biosphere()
                || exchange.compartment() != Some(compartment)
                || self.blacklisted(exchange)
            {
                continue;
            }
            let (unit, amount) = water_in_mass(exchange);
            let name = tables.simapro_biosphere.resolve(
                exchange.name(),
                exchange.location.as_deref(),
                Some(&context.activity.location),
            );
            let subcompartment = match exchange.subcompartment() {
                Some(sub) => tables.simapro_subcompartment(sub).unwrap_or_else(|| {
                    debug!(subcompartment = sub, "no SimaPro subcompartment");
                    ""
                }),
                None => "",
            };
            let mut row = vec![
                name.to_string(),
                subcompartment.to_string(),
                self.simapro_unit(unit, exchange, context.activity)?,
                format_scientific(amount),
            ];
            row.extend(uncertainty_cells(exchange));
            row.push(exchange.comment.clone().unwrap_or_default());
            self.rows.push(row);
            self.mark_used(context, idx);
        }
        self.blank();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum AmountSign {
    AsIs,
    Positive,
}

impl AmountSign {
    fn apply(self, amount: f64) -> f64 {
        match self {
            Self::AsIs => amount,
            Self::Positive => amount.abs(),
        }
    }
}

/// Water flows in cubic metres are written in kilograms.
fn water_in_mass(exchange: &Exchange) -> (&str, f64) {
    if exchange.name().eq_ignore_ascii_case("water") && exchange.unit() == "cubic meter" {
        ("kilogram", exchange.amount * 1000.0)
    } else {
        (exchange.unit(), exchange.amount)
    }
}

/// Distribution name, spread, min and max.
fn uncertainty_cells(exchange: &Exchange) -> [String; 4] {
    let uncertainty = SimaproUncertainty::from_code(exchange.uncertainty_type);
    [
        uncertainty.as_str().to_string(),
        format_scientific(convert_sd_to_sd2(exchange.scale.unwrap_or(1.0), uncertainty)),
        format_scientific(exchange.min.unwrap_or(0.0)),
        format_scientific(exchange.max.unwrap_or(0.0)),
    ]
}

fn blank_line(builder: &mut RowBuilder<'_>, _: &ActivityContext<'_>, _: &str) -> Result<()> {
    builder.blank();
    Ok(())
}

fn category_type(
    builder: &mut RowBuilder<'_>,
    context: &ActivityContext<'_>,
    _: &str,
) -> Result<()> {
    let (_, production) = context.production()?;
    let category = production
        .simapro_category
        .as_deref()
        .and_then(|category| category.split('/').next())
        .filter(|category| !category.is_empty())
        .unwrap_or("Others");
    builder.value(category);
    Ok(())
}

fn process_type(builder: &mut RowBuilder<'_>, _: &ActivityContext<'_>, _: &str) -> Result<()> {
    builder.value("Unit process");
    Ok(())
}

fn process_name(
    builder: &mut RowBuilder<'_>,
    context: &ActivityContext<'_>,
    _: &str,
) -> Result<()> {
    builder.value(context.process_name.clone());
    Ok(())
}

fn geography(builder: &mut RowBuilder<'_>, context: &ActivityContext<'_>, _: &str) -> Result<()> {
    builder.value(context.activity.location.clone());
    Ok(())
}

fn date(builder: &mut RowBuilder<'_>, _: &ActivityContext<'_>, _: &str) -> Result<()> {
    let date = builder.options.simapro_date();
    builder.value(date);
    Ok(())
}

fn comment(builder: &mut RowBuilder<'_>, context: &ActivityContext<'_>, _: &str) -> Result<()> {
    let activity = context.activity;
    let mut parts = Vec::new();
    if let Some(comment) = activity.comment.as_deref().filter(|text| !text.is_empty()) {
        parts.push(round_floats_in_string(comment).into_owned());
    }
    if let Some(source) = activity.source.as_deref().filter(|text| !text.is_empty()) {
        parts.push(format!("Source: {source}"));
    }
    builder.value(parts.join(" ").replace(['\r', '\n'], " "));
    Ok(())
}

fn documentation(
    builder: &mut RowBuilder<'_>,
    context: &ActivityContext<'_>,
    label: &str,
) -> Result<()> {
    let metadata = builder.metadata;
    let value = context.activity.field_text(label).unwrap_or_else(|| {
        let fallback = match label {
            "Infrastructure" => Some("No"),
            "System description" => metadata.and_then(InventoryMetadata::system_description_name),
            "Literature references" => {
                metadata.and_then(InventoryMetadata::literature_reference_name)
            }
            _ => None,
        };
        fallback.unwrap_or("Unspecified").to_string()
    });
    builder.value(value);
    Ok(())
}

/// The `Products` or `Waste treatment` row; waste treatments are written
/// with a positive amount.
fn production_output(
    builder: &mut RowBuilder<'_>,
    context: &ActivityContext<'_>,
    _: &str,
) -> Result<()> {
    let (idx, production) = context.production()?;
    let unit = builder.simapro_unit(production.unit(), production, context.activity)?;
    let amount = if context.waste_treatment {
        production.amount.abs()
    } else {
        production.amount
    };
    let category = production
        .simapro_category
        .as_deref()
        .map(get_subcategory)
        .unwrap_or_default();
    builder.rows.push(vec![
        context.process_name.clone(),
        unit,
        format_scientific(amount),
        "100".to_string(),
        "not defined".to_string(),
        category,
        "not defined".to_string(),
    ]);
    builder.blank();
    builder.mark_used(context, idx);
    Ok(())
}

fn avoided_products(
    builder: &mut RowBuilder<'_>,
    context: &ActivityContext<'_>,
    _: &str,
) -> Result<()> {
    for (idx, exchange) in context.activity.exchanges.iter().enumerate() {
        if exchange.kind != ExchangeKind::Substitution || builder.blacklisted(exchange) {
            continue;
        }
        let row = builder.technosphere_row(context, idx, AmountSign::Positive)?;
        builder.rows.push(row);
        builder.mark_used(context, idx);
    }
    builder.blank();
    Ok(())
}

fn input_sign(context: &ActivityContext<'_>) -> AmountSign {
    if context.waste_treatment {
        AmountSign::Positive
    } else {
        AmountSign::AsIs
    }
}

fn materials_fuels(
    builder: &mut RowBuilder<'_>,
    context: &ActivityContext<'_>,
    _: &str,
) -> Result<()> {
    builder.technosphere_section(
        context,
        |builder, exchange| {
            !builder.tables.units.is_energy(exchange.unit()) && !builder.waste(exchange)
        },
        input_sign(context),
    )
}

fn electricity_heat(
    builder: &mut RowBuilder<'_>,
    context: &ActivityContext<'_>,
    _: &str,
) -> Result<()> {
    builder.technosphere_section(
        context,
        |builder, exchange| {
            builder.tables.units.is_energy(exchange.unit()) && !builder.waste(exchange)
        },
        input_sign(context),
    )
}

fn waste_to_treatment(
    builder: &mut RowBuilder<'_>,
    context: &ActivityContext<'_>,
    _: &str,
) -> Result<()> {
    builder.technosphere_section(
        context,
        |builder, exchange| builder.waste(exchange),
        AmountSign::Positive,
    )
}

fn resources(builder: &mut RowBuilder<'_>, context: &ActivityContext<'_>, _: &str) -> Result<()> {
    builder.biosphere_section(context, "natural resource")
}

fn emissions(
    builder: &mut RowBuilder<'_>,
    context: &ActivityContext<'_>,
    label: &str,
) -> Result<()> {
    let compartment = label
        .rsplit(' ')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    builder.biosphere_section(context, &compartment)
}
