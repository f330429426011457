//! SimaPro CSV process blocks read into raw datasets.
//!
//! Only `Process` … `End` blocks are read; the file header and the other
//! blocks of an export (system descriptions, units, quantities) are
//! skipped. Names stay in SimaPro's composite form here and are split by
//! the dataset normaliser afterwards.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use lci_model::{Activity, ActivityKind, Exchange, ExchangeKind};
use lci_normalize::{SimaproUncertainty, convert_sd2_to_sd};
use lci_standards::ReferenceTables;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ImportError, Result};

/// Key under which the text fields of a process are kept.
pub const SIMAPRO_METADATA_KEY: &str = "simapro metadata";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Single-value text field.
    Field,
    Products,
    WasteTreatment,
    Technosphere,
    Substitution,
    Biosphere(&'static str),
    Ignored,
}

const SECTIONS: &[(&str, Section)] = &[
    ("Products", Section::Products),
    ("Waste treatment", Section::WasteTreatment),
    ("Avoided products", Section::Substitution),
    ("Materials/fuels", Section::Technosphere),
    ("Electricity/heat", Section::Technosphere),
    ("Waste to treatment", Section::Technosphere),
    ("Resources", Section::Biosphere("natural resource")),
    ("Emissions to air", Section::Biosphere("air")),
    ("Emissions to water", Section::Biosphere("water")),
    ("Emissions to soil", Section::Biosphere("soil")),
    ("Final waste flows", Section::Biosphere("waste")),
    ("Non material emission", Section::Ignored),
    ("Social issues", Section::Ignored),
    ("Economic issues", Section::Ignored),
];

fn section_for(label: &str, tables: &ReferenceTables) -> Option<Section> {
    if let Some((_, section)) = SECTIONS.iter().find(|(name, _)| *name == label) {
        return Some(*section);
    }
    tables
        .fields
        .iter()
        .any(|field| field == label)
        .then_some(Section::Field)
}

/// Process block being read.
#[derive(Debug, Default)]
struct ProcessBlock {
    start_line: u64,
    fields: Map<String, Value>,
    category_type: Option<String>,
    comment: Option<String>,
    production: Vec<Exchange>,
    waste_treatment: bool,
    exchanges: Vec<Exchange>,
}

impl ProcessBlock {
    fn new(start_line: u64) -> Self {
        Self {
            start_line,
            ..Self::default()
        }
    }

    fn set_field(&mut self, label: &str, value: &str) {
        match label {
            "Category type" => self.category_type = Some(value.to_string()),
            "Comment" => match &mut self.comment {
                Some(comment) => {
                    comment.push('\n');
                    comment.push_str(value);
                }
                None => self.comment = Some(value.to_string()),
            },
            _ => {
                if !self.fields.contains_key(label) {
                    self.fields
                        .insert(label.to_string(), Value::String(value.to_string()));
                }
            }
        }
    }

    fn into_activity(self) -> Activity {
        let (name, unit) = match self.production.first() {
            Some(production) => (production.name().to_string(), production.unit().to_string()),
            None => {
                let name = self
                    .fields
                    .get("Process name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                (name, String::new())
            }
        };
        let kind = if self.waste_treatment {
            ActivityKind::WasteTreatment
        } else {
            ActivityKind::Process
        };
        let mut activity = Activity::new(name.clone(), name, "", unit);
        activity.activity_type = Some(kind.as_str().to_string());
        activity.comment = self.comment.filter(|comment| !comment.is_empty());
        activity
            .extra
            .insert(SIMAPRO_METADATA_KEY.to_string(), Value::Object(self.fields));
        activity.exchanges = self.production;
        activity.exchanges.extend(self.exchanges);
        activity
    }
}

/// Row-level parser state.
struct BlockReader<'a> {
    tables: &'a ReferenceTables,
    current: Option<ProcessBlock>,
    section: Option<(String, Section)>,
    field_filled: bool,
    activities: Vec<Activity>,
}

impl<'a> BlockReader<'a> {
    fn new(tables: &'a ReferenceTables) -> Self {
        Self {
            tables,
            current: None,
            section: None,
            field_filled: false,
            activities: Vec::new(),
        }
    }

    fn row(&mut self, line: u64, cells: &[String]) -> Result<()> {
        let Some(block) = self.current.as_mut() else {
            if cells.len() == 1 && cells[0] == "Process" {
                self.current = Some(ProcessBlock::new(line));
                self.section = None;
            }
            return Ok(());
        };

        if cells.len() == 1 {
            let label = cells[0].as_str();
            if label == "End" {
                if let Some(block) = self.current.take() {
                    self.activities.push(block.into_activity());
                }
                self.section = None;
                return Ok(());
            }
            if let Some(section) = section_for(label, self.tables) {
                self.section = Some((label.to_string(), section));
                self.field_filled = false;
                return Ok(());
            }
        }

        let Some((label, section)) = &self.section else {
            debug!(line, "row outside any section");
            return Ok(());
        };
        match section {
            Section::Field => {
                // Comments may run over several lines; other fields keep their first value.
                if !self.field_filled || label == "Comment" {
                    block.set_field(label, &cells.join(";"));
                    self.field_filled = true;
                }
            }
            Section::Ignored => {}
            Section::Products | Section::WasteTreatment => {
                let exchange = production_row(
                    line,
                    label,
                    cells,
                    block.category_type.as_deref(),
                    self.tables,
                )?;
                block.waste_treatment |= *section == Section::WasteTreatment;
                block.production.push(exchange);
            }
            Section::Technosphere | Section::Substitution => {
                let kind = if *section == Section::Substitution {
                    ExchangeKind::Substitution
                } else {
                    ExchangeKind::Technosphere
                };
                block
                    .exchanges
                    .push(technosphere_row(line, label, cells, kind, self.tables)?);
            }
            Section::Biosphere(compartment) => {
                block
                    .exchanges
                    .push(biosphere_row(line, label, cells, compartment, self.tables)?);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Activity>> {
        if let Some(block) = self.current {
            return Err(ImportError::UnterminatedProcess {
                line: block.start_line,
            });
        }
        Ok(self.activities)
    }
}

fn malformed(line: u64, section: &str, message: impl Into<String>) -> ImportError {
    ImportError::MalformedRow {
        line,
        section: section.to_string(),
        message: message.into(),
    }
}

fn cell<'c>(cells: &'c [String], idx: usize) -> &'c str {
    cells.get(idx).map_or("", |value| value.trim())
}

fn number(line: u64, section: &str, cells: &[String], idx: usize) -> Result<f64> {
    let raw = cell(cells, idx);
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .map_err(|_| malformed(line, section, format!("`{raw}` is not a number")))
}

fn brightway_unit(symbol: &str, tables: &ReferenceTables) -> String {
    tables.units.brightway(symbol).map_or_else(
        || {
            debug!(unit = symbol, "no Brightway unit for SimaPro symbol");
            symbol.to_string()
        },
        str::to_string,
    )
}

fn comment(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}

/// Distribution, spread, min and max starting at `first`.
fn apply_uncertainty(
    exchange: &mut Exchange,
    line: u64,
    section: &str,
    cells: &[String],
    first: usize,
) -> Result<()> {
    let uncertainty = SimaproUncertainty::from_simapro(cell(cells, first));
    exchange.uncertainty_type = Some(uncertainty.code());
    if uncertainty == SimaproUncertainty::NotDefined {
        return Ok(());
    }
    let sd2 = number(line, section, cells, first + 1)?;
    exchange.scale = convert_sd2_to_sd(sd2, uncertainty);
    if uncertainty == SimaproUncertainty::Lognormal && exchange.amount != 0.0 {
        exchange.loc = Some(exchange.amount.abs().ln());
    }
    if matches!(
        uncertainty,
        SimaproUncertainty::Uniform | SimaproUncertainty::Triangular
    ) {
        exchange.min = Some(number(line, section, cells, first + 2)?);
        exchange.max = Some(number(line, section, cells, first + 3)?);
    }
    Ok(())
}

/// `name; unit; amount; allocation; waste type; category; comment`.
///
/// Waste treatment rows written by SimaPro itself omit the allocation
/// column; a numeric fourth cell tells the two layouts apart.
fn production_row(
    line: u64,
    section: &str,
    cells: &[String],
    category_type: Option<&str>,
    tables: &ReferenceTables,
) -> Result<Exchange> {
    let has_allocation =
        section != "Waste treatment" || cell(cells, 3).parse::<f64>().is_ok();
    let category_idx = if has_allocation { 5 } else { 4 };
    let amount = number(line, section, cells, 2)?;
    let mut exchange = Exchange::new(cell(cells, 0), amount, ExchangeKind::Production)
        .with_unit(brightway_unit(cell(cells, 1), tables));
    let subcategory = cell(cells, category_idx).replace('\\', "/");
    exchange.simapro_category = match (category_type, subcategory.is_empty()) {
        (Some(category), false) => Some(format!("{category}/{subcategory}")),
        (Some(category), true) => Some(category.to_string()),
        (None, false) => Some(subcategory),
        (None, true) => None,
    };
    exchange.comment = comment(cell(cells, category_idx + 1));
    Ok(exchange)
}

/// `name; unit; amount; distribution; spread; min; max; comment`
fn technosphere_row(
    line: u64,
    section: &str,
    cells: &[String],
    kind: ExchangeKind,
    tables: &ReferenceTables,
) -> Result<Exchange> {
    if cells.len() < 3 {
        return Err(malformed(
            line,
            section,
            "expected at least name, unit and amount",
        ));
    }
    let amount = number(line, section, cells, 2)?;
    let mut exchange = Exchange::new(cell(cells, 0), amount, kind)
        .with_unit(brightway_unit(cell(cells, 1), tables));
    apply_uncertainty(&mut exchange, line, section, cells, 3)?;
    exchange.comment = comment(cell(cells, 7));
    Ok(exchange)
}

/// `name; subcompartment; unit; amount; distribution; spread; min; max; comment`
fn biosphere_row(
    line: u64,
    section: &str,
    cells: &[String],
    compartment: &str,
    tables: &ReferenceTables,
) -> Result<Exchange> {
    if cells.len() < 4 {
        return Err(malformed(
            line,
            section,
            "expected at least name, subcompartment, unit and amount",
        ));
    }
    let simapro_sub = cell(cells, 1);
    let subcompartment = tables
        .ecoinvent_subcompartment(simapro_sub)
        .unwrap_or(simapro_sub);
    let categories = if subcompartment == "unspecified" {
        vec![compartment]
    } else {
        vec![compartment, subcompartment]
    };
    let amount = number(line, section, cells, 3)?;
    let mut exchange = Exchange::new(cell(cells, 0), amount, ExchangeKind::Biosphere)
        .with_unit(brightway_unit(cell(cells, 2), tables))
        .with_categories(&categories);
    apply_uncertainty(&mut exchange, line, section, cells, 4)?;
    exchange.comment = comment(cell(cells, 8));
    Ok(exchange)
}

/// Replace unit tokens SimaPro writes but the reader cannot interpret.
fn replace_forbidden_units(cells: &mut [String], tables: &ReferenceTables) {
    for value in cells.iter_mut() {
        if let Some((_, replacement)) = tables
            .forbidden_units
            .iter()
            .find(|(token, _)| token == value.trim())
        {
            *value = replacement.clone();
        }
    }
}

fn record_cells(record: &StringRecord) -> Vec<String> {
    let mut cells: Vec<String> = record
        .iter()
        .map(|value| value.trim().trim_matches('\u{feff}').to_string())
        .collect();
    while cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
    cells
}

/// Read SimaPro process blocks from any reader.
pub fn parse_simapro<R: Read>(input: R, tables: &ReferenceTables) -> Result<Vec<Activity>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut blocks = BlockReader::new(tables);
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let mut cells = record_cells(&record);
        if cells.is_empty() {
            continue;
        }
        replace_forbidden_units(&mut cells, tables);
        blocks.row(line, &cells)?;
    }
    blocks.finish()
}

/// Read the SimaPro CSV export at `path`.
pub fn read_simapro_csv(path: &Path, tables: &ReferenceTables) -> Result<Vec<Activity>> {
    if !path.is_file() {
        return Err(ImportError::MissingInput(path.to_path_buf()));
    }
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ImportError::UnsupportedInput(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let activities = parse_simapro(file, tables)?;
    debug!(path = %path.display(), datasets = activities.len(), "SimaPro file read");
    Ok(activities)
}
