use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use lci_standards::ReferenceTables;
use lci_validate::render::{
    align_column, apply_issue_table_style, dim_cell, header_cell, unused_exchanges_table,
    validation_table,
};

use crate::commands::{ExportRun, ImportRun};

pub fn print_export_summary(run: &ExportRun) {
    println!("Inventory: {}", run.inventory.display());
    println!("Output: {}", run.outcome.path.display());
    println!("{}", export_summary_table(run));
    if !run.outcome.unused.is_empty() {
        println!();
        println!("Unused exchanges:");
        println!("{}", unused_exchanges_table(&run.outcome.unused));
    }
}

pub fn print_import_summary(run: &ImportRun) {
    println!("SimaPro export: {}", run.export.display());
    println!("Output: {}", run.output.display());
    println!("{}", import_summary_table(run));
    let report = &run.outcome.summary.report;
    if !report.is_empty() {
        println!();
        println!("Warnings:");
        println!("{}", validation_table(report));
    }
}

pub fn export_summary_table(run: &ExportRun) -> Table {
    let outcome = &run.outcome;
    let mut table = metric_table();
    table.add_row(vec![label_cell("Target"), Cell::new(run.target.as_str())]);
    table.add_row(vec![label_cell("Activities"), Cell::new(outcome.activities)]);
    table.add_row(vec![label_cell("Rows written"), Cell::new(outcome.rows)]);
    table.add_row(vec![
        label_cell("Unused exchanges"),
        count_cell(outcome.unused.len(), Color::Yellow),
    ]);
    table
}

pub fn import_summary_table(run: &ImportRun) -> Table {
    let summary = &run.outcome.summary;
    let mut table = metric_table();
    table.add_row(vec![label_cell("Database"), Cell::new(&run.outcome.database)]);
    table.add_row(vec![label_cell("Datasets"), Cell::new(summary.datasets)]);
    table.add_row(vec![label_cell("Exchanges"), Cell::new(summary.exchanges)]);
    let counts = [
        ("Waste sign flips", summary.waste_flipped, Color::Reset),
        ("Substitutions", summary.substitutions, Color::Reset),
        ("Biosphere renamed", summary.biosphere_remapped, Color::Reset),
        (
            "Biosphere recategorized",
            summary.biosphere_recategorized,
            Color::Reset,
        ),
        (
            "Biosphere unresolved",
            summary.biosphere_unresolved,
            Color::Yellow,
        ),
        ("Dropped datasets", summary.dropped_datasets, Color::Reset),
        ("Dropped exchanges", summary.dropped_exchanges, Color::Reset),
        ("Warnings", summary.report.issues.len(), Color::Yellow),
    ];
    for (label, count, color) in counts {
        table.add_row(vec![label_cell(label), count_cell(count, color)]);
    }
    table
}

pub fn reference_tables_table(tables: &ReferenceTables) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Entries")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, count) in tables.counts() {
        table.add_row(vec![Cell::new(name), count_cell(count, Color::Reset)]);
    }
    table
}

fn metric_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Step"), header_cell("Count")]);
    apply_issue_table_style(&mut table);
    table.set_width(80);
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else if color == Color::Reset {
        Cell::new(count)
    } else {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    }
}

fn label_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::Blue)
}
