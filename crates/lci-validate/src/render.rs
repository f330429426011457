//! Terminal tables for validation findings.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use lci_model::{IssueKind, ValidationReport};

use crate::mandatory::MissingFields;
use crate::unused::UnusedExchange;

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn field_cell(value: Option<&str>) -> Cell {
    match value {
        Some("--") => dim_cell("--"),
        Some(text) => Cell::new(text),
        None => Cell::new("None")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

pub fn missing_fields_table(rows: &[MissingFields]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Activity"),
        header_cell("Type"),
        header_cell("Name"),
        header_cell("Reference product"),
        header_cell("Location"),
        header_cell("Categories"),
        header_cell("Unit"),
    ]);
    apply_issue_table_style(&mut table);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.activity),
            field_cell(row.kind.as_deref()),
            field_cell(row.name.as_deref()),
            field_cell(row.reference_product.as_deref()),
            field_cell(row.location.as_deref()),
            field_cell(row.categories.as_deref()),
            field_cell(row.unit.as_deref()),
        ]);
    }
    table
}

pub fn unused_exchanges_table(rows: &[UnusedExchange]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Activity"),
        header_cell("Exchange"),
        header_cell("Type"),
        header_cell("Amount"),
        header_cell("Unit"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.activity),
            Cell::new(&row.name).fg(Color::Yellow),
            Cell::new(&row.kind),
            Cell::new(row.amount),
            Cell::new(&row.unit),
        ]);
    }
    table
}

fn kind_cell(kind: IssueKind) -> Cell {
    let color = match kind {
        IssueKind::ProductionCount | IssueKind::ProductionMismatch => Color::Yellow,
        IssueKind::UnknownExchangeType => Color::Red,
    };
    Cell::new(kind.label()).fg(color)
}

pub fn validation_table(report: &ValidationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Product"),
        header_cell("Location"),
        header_cell("Check"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    let mut issues: Vec<_> = report.issues.iter().collect();
    issues.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.dataset.cmp(&b.dataset)));
    for issue in issues {
        table.add_row(vec![
            Cell::new(&issue.dataset.0)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&issue.dataset.1),
            Cell::new(&issue.dataset.2),
            kind_cell(issue.kind),
            Cell::new(&issue.message),
        ]);
    }
    table
}
