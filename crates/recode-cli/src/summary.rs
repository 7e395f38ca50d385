use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recode_core::Rule;
use recode_model::dictionary::NA_TEXT;

use crate::types::{ApplyResult, InspectResult, VectorResult};

pub fn print_apply_summary(result: &ApplyResult) {
    println!("Data: {}", result.data.display());
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }
    println!("{}", apply_table(result));
    if let Some(table) = diagnostic_table(result) {
        println!("{table}");
    }
}

/// Per-column counts with a total row.
pub fn apply_table(result: &ApplyResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Rules"),
        header_cell("Changed"),
        header_cell("Diagnostics"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for column in &result.report.columns {
        table.add_row(vec![
            Cell::new(&column.column)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(column.rules),
            Cell::new(column.changed),
            count_cell(column.diagnostics.len()),
        ]);
    }
    table.add_row(vec![
        Cell::new(format!("TOTAL ({} rows)", result.rows))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(result.report.changed()).add_attribute(Attribute::Bold),
        count_cell(result.report.diagnostic_count()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn diagnostic_table(result: &ApplyResult) -> Option<Table> {
    let frame_level = result
        .report
        .diagnostics
        .iter()
        .map(|diagnostic| ("-", diagnostic));
    let per_column = result.report.columns.iter().flat_map(|column| {
        column
            .diagnostics
            .iter()
            .map(|diagnostic| (column.column.as_str(), diagnostic))
    });
    let rows: Vec<_> = frame_level.chain(per_column).collect();
    if rows.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Code"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for (column, diagnostic) in rows {
        table.add_row(vec![
            Cell::new(column),
            Cell::new(diagnostic.code()).fg(Color::Yellow),
            Cell::new(diagnostic.to_string()),
        ]);
    }
    Some(table)
}

pub fn print_vector(result: &VectorResult) {
    for line in vector_lines(result) {
        println!("{line}");
    }
}

/// One resolved value per line, missing values as `NA`, then the levels.
pub fn vector_lines(result: &VectorResult) -> Vec<String> {
    let mut lines: Vec<String> = result
        .labels
        .iter()
        .map(|label| label.as_deref().unwrap_or(NA_TEXT).to_string())
        .collect();
    if let Some(levels) = &result.levels {
        lines.push(format!("Levels: {}", levels.join(" < ")));
    }
    lines
}

pub fn print_rules(result: &InspectResult) {
    println!("Dictionary: {}", result.dictionary.display());
    println!("{}", rules_table(result));
    let report = result.rules.report();
    if report.null_keys_rewritten > 0 {
        println!(
            "{} missing key(s) read as \"{NA_TEXT}\"",
            report.null_keys_rewritten
        );
    }
    if !report.duplicate_keys.is_empty() {
        println!("Duplicate keys ignored: {}", report.duplicate_keys.join(", "));
    }
}

pub fn rules_table(result: &InspectResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Key"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    for rule in result.rules.rules() {
        let kind = match rule {
            Rule::Exact { .. } => Cell::new("exact"),
            Rule::Regex(_) => Cell::new("regex").fg(Color::Magenta),
            Rule::Missing { .. } => Cell::new("missing").fg(Color::Yellow),
            Rule::Default { .. } => Cell::new("default").fg(Color::Yellow),
        };
        table.add_row(vec![kind, Cell::new(rule.key()), Cell::new(rule.value())]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(Color::Yellow)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
