use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use unpivot_cli::pipeline::RunResult;
use unpivot_core::UnpivotPlan;

pub fn print_run_summary(result: &RunResult) {
    println!("Input: {}", result.input.display());
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }
    let plan = &result.plan;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input rows"),
        header_cell("Input columns"),
        header_cell("Pivoted"),
        header_cell("Static"),
        header_cell("Output rows"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let static_count = plan.partition().static_columns().count();
    table.add_row(vec![
        Cell::new(result.input_rows),
        Cell::new(result.input_columns),
        Cell::new(plan.pivot_columns().len())
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(static_count),
        Cell::new(result.frame.height()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_preview(df: &DataFrame, rows: usize) {
    let shown = rows.min(df.height());
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for idx in 0..shown {
        let row: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|column| value_cell(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        table.add_row(row);
    }
    println!();
    println!("Preview ({shown} of {} rows):", df.height());
    println!("{table}");
}

pub fn print_plan(plan: &UnpivotPlan) {
    println!("Identifier: {}", plan.identifier());
    println!("Output columns: {}", plan.output_columns().join(", "));
    println!("Expression: {}", plan.stack());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Sanitized"),
        header_cell("Role"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for entry in plan.name_map().iter() {
        let role = if entry.sanitized == plan.sanitized_identifier() {
            Cell::new("identifier")
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        } else if plan.pivot_columns().contains(&entry.sanitized) {
            Cell::new("pivot").fg(Color::Cyan)
        } else {
            Cell::new("static").fg(Color::Yellow)
        };
        let sanitized = if entry.sanitized == entry.original {
            dim_cell(&entry.sanitized)
        } else {
            Cell::new(&entry.sanitized)
        };
        table.add_row(vec![Cell::new(&entry.original), sanitized, role]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn value_cell(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => dim_cell("null"),
        other => Cell::new(any_to_string(other)),
    }
}

/// Render a value without the quoting `AnyValue`'s `Display` adds to strings.
fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
