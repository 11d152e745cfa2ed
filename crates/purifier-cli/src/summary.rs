use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use purifier_model::{InputSetResult, Mode, RunStats, SetError};

use purifier_cli::commands::relative_display;
use purifier_cli::types::CommandOutcome;

pub fn print_summary(outcome: &CommandOutcome) {
    let result = &outcome.result;
    println!("Mode: {}", result.mode.as_str());
    if outcome.dry_run {
        println!("Output: (dry run, nothing written)");
    } else {
        println!("Output: {}", outcome.output_dir.display());
    }

    let mut table = Table::new();
    let mut header = vec![header_cell("Input")];
    if result.mode == Mode::Reconcile {
        header.push(header_cell("Side"));
    }
    header.extend([
        header_cell("Rows"),
        header_cell("Valid"),
        header_cell("Invalid"),
        header_cell("Duplicates"),
        header_cell("Corrected"),
        header_cell("Status"),
    ]);
    table.set_header(header);
    apply_summary_table_style(&mut table);
    let first_count = if result.mode == Mode::Reconcile { 2 } else { 1 };
    for index in first_count..first_count + 5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for set in &result.input_sets {
        let mut row = vec![Cell::new(&set.name).add_attribute(Attribute::Bold)];
        if result.mode == Mode::Reconcile {
            row.push(Cell::new(set.source_set.as_str()));
        }
        row.extend(count_cells(&set.stats));
        row.push(status_cell(set));
        table.add_row(row);
    }

    let mut total = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ];
    if result.mode == Mode::Reconcile {
        total.push(dim_cell("-"));
    }
    total.extend(
        count_cells(&result.stats)
            .into_iter()
            .map(|cell| cell.add_attribute(Attribute::Bold)),
    );
    total.push(dim_cell("-"));
    table.add_row(total);
    println!("{table}");

    if let Some(comparison) = &result.comparison {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Unique to A"),
            header_cell("Unique to B"),
            header_cell("Combined"),
            header_cell("In both (skipped)"),
        ]);
        apply_summary_table_style(&mut table);
        table.add_row(vec![
            Cell::new(comparison.unique_to_a.len()),
            Cell::new(comparison.unique_to_b.len()),
            Cell::new(comparison.combined.len()),
            count_cell(comparison.overlap_count, Color::Yellow),
        ]);
        println!();
        println!("{table}");
    }

    if result.is_empty() {
        println!();
        match result.mode {
            Mode::Purify => println!("No valid records found."),
            Mode::Reconcile => println!("No unique records found on either side."),
        }
    }

    if !outcome.written.is_empty() {
        println!();
        println!("Files:");
        for path in &outcome.written {
            println!("  {}", relative_display(path, &outcome.output_dir));
        }
    }
    if let Some(report) = &outcome.report {
        println!("Run report: {}", report.display());
    }

    let failures: Vec<&InputSetResult> = result.parse_failures().collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for set in failures {
            if let Some(error) = &set.error {
                eprintln!("- {}: {error}", set.name);
            }
        }
    }
}

fn count_cells(stats: &RunStats) -> Vec<Cell> {
    vec![
        Cell::new(stats.total),
        count_cell(stats.valid, Color::Green),
        count_cell(stats.invalid, Color::Red),
        count_cell(stats.duplicates, Color::Yellow),
        count_cell(stats.corrected, Color::Blue),
    ]
}

fn status_cell(set: &InputSetResult) -> Cell {
    match &set.error {
        None => Cell::new("ok").fg(Color::Green),
        Some(SetError::EmptyInput) => Cell::new("empty").fg(Color::Yellow),
        Some(SetError::MissingEmailColumn { .. }) => Cell::new("no email column").fg(Color::Red),
        Some(SetError::ParseFailure { .. }) => Cell::new("parse failure")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
