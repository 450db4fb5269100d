use crate::data::data_provider::DataProvider;
use crate::data::results::{AggregateTable, FrequencySeries, LineSeries};
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use crossterm::style::Stylize;

/// Build a bordered table from any tabular result
pub fn build_table(provider: &dyn DataProvider) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let headers: Vec<Cell> = provider
        .get_column_names()
        .iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(headers);

    for i in 0..provider.get_row_count() {
        if let Some(row) = provider.get_row(i) {
            table.add_row(row.into_iter().map(|value| {
                let aligned = value.parse::<f64>().is_ok() || value == "NaN";
                let cell = Cell::new(value);
                if aligned {
                    cell.set_alignment(CellAlignment::Right)
                } else {
                    cell
                }
            }));
        }
    }

    table
}

pub fn display_results(title: &str, provider: &dyn DataProvider) {
    println!("{}", title.cyan().bold());
    if provider.is_empty() {
        println!("{}", "No results found.".yellow());
        return;
    }

    println!("{}", build_table(provider));
    println!(
        "{}",
        format!("{} rows returned", provider.get_row_count()).green()
    );
}

pub fn display_scalar(title: &str, value: f64) {
    println!("{}", title.cyan().bold());
    println!("{:.2}", value);
}

/// Frequency series with a proportional bar per label
pub fn display_distribution(title: &str, series: &FrequencySeries, bar_width: usize) {
    display_results(title, series);
    if series.is_empty() {
        return;
    }

    let label_width = series.labels.iter().map(|l| l.len()).max().unwrap_or(0);
    for ((label, _), share) in series.iter().zip(series.proportions()) {
        let filled = ((share / 100.0) * bar_width as f64).round() as usize;
        println!(
            "{:<label_width$} {} {:.1}%",
            label,
            "#".repeat(filled).magenta(),
            share,
            label_width = label_width
        );
    }
}

/// Long-form aggregate followed by its per-series breakdown
pub fn display_line_series(title: &str, table: &AggregateTable) {
    display_results(title, table);
    for LineSeries { name, x, y } in table.line_series() {
        let points: Vec<String> = x
            .iter()
            .zip(y.iter())
            .map(|(stage, value)| match value {
                Some(v) => format!("{}={:.2}", stage, v),
                None => format!("{}=NaN", stage),
            })
            .collect();
        println!("  {}: {}", name.bold(), points.join(", "));
    }
}
