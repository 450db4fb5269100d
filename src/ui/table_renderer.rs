//! Fixed-width text table for row-store results
//!
//! Every column is as wide as the longest column name. Cells are
//! left-aligned and padded to that width; longer cells are printed in full,
//! so a long value pushes the rest of its row out of line.

use crate::data::results::{Projection, QueryResult};

/// Rows printed when the caller gives no limit
pub const DEFAULT_ROW_LIMIT: usize = 50;

/// Printed instead of a table when nothing matched
pub const NO_RECORDS: &str = "No records found!";

const SEPARATOR: char = '|';

/// Render at most `limit` records under a header and dash rule
pub fn render_table<S: AsRef<str>>(columns: &[S], records: &[Projection], limit: usize) -> String {
    if records.is_empty() {
        return NO_RECORDS.to_string();
    }

    let width = columns
        .iter()
        .map(|c| c.as_ref().chars().count())
        .max()
        .unwrap_or(0);

    let header = format_row(columns.iter().map(|c| c.as_ref()), width);
    let rule = "-".repeat(header.chars().count());

    let mut lines = Vec::with_capacity(records.len().min(limit) + 2);
    lines.push(header);
    lines.push(rule);

    for record in records.iter().take(limit) {
        let cells = columns
            .iter()
            .map(|c| record.get(c.as_ref()).unwrap_or_default());
        lines.push(format_row(cells, width));
    }

    lines.join("\n")
}

pub fn render_result(result: &QueryResult, limit: usize) -> String {
    render_table(result.columns.as_slice(), &result.records, limit)
}

pub fn print_result(result: &QueryResult, limit: usize) {
    println!("{}", render_result(result, limit));
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, width: usize) -> String {
    let mut line = String::from(SEPARATOR);
    for cell in cells {
        line.push_str(&format!(" {:<width$} {}", cell, SEPARATOR, width = width));
    }
    line
}
