//! Read access shared by the row store and the typed table
//!
//! Predicates and group-by operate on this trait so that a filter rule is
//! written once and evaluated the same way against either representation.

use crate::error::Result;
use std::borrow::Cow;

pub trait TableSource {
    /// Position of a column by exact (case-sensitive) name
    fn column_position(&self, name: &str) -> Result<usize>;

    /// Name of the column at a position
    fn column_name(&self, col: usize) -> String;

    /// Number of data rows (header excluded)
    fn row_count(&self) -> usize;

    /// Cell rendered as text
    fn text(&self, row: usize, col: usize) -> Cow<'_, str>;

    /// Cell as a number. `Ok(None)` means the cell is null and should be
    /// skipped; a value that cannot be read as a number is an error.
    fn number(&self, row: usize, col: usize) -> Result<Option<f64>>;

    /// Resolve several column names at once
    fn column_positions(&self, names: &[&str]) -> Result<Vec<usize>> {
        names.iter().map(|name| self.column_position(name)).collect()
    }

    /// Distinct text values of a column in first-encounter order
    fn distinct_values(&self, col: usize) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut values = Vec::new();
        for row in 0..self.row_count() {
            let value = self.text(row, col);
            if seen.insert(value.to_string()) {
                values.push(value.into_owned());
            }
        }
        values
    }
}
