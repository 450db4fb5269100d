//! Shapes returned by the query engines.
//!
//! Row-store queries return a [`QueryResult`] of projections. Grouped queries
//! return shapes a chart renderer can consume directly: labeled frequency
//! series (pie), long-form aggregate tables that split into line series, and
//! cross-tabs with aligned count arrays (grouped bars).

use crate::data::data_provider::DataProvider;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reduced view of one record: requested column name to value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    fields: Vec<(String, String)>,
}

impl Projection {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Projection {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut projection = Projection::new();
        for (column, value) in iter {
            projection.insert(column, value);
        }
        projection
    }
}

/// Ordered projections sharing one column list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub records: Vec<Projection>,
}

impl QueryResult {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DataProvider for QueryResult {
    fn get_row(&self, index: usize) -> Option<Vec<String>> {
        let record = self.records.get(index)?;
        Some(
            self.columns
                .iter()
                .map(|c| record.get(c).unwrap_or_default().to_string())
                .collect(),
        )
    }

    fn get_column_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn get_row_count(&self) -> usize {
        self.records.len()
    }
}

/// Value counts of one column, most frequent first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencySeries {
    pub column: String,
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

impl FrequencySeries {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Share of the total per label, in percent
    pub fn proportions(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts
            .iter()
            .map(|c| *c as f64 * 100.0 / total as f64)
            .collect()
    }

    /// First `n` entries
    pub fn head(mut self, n: usize) -> Self {
        self.labels.truncate(n);
        self.counts.truncate(n);
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels
            .iter()
            .map(|l| l.as_str())
            .zip(self.counts.iter().copied())
    }
}

impl DataProvider for FrequencySeries {
    fn get_row(&self, index: usize) -> Option<Vec<String>> {
        let label = self.labels.get(index)?;
        let count = self.counts.get(index)?;
        let share = self.proportions().get(index).copied().unwrap_or_default();
        Some(vec![label.clone(), count.to_string(), format!("{:.1}%", share)])
    }

    fn get_column_names(&self) -> Vec<String> {
        vec![self.column.clone(), "count".to_string(), "share".to_string()]
    }

    fn get_row_count(&self) -> usize {
        self.labels.len()
    }
}

/// One group of an aggregate: its key values and one mean per value column.
/// A mean over a group with no non-null values is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: Vec<String>,
    pub values: Vec<Option<f64>>,
}

/// Long-form grouped aggregate: one row per group key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateTable {
    pub group_columns: Vec<String>,
    pub value_columns: Vec<String>,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, key: &[&str]) -> Option<&AggregateRow> {
        self.rows
            .iter()
            .find(|row| row.key.iter().map(|k| k.as_str()).eq(key.iter().copied()))
    }

    /// Keep the groups whose key at `level` equals `value`, then drop that
    /// key column since it is constant
    pub fn select_level(&self, level: usize, value: &str) -> AggregateTable {
        let mut group_columns = self.group_columns.clone();
        if level < group_columns.len() {
            group_columns.remove(level);
        }

        let rows = self
            .rows
            .iter()
            .filter(|row| row.key.get(level).map(|k| k.as_str()) == Some(value))
            .map(|row| {
                let mut key = row.key.clone();
                key.remove(level);
                AggregateRow {
                    key,
                    values: row.values.clone(),
                }
            })
            .collect();

        AggregateTable {
            group_columns,
            value_columns: self.value_columns.clone(),
            rows,
        }
    }

    /// Split a two-level aggregate into one series per first-level key.
    /// x is the second-level key, y the first value column.
    pub fn line_series(&self) -> Vec<LineSeries> {
        let mut series: Vec<LineSeries> = Vec::new();
        for row in &self.rows {
            let (Some(name), Some(x)) = (row.key.first(), row.key.get(1)) else {
                continue;
            };
            let y = row.values.first().copied().flatten();
            match series.iter_mut().find(|s| &s.name == name) {
                Some(existing) => {
                    existing.x.push(x.clone());
                    existing.y.push(y);
                }
                None => series.push(LineSeries {
                    name: name.clone(),
                    x: vec![x.clone()],
                    y: vec![y],
                }),
            }
        }
        series
    }
}

impl DataProvider for AggregateTable {
    fn get_row(&self, index: usize) -> Option<Vec<String>> {
        let row = self.rows.get(index)?;
        let mut cells = row.key.clone();
        cells.extend(row.values.iter().map(|v| format_mean(*v)));
        Some(cells)
    }

    fn get_column_names(&self) -> Vec<String> {
        self.group_columns
            .iter()
            .chain(self.value_columns.iter())
            .cloned()
            .collect()
    }

    fn get_row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One line of a line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
}

/// Counts of one categorical column against another.
/// `counts[row_label][i]` pairs with `column_labels[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub row_column: String,
    pub column_column: String,
    pub column_labels: Vec<String>,
    pub counts: BTreeMap<String, Vec<usize>>,
}

impl CrossTab {
    /// Row labels in sorted order
    pub fn row_labels(&self) -> Vec<String> {
        self.counts.keys().cloned().collect()
    }

    pub fn count(&self, row_label: &str, column_label: &str) -> Option<usize> {
        let col = self.column_labels.iter().position(|l| l == column_label)?;
        self.counts.get(row_label)?.get(col).copied()
    }
}

impl DataProvider for CrossTab {
    fn get_row(&self, index: usize) -> Option<Vec<String>> {
        let (label, counts) = self.counts.iter().nth(index)?;
        let mut cells = vec![label.clone()];
        cells.extend(counts.iter().map(|c| c.to_string()));
        Some(cells)
    }

    fn get_column_names(&self) -> Vec<String> {
        let mut names = vec![self.row_column.clone()];
        names.extend(self.column_labels.iter().cloned());
        names
    }

    fn get_row_count(&self) -> usize {
        self.counts.len()
    }
}

pub fn format_mean(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "NaN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate() -> AggregateTable {
        AggregateTable {
            group_columns: vec!["Ethnicity".to_string(), "Stage".to_string()],
            value_columns: vec!["Smoking_Pack_Years".to_string()],
            rows: vec![
                AggregateRow {
                    key: vec!["Asian".to_string(), "Stage I".to_string()],
                    values: vec![Some(10.0)],
                },
                AggregateRow {
                    key: vec!["Asian".to_string(), "Stage II".to_string()],
                    values: vec![Some(12.5)],
                },
                AggregateRow {
                    key: vec!["Caucasian".to_string(), "Stage I".to_string()],
                    values: vec![None],
                },
            ],
        }
    }

    #[test]
    fn test_projection_keeps_insertion_order() {
        let projection: Projection = [("Age", "45"), ("Gender", "Male")].into_iter().collect();
        assert_eq!(projection.values().collect::<Vec<_>>(), vec!["45", "Male"]);
        assert_eq!(projection.get("Gender"), Some("Male"));
        assert_eq!(projection.get("Stage"), None);
    }

    #[test]
    fn test_line_series_split_by_first_key() {
        let series = aggregate().line_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Asian");
        assert_eq!(series[0].x, vec!["Stage I", "Stage II"]);
        assert_eq!(series[0].y, vec![Some(10.0), Some(12.5)]);
        assert_eq!(series[1].y, vec![None]);
    }

    #[test]
    fn test_select_level_drops_constant_key() {
        let selected = aggregate().select_level(0, "Asian");
        assert_eq!(selected.group_columns, vec!["Stage"]);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected.rows[1].key, vec!["Stage II"]);
    }

    #[test]
    fn test_frequency_proportions() {
        let series = FrequencySeries {
            column: "Treatment".to_string(),
            labels: vec!["Surgery".to_string(), "Radiotherapy".to_string()],
            counts: vec![3, 1],
        };
        assert_eq!(series.proportions(), vec![75.0, 25.0]);
        assert_eq!(
            series.get_row(0),
            Some(vec!["Surgery".to_string(), "3".to_string(), "75.0%".to_string()])
        );
    }

    #[test]
    fn test_aggregate_provider_formats_means() {
        let table = aggregate();
        assert_eq!(
            table.get_column_names(),
            vec!["Ethnicity", "Stage", "Smoking_Pack_Years"]
        );
        assert_eq!(table.get_row(2).unwrap()[2], "NaN");
        assert_eq!(table.get_row(1).unwrap()[2], "12.50");
    }
}
