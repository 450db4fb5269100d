use crate::data::dataset::Dataset;
use crate::data::table_source::TableSource;
use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Field text read as a missing value, compared case-insensitively
pub const MISSING_TOKENS: [&str; 7] = ["", "null", "nan", "-nan", "na", "n/a", "#n/a"];

pub fn is_missing(field: &str) -> bool {
    let field = field.trim();
    MISSING_TOKENS
        .iter()
        .any(|token| field.eq_ignore_ascii_case(token))
}

/// Storage type of a column, widened as values are seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Null,
    Integer,
    Float,
    String,
    /// Numbers and text in one column; each cell keeps its own type
    Mixed,
}

impl DataType {
    /// Narrowest type that holds `field`
    pub fn infer(field: &str) -> Self {
        if is_missing(field) {
            return DataType::Null;
        }

        let field = field.trim();
        if field.parse::<i64>().is_ok() {
            DataType::Integer
        } else if field.parse::<f64>().is_ok() {
            DataType::Float
        } else {
            DataType::String
        }
    }

    pub fn widen(self, other: DataType) -> Self {
        match (self, other) {
            (DataType::Null, t) | (t, DataType::Null) => t,
            (a, b) if a == b => a,
            (DataType::Integer, DataType::Float) | (DataType::Float, DataType::Integer) => {
                DataType::Float
            }
            _ => DataType::Mixed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataColumn {
    pub name: String,
    pub data_type: DataType,
    pub null_count: usize,
    pub unique_values: usize,
}

impl DataColumn {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            null_count: 0,
            unique_values: 0,
        }
    }
}

/// One typed cell. Category text is stored exactly as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Null,
    Integer(i64),
    Float(f64),
    String(String),
}

impl DataValue {
    /// Convert a CSV field to a cell of its column's type
    pub fn parse(field: &str, column_type: DataType) -> Self {
        if is_missing(field) {
            return DataValue::Null;
        }

        let trimmed = field.trim();
        let as_text = || DataValue::String(field.to_string());
        match column_type {
            DataType::Null => DataValue::Null,
            DataType::Integer => trimmed
                .parse()
                .map(DataValue::Integer)
                .unwrap_or_else(|_| as_text()),
            DataType::Float => trimmed
                .parse()
                .map(DataValue::Float)
                .unwrap_or_else(|_| as_text()),
            DataType::String => as_text(),
            DataType::Mixed => Self::parse(field, DataType::infer(field)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Integer(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            DataValue::Null | DataValue::String(_) => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => Ok(()),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(v) => write!(f, "{}", v),
            DataValue::String(s) => f.write_str(s),
        }
    }
}

/// A row of data in the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRow {
    pub values: Vec<DataValue>,
}

impl DataRow {
    pub fn new(values: Vec<DataValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&DataValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Labeled, typed table used by the grouped query engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    pub name: String,
    pub columns: Vec<DataColumn>,
    pub rows: Vec<DataRow>,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn add_column(&mut self, column: DataColumn) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn add_row(&mut self, row: DataRow) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ExplorerError::RowArity {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Build the typed table from a loaded row store. Column types are
    /// settled over every field first, then each cell is converted once while
    /// null counts and cardinality are collected.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let names = dataset.columns().names();
        let mut types = vec![DataType::Null; names.len()];
        for row in dataset.rows() {
            for (data_type, field) in types.iter_mut().zip(row) {
                *data_type = data_type.widen(DataType::infer(field));
            }
        }

        let mut table = DataTable::new(dataset.name());
        for (name, data_type) in names.iter().zip(&types) {
            table.add_column(DataColumn::new(name.clone(), *data_type));
        }

        let mut distinct: Vec<HashSet<&str>> = vec![HashSet::new(); names.len()];
        for row in dataset.rows() {
            let mut values = Vec::with_capacity(types.len());
            for (col_idx, field) in row.iter().enumerate() {
                let value = DataValue::parse(field, types[col_idx]);
                if value.is_null() {
                    table.columns[col_idx].null_count += 1;
                } else {
                    distinct[col_idx].insert(field.trim());
                }
                values.push(value);
            }
            table.add_row(DataRow::new(values))?;
        }

        for (column, seen) in table.columns.iter_mut().zip(&distinct) {
            column.unique_values = seen.len();
        }

        debug!(
            "Typed table '{}' built: {} rows, {} columns",
            table.name,
            table.row_count(),
            table.column_count()
        );

        Ok(table)
    }

    pub fn get_column(&self, name: &str) -> Option<&DataColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_value(&self, row: usize, col: usize) -> Option<&DataValue> {
        self.rows.get(row)?.get(col)
    }

    pub fn get_value_by_name(&self, row: usize, col_name: &str) -> Option<&DataValue> {
        let col_idx = self.get_column_index(col_name)?;
        self.get_value(row, col_idx)
    }

    /// Generate a debug dump string for display
    pub fn debug_dump(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("DataTable: {}\n", self.name));
        output.push_str(&format!(
            "Rows: {} | Columns: {}\n",
            self.row_count(),
            self.column_count()
        ));

        output.push_str("\nColumns:\n");
        for column in &self.columns {
            output.push_str(&format!("  {} ({:?})", column.name, column.data_type));
            if column.null_count > 0 {
                output.push_str(&format!(" - {} nulls", column.null_count));
            }
            output.push_str(&format!(", {} unique\n", column.unique_values));
        }

        output
    }
}

impl TableSource for DataTable {
    fn column_position(&self, name: &str) -> Result<usize> {
        self.get_column_index(name)
            .ok_or_else(|| ExplorerError::MissingColumn(name.to_string()))
    }

    fn column_name(&self, col: usize) -> String {
        self.columns[col].name.clone()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn text(&self, row: usize, col: usize) -> Cow<'_, str> {
        match &self.rows[row].values[col] {
            DataValue::String(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }

    fn number(&self, row: usize, col: usize) -> Result<Option<f64>> {
        let value = &self.rows[row].values[col];
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_f64()
            .map(Some)
            .ok_or_else(|| ExplorerError::InvalidField {
                row: row + 1,
                column: self.columns[col].name.clone(),
                value: value.to_string(),
            })
    }
}
