/// Row store: every CSV record kept as its raw string fields
use crate::data::table_source::TableSource;
use crate::error::{ExplorerError, Result};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column name to position lookup built from a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Build the index, rejecting a header that names a column twice
    pub fn from_headers<I, S>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut positions = HashMap::new();

        for (idx, header) in headers.into_iter().enumerate() {
            let name: String = header.into();
            if positions.insert(name.clone(), idx).is_some() {
                return Err(ExplorerError::DuplicateColumn(name));
            }
            names.push(name);
        }

        Ok(Self { names, positions })
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| ExplorerError::MissingColumn(name.to_string()))
    }

    /// Header names in file order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    columns: ColumnIndex,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, columns: ColumnIndex, rows: Vec<Vec<String>>) -> Result<Self> {
        let expected = columns.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(ExplorerError::RowArity {
                row: idx + 1,
                expected,
                found: row.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            columns,
            rows,
        })
    }

    /// Load a comma-delimited file whose first line is the header row
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading dataset from {}", path.display());

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExplorerError::FileNotFound(path.to_path_buf()),
            _ => ExplorerError::Io(e),
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());

        Self::from_reader(name, file)
    }

    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(reader.headers()?.iter())?;
        debug!("Dataset '{}' headers: {:?}", name, columns.names());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| arity_error(e, columns.len()))?;
            rows.push(record.iter().map(|field| field.to_string()).collect());
        }

        info!(
            "Dataset '{}' loaded: {} rows, {} columns",
            name,
            rows.len(),
            columns.len()
        );

        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn field(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn invalid_field(&self, row: usize, col: usize) -> ExplorerError {
        ExplorerError::InvalidField {
            row: row + 1,
            column: self.columns.names()[col].clone(),
            value: self.field(row, col).to_string(),
        }
    }
}

fn arity_error(err: csv::Error, expected: usize) -> ExplorerError {
    if let csv::ErrorKind::UnequalLengths { pos, len, .. } = err.kind() {
        return ExplorerError::RowArity {
            row: pos.as_ref().map(|p| p.record() as usize).unwrap_or(0),
            expected,
            found: *len as usize,
        };
    }
    ExplorerError::Csv(err)
}

impl TableSource for Dataset {
    fn column_position(&self, name: &str) -> Result<usize> {
        self.columns.require(name)
    }

    fn column_name(&self, col: usize) -> String {
        self.columns.names()[col].clone()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn text(&self, row: usize, col: usize) -> Cow<'_, str> {
        Cow::Borrowed(self.field(row, col))
    }

    fn number(&self, row: usize, col: usize) -> Result<Option<f64>> {
        self.field(row, col)
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| self.invalid_field(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Patient_ID,Age,Gender\n1,45,Male\n2,61,Female\n";

    #[test]
    fn test_column_index_is_bijective() {
        let index = ColumnIndex::from_headers(["Patient_ID", "Age", "Gender"]).unwrap();
        assert_eq!(index.len(), 3);
        for (pos, name) in index.names().iter().enumerate() {
            assert_eq!(index.position(name), Some(pos));
        }
        assert_eq!(index.position("age"), None);
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = ColumnIndex::from_headers(["Age", "Gender", "Age"]).unwrap_err();
        assert!(matches!(err, ExplorerError::DuplicateColumn(name) if name == "Age"));
    }

    #[test]
    fn test_from_reader() {
        let dataset = Dataset::from_reader("sample", SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.columns().names(), &["Patient_ID", "Age", "Gender"]);
        assert_eq!(dataset.field(1, 2), "Female");
    }

    #[test]
    fn test_unequal_row_reports_arity() {
        let csv = "Patient_ID,Age\n1,45\n2\n";
        let err = Dataset::from_reader("bad", csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ExplorerError::RowArity {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_number_rejects_text() {
        let csv = "Patient_ID,Age\n1,unknown\n";
        let dataset = Dataset::from_reader("bad", csv.as_bytes()).unwrap();
        let err = dataset.number(0, 1).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidField { row: 1, .. }));
    }

    #[test]
    fn test_new_checks_arity() {
        let columns = ColumnIndex::from_headers(["A", "B"]).unwrap();
        let rows = vec![vec!["1".to_string(), "2".to_string()], vec!["3".to_string()]];
        assert!(Dataset::new("t", columns, rows).is_err());
    }
}
