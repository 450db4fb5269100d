use std::path::PathBuf;
use thiserror::Error;

/// Error type shared by the loaders and both query engines
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("File not found: {}. Ensure the filename has been entered correctly", .0.display())]
    FileNotFound(PathBuf),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{kind}: '{value}' not found")]
    UnknownCategory { kind: &'static str, value: String },

    #[error("Duplicate column '{0}' in header row")]
    DuplicateColumn(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {row} has {found} fields but the header has {expected}")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExplorerError {
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        ExplorerError::UnknownCategory {
            kind,
            value: value.into(),
        }
    }

    /// Errors the interactive session reports and then carries on from
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ExplorerError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
