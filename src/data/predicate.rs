use crate::data::table_source::TableSource;
use crate::error::{ExplorerError, Result};
use tracing::debug;

/// Row filter expressed against column names.
///
/// The same expression is evaluated by the row store and by the typed table,
/// so a threshold or matching rule only exists in one place.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Column parsed as an integer equals the value
    IntEquals { column: String, value: i64 },
    /// Exact text equality
    Equals { column: String, value: String },
    /// Case-insensitive substring match
    ContainsIgnoreCase { column: String, needle: String },
    /// Strict numeric greater-than; null cells never match
    GreaterThan { column: String, threshold: f64 },
    /// Strict numeric less-than; null cells never match
    LessThan { column: String, threshold: f64 },
    /// Flag column holding yes/y/true/1 (any case)
    Truthy { column: String },
    And(Box<Predicate>, Box<Predicate>),
    /// Both sides are evaluated for every row so a malformed field on the
    /// right is reported even when the left already matched
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn int_equals(column: &str, value: i64) -> Self {
        Predicate::IntEquals {
            column: column.to_string(),
            value,
        }
    }

    pub fn equals(column: &str, value: impl Into<String>) -> Self {
        Predicate::Equals {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn contains_ignore_case(column: &str, needle: &str) -> Self {
        Predicate::ContainsIgnoreCase {
            column: column.to_string(),
            needle: needle.to_lowercase(),
        }
    }

    pub fn greater_than(column: &str, threshold: f64) -> Self {
        Predicate::GreaterThan {
            column: column.to_string(),
            threshold,
        }
    }

    pub fn less_than(column: &str, threshold: f64) -> Self {
        Predicate::LessThan {
            column: column.to_string(),
            threshold,
        }
    }

    pub fn truthy(column: &str) -> Self {
        Predicate::Truthy {
            column: column.to_string(),
        }
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Resolve column names to positions once, before a scan
    pub fn bind<S: TableSource + ?Sized>(&self, source: &S) -> Result<BoundPredicate> {
        Ok(match self {
            Predicate::IntEquals { column, value } => BoundPredicate::IntEquals {
                col: source.column_position(column)?,
                value: *value,
            },
            Predicate::Equals { column, value } => BoundPredicate::Equals {
                col: source.column_position(column)?,
                value: value.clone(),
            },
            Predicate::ContainsIgnoreCase { column, needle } => {
                BoundPredicate::ContainsIgnoreCase {
                    col: source.column_position(column)?,
                    needle: needle.to_lowercase(),
                }
            }
            Predicate::GreaterThan { column, threshold } => BoundPredicate::GreaterThan {
                col: source.column_position(column)?,
                threshold: *threshold,
            },
            Predicate::LessThan { column, threshold } => BoundPredicate::LessThan {
                col: source.column_position(column)?,
                threshold: *threshold,
            },
            Predicate::Truthy { column } => BoundPredicate::Truthy {
                col: source.column_position(column)?,
            },
            Predicate::And(left, right) => BoundPredicate::And(
                Box::new(left.bind(source)?),
                Box::new(right.bind(source)?),
            ),
            Predicate::Or(left, right) => BoundPredicate::Or(
                Box::new(left.bind(source)?),
                Box::new(right.bind(source)?),
            ),
        })
    }
}

/// A predicate whose columns have been resolved against one table
#[derive(Debug, Clone)]
pub enum BoundPredicate {
    IntEquals { col: usize, value: i64 },
    Equals { col: usize, value: String },
    ContainsIgnoreCase { col: usize, needle: String },
    GreaterThan { col: usize, threshold: f64 },
    LessThan { col: usize, threshold: f64 },
    Truthy { col: usize },
    And(Box<BoundPredicate>, Box<BoundPredicate>),
    Or(Box<BoundPredicate>, Box<BoundPredicate>),
}

impl BoundPredicate {
    pub fn matches<S: TableSource + ?Sized>(&self, source: &S, row: usize) -> Result<bool> {
        match self {
            BoundPredicate::IntEquals { col, value } => {
                let raw = source.text(row, *col);
                let parsed = raw.trim().parse::<i64>().map_err(|_| {
                    ExplorerError::InvalidField {
                        row: row + 1,
                        column: source.column_name(*col),
                        value: raw.to_string(),
                    }
                })?;
                Ok(parsed == *value)
            }
            BoundPredicate::Equals { col, value } => Ok(source.text(row, *col) == value.as_str()),
            BoundPredicate::ContainsIgnoreCase { col, needle } => {
                Ok(source.text(row, *col).to_lowercase().contains(needle.as_str()))
            }
            BoundPredicate::GreaterThan { col, threshold } => {
                Ok(source.number(row, *col)?.is_some_and(|n| n > *threshold))
            }
            BoundPredicate::LessThan { col, threshold } => {
                Ok(source.number(row, *col)?.is_some_and(|n| n < *threshold))
            }
            BoundPredicate::Truthy { col } => Ok(is_truthy(&source.text(row, *col))),
            BoundPredicate::And(left, right) => {
                Ok(left.matches(source, row)? && right.matches(source, row)?)
            }
            BoundPredicate::Or(left, right) => {
                let left = left.matches(source, row)?;
                let right = right.matches(source, row)?;
                Ok(left || right)
            }
        }
    }
}

/// Flag values counted as set
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

/// Indices of all rows matching the predicate, in scan order
pub fn filter_rows<S: TableSource + ?Sized>(source: &S, predicate: &Predicate) -> Result<Vec<usize>> {
    let bound = predicate.bind(source)?;
    let mut matched = Vec::new();
    for row in 0..source.row_count() {
        if bound.matches(source, row)? {
            matched.push(row);
        }
    }
    debug!(
        "Predicate {:?} matched {} of {} rows",
        predicate,
        matched.len(),
        source.row_count()
    );
    Ok(matched)
}
