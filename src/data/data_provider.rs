//! Data provider trait for abstracting result access
//!
//! Display and export work against this trait so they do not need to know
//! whether they are showing a row-store projection or a grouped aggregate.

use std::fmt::Debug;

/// Core trait for read-only, string-rendered access to a result
pub trait DataProvider: Debug {
    /// Get a single row by index
    /// Returns None if the index is out of bounds
    fn get_row(&self, index: usize) -> Option<Vec<String>>;

    /// Get the column names/headers
    fn get_column_names(&self) -> Vec<String>;

    /// Get the total number of rows
    fn get_row_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.get_row_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MockDataProvider {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    }

    impl DataProvider for MockDataProvider {
        fn get_row(&self, index: usize) -> Option<Vec<String>> {
            self.rows.get(index).cloned()
        }

        fn get_column_names(&self) -> Vec<String> {
            self.columns.clone()
        }

        fn get_row_count(&self) -> usize {
            self.rows.len()
        }
    }

    #[test]
    fn test_empty_provider() {
        let provider = MockDataProvider {
            columns: vec!["Treatment".to_string()],
            rows: Vec::new(),
        };
        assert!(provider.is_empty());
        assert_eq!(provider.get_row(0), None);
    }

    #[test]
    fn test_rows_by_index() {
        let provider = MockDataProvider {
            columns: vec!["Age".to_string(), "Tumor_Location".to_string()],
            rows: vec![
                vec!["45".to_string(), "Upper Lobe".to_string()],
                vec!["61".to_string(), "Lower Lobe".to_string()],
            ],
        };

        assert!(!provider.is_empty());
        assert_eq!(provider.get_row_count(), 2);
        assert_eq!(provider.get_row(1).unwrap()[1], "Lower Lobe");
    }
}
