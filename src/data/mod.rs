//! Data layer
//!
//! Row store and typed table over the same CSV file, the shared predicate
//! and group-by machinery, and the two query engines built on them.

pub mod columns;

// Storage
pub mod data_files;
pub mod dataset;
pub mod datatable;
pub mod table_source;

// Query machinery
pub mod group_by;
pub mod predicate;

// Query engines
pub mod grouped_queries;
pub mod row_queries;

// Result shapes and output
pub mod data_exporter;
pub mod data_provider;
pub mod results;
