use crate::data::data_provider::DataProvider;
use anyhow::{anyhow, Result};
use chrono::Local;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Handles exporting query results to files
pub struct DataExporter;

impl DataExporter {
    /// Timestamped file name used when the user gives none
    pub fn default_filename(extension: &str) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("query_results_{}.{}", timestamp, extension))
    }

    /// Export any tabular result to CSV
    pub fn export_provider_to_csv(provider: &dyn DataProvider, path: &Path) -> Result<String> {
        let row_count = provider.get_row_count();
        if row_count == 0 {
            return Err(anyhow!("No data to export"));
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(provider.get_column_names())?;
        for i in 0..row_count {
            if let Some(row) = provider.get_row(i) {
                writer.write_record(&row)?;
            }
        }
        writer.flush()?;

        info!("Exported {} rows to {}", row_count, path.display());
        Ok(format!(
            "✓ Exported {} rows to CSV file: {}",
            row_count,
            path.display()
        ))
    }

    /// Export a result's chart-ready shape as pretty JSON
    pub fn export_to_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<String> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, value)?;

        info!("Exported JSON to {}", path.display());
        Ok(format!("✓ Exported JSON file: {}", path.display()))
    }
}
