use crate::error::{ExplorerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV files available in the data directory
#[derive(Debug, Clone)]
pub struct DataFiles {
    dir: PathBuf,
    files: Vec<String>,
}

impl DataFiles {
    /// List `.csv` files (case-insensitive extension) in `dir`, sorted by name
    pub fn list<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let entries = fs::read_dir(&dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExplorerError::FileNotFound(dir.clone()),
            _ => ExplorerError::Io(e),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if path.is_file() && is_csv {
                if let Some(name) = path.file_name() {
                    files.push(name.to_string_lossy().into_owned());
                }
            }
        }
        files.sort();

        debug!("Found {} CSV files in {}", files.len(), dir.display());
        Ok(Self { dir, files })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn names(&self) -> &[String] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolve a user selection: a listed file name, or its 1-based number
    /// in the listing. Unlisted names still resolve inside the directory so
    /// the loader can report them as missing.
    pub fn resolve(&self, selection: &str) -> Result<PathBuf> {
        let selection = selection.trim();
        if selection.is_empty() {
            return Err(ExplorerError::InvalidInput(
                "Please enter a valid file selection".to_string(),
            ));
        }

        if let Ok(number) = selection.parse::<usize>() {
            if let Some(name) = number.checked_sub(1).and_then(|i| self.files.get(i)) {
                return Ok(self.dir.join(name));
            }
        }

        Ok(self.dir.join(selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lists_only_csv_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "x\n").unwrap();
        fs::write(dir.path().join("a.CSV"), "x\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "x\n").unwrap();

        let files = DataFiles::list(dir.path()).unwrap();
        assert_eq!(files.names(), &["a.CSV", "b.csv"]);
        assert_eq!(files.resolve("2").unwrap(), dir.path().join("b.csv"));
        assert_eq!(files.resolve("other.csv").unwrap(), dir.path().join("other.csv"));
        assert!(files.resolve("  ").is_err());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let err = DataFiles::list(dir.path().join("Data")).unwrap_err();
        assert!(matches!(err, ExplorerError::FileNotFound(_)));
    }
}
