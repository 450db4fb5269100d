use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub data: DataConfig,
    pub queries: QueryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colourise titles, errors and footers
    pub use_color: bool,

    /// Rows printed by the fixed-width renderer
    pub row_limit: usize,

    /// Rows printed for the medical history question
    pub medical_history_limit: usize,

    /// Width of the text bars drawn under a distribution
    pub bar_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory listed when no file is given on the command line
    pub data_dir: PathBuf,

    /// File loaded at startup when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Survival cut-off for the top-treatments question
    pub long_survival_months: f64,

    /// How many treatments the top-treatments question reports
    pub top_treatments: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    pub level: String,

    /// Entries kept in memory for `\logs`
    pub buffer_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            row_limit: 50,
            medical_history_limit: 20,
            bar_width: 40,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Data"),
            default_file: None,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            long_survival_months: 100.0,
            top_treatments: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            buffer_size: 200,
        }
    }
}

impl Config {
    /// Load config from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("lung-cli").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Lung CLI Configuration File
# Location: ~/.config/lung-cli/config.toml (Linux)
#           ~/Library/Application Support/lung-cli/config.toml (macOS)
#           %APPDATA%\lung-cli\config.toml (Windows)

[display]
# Colour titles, errors and row-count footers
use_color = true

# Maximum rows printed by the fixed-width record tables
row_limit = 50

# Maximum rows printed for the medical history question
medical_history_limit = 20

# Width of the text bars drawn under a treatment distribution
bar_width = 40

[data]
# Directory searched for CSV files when none is given on the command line
data_dir = "Data"

# File to load at startup without asking (name inside data_dir)
# default_file = "lung_cancer_data.csv"

[queries]
# Survival cut-off (months, exclusive) for the top-treatments question
long_survival_months = 100.0

# Number of treatments reported by the top-treatments question
top_treatments = 3

[logging]
# Filter directive for the log file, e.g. "debug" or "lung_cli=trace"
# RUST_LOG takes precedence when set
level = "info"

# Number of recent log entries kept for the \logs command
buffer_size = 200
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.display.use_color);
        assert_eq!(config.display.row_limit, 50);
        assert_eq!(config.display.medical_history_limit, 20);
        assert_eq!(config.queries.top_treatments, 3);
        assert_eq!(config.data.data_dir, PathBuf::from("Data"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.display.row_limit, parsed.display.row_limit);
        assert_eq!(config.logging.level, parsed.logging.level);
    }

    #[test]
    fn test_commented_template_parses() {
        let parsed: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(parsed.queries.long_survival_months, 100.0);
        assert!(parsed.data.default_file.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display]\nrow_limit = 10\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.display.row_limit, 10);
        assert_eq!(config.display.medical_history_limit, 20);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.data.default_file = Some("patients.csv".to_string());
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.data.default_file.as_deref(), Some("patients.csv"));
    }
}
