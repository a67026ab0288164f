//! Dashboard configuration
//! Optional `dashboard.json` in the working directory; defaults otherwise.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Workbook holding one sheet per indicator
    pub source_path: PathBuf,
    /// Indicator sheet offered when the workbook cannot be listed
    pub sheet_name: String,
    /// Main page heading
    pub title: String,
    /// Main page paragraphs
    pub welcome: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("NRB_Data.xlsx"),
            sheet_name: "Inflation".to_string(),
            title: "NRB Data".to_string(),
            welcome: vec![
                "Welcome to the data presentation app. Select an analysis from the sidebar."
                    .to_string(),
                "Developed by Parash Shrestha".to_string(),
            ],
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("no {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.sheet_name, "Inflation");
    }

    #[test]
    fn test_default_welcome_lines() {
        let config = DashboardConfig::default();
        assert_eq!(config.welcome.len(), 2);
        assert!(config.welcome[0].starts_with("Welcome to the data presentation app."));
        assert_eq!(config.welcome[1], "Developed by Parash Shrestha");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "source_path": "data/indicators.xlsx" }"#).unwrap();

        let config = DashboardConfig::load_or_default(&path).unwrap();
        assert_eq!(config.source_path, PathBuf::from("data/indicators.xlsx"));
        assert_eq!(config.title, "NRB Data");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "sheet": "GDP" }"#).unwrap();

        assert!(matches!(
            DashboardConfig::load_or_default(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
