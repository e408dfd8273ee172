//! Application settings loaded from `config.toml`.
//!
//! Every section is optional. A missing file yields [`AppConfig::default`], so the
//! ledger runs out of the box against the default `SQLite` database.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Unit labels guaranteed to exist after start-up
    pub units: Vec<String>,
    /// Price sheet import layout
    pub import: ImportConfig,
    /// Menu workbook export settings
    pub export: ExportConfig,
    /// Cascade behavior switches
    pub propagation: PropagationConfig,
}

/// Layout of an imported price sheet
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Name of the worksheet holding prices
    pub sheet_name: String,
    /// Number of leading rows to skip
    pub header_rows: u32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Page 1".to_string(),
            header_rows: 2,
        }
    }
}

/// Where and how menu workbooks are written
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving generated workbooks
    pub directory: PathBuf,
    /// Lay sheets out right-to-left
    pub right_to_left: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("exports"),
            right_to_left: true,
        }
    }
}

/// Propagation engine switches
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Apply the positive-cost guard to snapshots taken after an ingredient-set edit.
    /// Off by default: such edits always record a snapshot.
    pub guard_ingredient_edits: bool,
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads the configuration, falling back to defaults when the file does not exist
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        info!(
            "No configuration file at {}, using defaults",
            path.as_ref().display()
        );
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            units = ["kilo", "gram", "liter"]

            [import]
            sheet_name = "Prices"
            header_rows = 1

            [export]
            directory = "out/menus"
            right_to_left = false

            [propagation]
            guard_ingredient_edits = true
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.units, vec!["kilo", "gram", "liter"]);
        assert_eq!(config.import.sheet_name, "Prices");
        assert_eq!(config.import.header_rows, 1);
        assert_eq!(config.export.directory, PathBuf::from("out/menus"));
        assert!(!config.export.right_to_left);
        assert!(config.propagation.guard_ingredient_edits);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.units.is_empty());
        assert_eq!(config.import.sheet_name, "Page 1");
        assert_eq!(config.import.header_rows, 2);
        assert!(config.export.right_to_left);
        assert!(!config.propagation.guard_ingredient_edits);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = load_or_default("definitely/not/here.toml").unwrap();
        assert_eq!(config.import.sheet_name, "Page 1");
    }

    #[test]
    fn test_load_config_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "units = [").unwrap();
        let result = load_config(&path);
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }
}
