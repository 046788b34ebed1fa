use crate::error::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "fleet_report.toml";

/// Application settings, read from TOML. Missing keys fall back to
/// [`AppConfig::default`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV export of the fleet spreadsheet
    pub data_path: PathBuf,
    /// Where exports are written
    pub output_dir: PathBuf,
    /// Rows shown in console previews
    pub preview_rows: usize,
    /// tracing level (error, warn, info, debug, trace)
    pub log_level: String,
    pub currency_symbol: String,
    /// Fixed "today" for reproducible reports; the wall clock otherwise
    pub reference_date: Option<NaiveDate>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("frota_formatada.csv"),
            output_dir: PathBuf::from("."),
            preview_rows: 10,
            log_level: "info".to_string(),
            currency_symbol: "R$".to_string(),
            reference_date: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// An explicit path must exist. Without one, `fleet_report.toml` is used
    /// if present, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    info!("Using config file {}", default_path.display());
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FleetError;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            data_path = "fleet.csv"
            reference_date = "2025-06-01"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.data_path, PathBuf::from("fleet.csv"));
        assert_eq!(cfg.reference_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(cfg.preview_rows, 10);
        assert_eq!(cfg.currency_symbol, "R$");
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_bad_value_is_config_error() {
        let err = AppConfig::from_toml_str("preview_rows = \"ten\"").unwrap_err();
        assert!(matches!(err, FleetError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, FleetError::Io(_)));
    }
}
