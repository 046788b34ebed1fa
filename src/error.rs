//! Error types for the fleet pipeline.

use thiserror::Error;

/// Errors surfaced by loading, normalizing and exporting fleet data.
#[derive(Debug, Error)]
pub enum FleetError {
    /// A mandatory numeric cell could not be parsed. Halts the whole load.
    #[error("malformed {column} on row {row}: {value:?}")]
    MalformedField {
        /// 1-based data row (header excluded)
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid filter value: {0}")]
    InvalidFilter(String),
}

pub type Result<T> = std::result::Result<T, FleetError>;
