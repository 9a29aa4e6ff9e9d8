//! Error types for configuration and catalog loading

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Module id '{0}' is invalid (expected lowercase letters, digits and underscores)")]
    InvalidId(String),

    #[error("Duplicate module id: {0}")]
    DuplicateId(String),

    #[error("Catalog must contain exactly one mandatory module, found {0}")]
    MandatoryCount(usize),

    #[error("Mandatory module '{0}' must have zero core and ram factors")]
    MandatoryHasFactors(String),

    #[error("Module '{id}' has invalid {field}: {value}")]
    InvalidFactor {
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("CPU tiers must be strictly ascending by max_cores (at '{0}')")]
    TiersNotAscending(String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
