use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::Rarity;

/// Raised when a reward table is missing a rarity tier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no {0} items")]
    EmptyTier(Rarity),
}

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be between 0 and 1 (got {value:.3})")]
    Probability { field: &'static str, value: f64 },
    #[error("rarity thresholds sum to {sum:.3}, which exceeds 1")]
    ThresholdSum { sum: f64 },
    #[error("increment range invalid (min {min:.2}, max {max:.2})")]
    IncrementRange { min: f64, max: f64 },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    #[error("failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("`{0}` is not an email address")]
    InvalidEmail(String),
    #[error("form service rejected the submission ({0})")]
    Rejected(reqwest::StatusCode),
    #[error("submission failed: {0}")]
    Transport(#[from] reqwest::Error),
}
