use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_STORAGE_KEY: &str = "darkroom-cat-photos";
pub const DEFAULT_CONTACT_ENDPOINT: &str = "https://formspree.io/f/mldnvzqa";

/// Probability mass of the two rare tiers. Common takes whatever is left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityThresholds {
    pub legendary: f64,
    pub rare: f64,
}

impl Default for RarityThresholds {
    fn default() -> Self {
        Self {
            legendary: 0.05,
            rare: 0.20,
        }
    }
}

impl RarityThresholds {
    pub fn common(&self) -> f64 {
        1.0 - self.legendary - self.rare
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("thresholds.legendary", self.legendary)?;
        check_probability("thresholds.rare", self.rare)?;
        let sum = self.legendary + self.rare;
        if sum > 1.0 {
            return Err(ConfigError::ThresholdSum { sum });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: RarityThresholds,
    pub history_limit: usize,
    pub tick_interval_ms: u64,
    pub increment_min: f64,
    pub increment_max: f64,
    pub bubble_chance: f64,
    pub storage_key: String,
    pub contact_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: RarityThresholds::default(),
            history_limit: 10,
            tick_interval_ms: 100,
            increment_min: 1.0,
            increment_max: 4.0,
            bubble_chance: 0.3,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            contact_endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Reads a TOML file. Fields left out of the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        check_probability("bubble_chance", self.bubble_chance)?;
        if self.history_limit == 0 {
            return Err(ConfigError::Zero {
                field: "history_limit",
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Zero {
                field: "tick_interval_ms",
            });
        }
        let finite = self.increment_min.is_finite() && self.increment_max.is_finite();
        if !(finite && self.increment_min > 0.0 && self.increment_min < self.increment_max) {
            return Err(ConfigError::IncrementRange {
                min: self.increment_min,
                max: self.increment_max,
            });
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}
