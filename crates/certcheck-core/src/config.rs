//! Configuration for certcheck-core
//!
//! Matching thresholds and refresh timing. Defaults reproduce the standard
//! detection behavior; tuning is only needed for unusual catalogs.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name matching parameters
    pub matching: MatchingConfig,
    /// Re-classification timing
    pub refresh: RefreshConfig,
}

/// Name matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Names must be strictly more similar than this to count as "similar"
    pub similarity_threshold: f64,
    /// Maximum edit distance between two type names to flag them as duplicates
    pub type_edit_distance: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
            type_edit_distance: 3,
        }
    }
}

/// Re-classification timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Quiet period before a burst of change notifications triggers one run
    pub debounce_ms: u64,
    /// Classify once as soon as a session starts
    pub initial_run: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            initial_run: true,
        }
    }
}

impl RefreshConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Configuration validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid TOML: {0}")]
    Toml(String),

    #[error("Invalid JSON: {0}")]
    Json(String),
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.matching.similarity_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(ConfigError::OutOfRange(format!(
                "similarity_threshold must be in [0.0, 1.0), got {}",
                threshold
            )));
        }

        if !(100..=10_000).contains(&self.refresh.debounce_ms) {
            return Err(ConfigError::OutOfRange(format!(
                "debounce_ms must be between 100 and 10000, got {}",
                self.refresh.debounce_ms
            )));
        }

        Ok(())
    }
}
