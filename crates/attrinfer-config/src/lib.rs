//! Configuration for the attrinfer engine.
//!
//! Nothing in the core algebra (§3–§4 of the spec) needs a configuration
//! file — declarations are code, not data. This crate exists anyway because
//! the reference architecture carries a sibling `*-config` crate for every
//! behavior crate, with the same `from_toml_str`/`from_toml_file`/`Default`
//! shape, and an ambient concern like "how strict should score validation
//! be" belongs in a config type rather than as ad hoc constructor arguments
//! threaded through every evaluator.
//!
//! # Examples
//!
//! ```
//! use attrinfer_config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     strict_scores = true
//! "#).unwrap();
//! assert!(config.strict_scores);
//! ```
//!
//! ```
//! use attrinfer_config::EngineConfig;
//!
//! // Proceeds with defaults if the file doesn't exist.
//! let config = EngineConfig::load("attrinfer.toml").unwrap_or_default();
//! assert!(!config.strict_scores);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Runtime configuration for an attrinfer engine instance.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// If true, a score function returning NaN or negative is a hard
    /// [`attrinfer_core::InferenceError`]; if false (the default, matching
    /// the spec's documented leniency), such a score is clamped to 0 for
    /// aggregation while the original value stays visible in introspection.
    #[serde(default)]
    pub strict_scores: bool,

    /// Emit an extra `tracing::debug!` event per equivalence-class merge.
    /// Off by default: it is O(candidates) per source and only useful while
    /// debugging a canonicalizer.
    #[serde(default)]
    pub log_grouping_decisions: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_strict_scores(mut self, strict: bool) -> Self {
        self.strict_scores = strict;
        self
    }

    pub fn with_log_grouping_decisions(mut self, enabled: bool) -> Self {
        self.log_grouping_decisions = enabled;
        self
    }
}
