//! Engine configuration from TOML files and environment variables.
//!
//! A configuration file is optional; every field has a default, and
//! `TFA_*` environment variables override whatever the file provides.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::granularity::Granularity;

/// Session configuration for the analytics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Producer domain whose events this session follows.
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Bounded capacity of the in-process feed channel.
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
    /// Granularity selected when a view first opens.
    #[serde(default = "default_granularity")]
    pub default_granularity: Granularity,
}

fn default_domain() -> String {
    "vehicle-passages".to_string()
}

fn default_feed_capacity() -> usize {
    256
}

fn default_granularity() -> Granularity {
    Granularity::Day
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            domain: default_domain(),
            feed_capacity: default_feed_capacity(),
            default_granularity: default_granularity(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse engine config: {}", e))
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }

    /// Apply `TFA_DOMAIN`, `TFA_FEED_CAPACITY`, and
    /// `TFA_DEFAULT_GRANULARITY` overrides.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(domain) = env::var("TFA_DOMAIN") {
            if !domain.is_empty() {
                self.domain = domain;
            }
        }
        if let Some(capacity) = env::var("TFA_FEED_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.feed_capacity = capacity;
        }
        if let Some(granularity) = env::var("TFA_DEFAULT_GRANULARITY")
            .ok()
            .and_then(|s| Granularity::parse(&s))
        {
            self.default_granularity = granularity;
        }
        self
    }

    /// Load from an optional file, fall back to defaults, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.apply_env_overrides())
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;
    use crate::models::granularity::Granularity;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.domain, "vehicle-passages");
        assert_eq!(config.feed_capacity, 256);
        assert_eq!(config.default_granularity, Granularity::Day);
    }

    #[test]
    fn test_from_toml_full() {
        let toml = r#"
            domain = "bike-passages"
            feed_capacity = 64
            default_granularity = "week"
        "#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.domain, "bike-passages");
        assert_eq!(config.feed_capacity, 64);
        assert_eq!(config.default_granularity, Granularity::Week);
    }

    #[test]
    fn test_from_toml_partial_uses_defaults() {
        let config = EngineConfig::from_toml_str("domain = \"lorries\"").unwrap();
        assert_eq!(config.domain, "lorries");
        assert_eq!(config.feed_capacity, 256);
        assert_eq!(config.default_granularity, Granularity::Day);
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(EngineConfig::from_toml_str("feed_capacity = \"many\"").is_err());
    }
}
