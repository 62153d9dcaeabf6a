//! Configuration module for the churn predictor.
//!
//! Layers, later wins: built-in defaults, optional TOML file, environment
//! variables (after `.env` is loaded by the binary), CLI flags.

mod artifact_config;
mod logging_config;

pub use artifact_config::ArtifactEnvConfig;
pub use logging_config::{LogFormat, LoggingConfig};

use anyhow::{Context, Result};
use logging_config::LoggingFile;
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub artifacts: ArtifactEnvConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    artifacts: ArtifactEnvConfig,
    logging: LoggingFile,
}

impl Config {
    /// Defaults + process environment. `CHURN_CONFIG` names an optional TOML file.
    pub fn from_env() -> Result<Self> {
        let file = env::var("CHURN_CONFIG").ok();
        Self::load(file.as_deref().map(Path::new), |key| env::var(key).ok())
    }

    /// Builds the configuration from an optional TOML file and a variable lookup.
    pub fn load(file: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_toml_file(path)?,
            None => Config::default(),
        };

        config.artifacts.apply_env(&lookup);
        config.logging.apply_env(&lookup)?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut logging = LoggingConfig::default();
        logging.apply_file(file.logging)?;

        Ok(Config {
            artifacts: file.artifacts,
            logging,
        })
    }
}
