//! Logging configuration parsing.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::str::FromStr;
use tracing::Level;

/// Output style of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => anyhow::bail!("Invalid LOG_FORMAT: {}. Must be 'pretty' or 'compact'", s),
        }
    }
}

impl TryFrom<String> for LogFormat {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: Level::INFO,
        }
    }
}

/// TOML shape; the level stays a string until validated
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LoggingFile {
    pub format: Option<LogFormat>,
    pub level: Option<String>,
}

impl LoggingConfig {
    pub(crate) fn apply_file(&mut self, file: LoggingFile) -> Result<()> {
        if let Some(format) = file.format {
            self.format = format;
        }
        if let Some(level) = file.level {
            self.level = parse_level(&level)?;
        }
        Ok(())
    }

    pub fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(format) = lookup("LOG_FORMAT") {
            self.format = format.parse()?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.level = parse_level(&level)?;
        }
        Ok(())
    }
}

fn parse_level(s: &str) -> Result<Level> {
    Level::from_str(s).with_context(|| format!("Invalid log level: {}", s))
}
