//! Logging setup shared by the binaries.
//!
//! `RUST_LOG` is honoured through `EnvFilter`; the configured level is added as
//! the default directive.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(config.level.into())
}

/// Installs the global subscriber. Safe to call more than once; later calls are
/// ignored.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = build_filter(config);

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false).pretty())
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("Tracing subscriber already installed: {}", e);
    }
}
