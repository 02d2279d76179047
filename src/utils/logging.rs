//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! helpers for catalog loading.

use std::path::Path;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{VernacularError, Result};

/// Initialize logging based on configuration
///
/// When a log directory is configured, a daily rolling file layer is added
/// next to stdout. The returned guard flushes that file writer on drop and
/// must be kept alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| VernacularError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "vernacular.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| VernacularError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a catalog that was loaded into the store
pub fn log_catalog_loaded(domain: &str, locale: &str, path: &Path, messages: usize) {
    debug!(
        domain = domain,
        locale = locale,
        path = %path.display(),
        messages = messages,
        "Catalog loaded"
    );
}

/// Log a translation source that was skipped
pub fn log_source_skipped(path: &Path, reason: &str) {
    warn!(
        path = %path.display(),
        reason = reason,
        "Translation source skipped"
    );
}
