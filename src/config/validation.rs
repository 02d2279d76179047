//! Configuration validation module
//!
//! This module provides validation functions for the configuration so that
//! a broken setup is reported before any catalog is loaded.

use crate::utils::errors::{VernacularError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_translations_config(&settings.translations)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate translation sources configuration
fn validate_translations_config(config: &super::TranslationsConfig) -> Result<()> {
    if config.default_domain.trim().is_empty() {
        return Err(VernacularError::Config(
            "Default domain is required".to_string()
        ));
    }

    if config.sources.iter().any(|source| source.trim().is_empty()) {
        return Err(VernacularError::Config(
            "Translation source paths cannot be empty".to_string()
        ));
    }

    if let Some(ref restrict) = config.restrict {
        if restrict.iter().any(|domain| domain.trim().is_empty()) {
            return Err(VernacularError::Config(
                "Restricted domain names cannot be empty".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(VernacularError::Config(
            "Logging level is required".to_string()
        ));
    }

    if let Some(ref directory) = config.directory {
        if directory.trim().is_empty() {
            return Err(VernacularError::Config(
                "Log directory cannot be empty when set".to_string()
            ));
        }
    }

    Ok(())
}
