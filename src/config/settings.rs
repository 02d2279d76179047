//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from configuration files and environment variables.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub translations: TranslationsConfig,
    pub logging: LoggingConfig,
}

/// Translation sources and lookup defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslationsConfig {
    /// Domain used when neither the call nor the message names one
    pub default_domain: String,
    /// Roots laid out as `{root}/{locale}/LC_MESSAGES/{domain}.po`
    pub sources: Vec<String>,
    /// Compile stale `.po` files into `.mo` files before loading
    #[serde(default)]
    pub compile: bool,
    /// Only load these domains
    #[serde(default)]
    pub restrict: Option<Vec<String>>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub json: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Environment variables use the `VERNACULAR_` prefix and `__` for
    /// nesting, e.g. `VERNACULAR_TRANSLATIONS__DEFAULT_DOMAIN=app`.
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();
        let settings = config::Config::builder()
            .set_default("translations.default_domain", defaults.translations.default_domain)?
            .set_default("translations.sources", defaults.translations.sources)?
            .set_default("translations.compile", defaults.translations.compile)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?
            .add_source(config::File::with_name("vernacular").required(false))
            .add_source(
                config::Environment::with_prefix("VERNACULAR")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("translations.sources")
                    .with_list_parse_key("translations.restrict")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::VernacularError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translations: TranslationsConfig {
                default_domain: "messages".to_string(),
                sources: vec!["locales".to_string()],
                compile: false,
                restrict: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                json: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.translations.default_domain, "messages");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_deserialize_from_toml_source() {
        let raw = r#"
            [translations]
            default_domain = "test"
            sources = ["a", "b"]
            compile = true

            [logging]
            level = "debug"
        "#;
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.translations.default_domain, "test");
        assert_eq!(settings.translations.sources, vec!["a", "b"]);
        assert!(settings.translations.compile);
        assert!(settings.translations.restrict.is_none());
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.logging.directory.is_none());
        assert!(!settings.logging.json);
    }
}
