//! Error handling for vernacular
//!
//! This module defines the error type shared by the catalog layer, the
//! configuration layer and the translator. Missing translations are never
//! errors; everything here is either a contract violation or a broken
//! catalog/configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vernacular
#[derive(Error, Debug)]
pub enum VernacularError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Mapping is immutable, cannot assign key '{key}'")]
    ImmutableMapping { key: String },

    #[error("Malformed catalog {}: {reason}", path.display())]
    MalformedCatalog { path: PathBuf, reason: String },

    #[error("PO syntax error in {} at line {line}: {reason}", path.display())]
    PoSyntax {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Invalid Plural-Forms: {0}")]
    InvalidPluralForms(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for vernacular operations
pub type Result<T> = std::result::Result<T, VernacularError>;

impl VernacularError {
    /// Build a `MalformedCatalog` error for the given path
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        VernacularError::MalformedCatalog {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            VernacularError::Config(_) => false,
            VernacularError::ImmutableMapping { .. } => false,
            VernacularError::MalformedCatalog { .. } => false,
            VernacularError::PoSyntax { .. } => false,
            VernacularError::InvalidPluralForms(_) => false,
            VernacularError::Serialization(_) => false,
            VernacularError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VernacularError::Config(_) => ErrorSeverity::Critical,
            VernacularError::ImmutableMapping { .. } => ErrorSeverity::Error,
            VernacularError::MalformedCatalog { .. } => ErrorSeverity::Critical,
            VernacularError::PoSyntax { .. } => ErrorSeverity::Critical,
            VernacularError::InvalidPluralForms(_) => ErrorSeverity::Critical,
            VernacularError::Io(_) => ErrorSeverity::Warning,
            VernacularError::Serialization(_) => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_includes_path() {
        let err = VernacularError::malformed("locales/fr/LC_MESSAGES/test.mo", "bad magic");
        let text = err.to_string();
        assert!(text.contains("locales/fr/LC_MESSAGES/test.mo"));
        assert!(text.contains("bad magic"));
    }

    #[test]
    fn test_severity_and_recoverability() {
        let io = VernacularError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io.is_recoverable());
        assert_eq!(io.severity(), ErrorSeverity::Warning);

        let guard = VernacularError::ImmutableMapping { key: "name".to_string() };
        assert!(!guard.is_recoverable());
        assert_eq!(guard.severity().to_string(), "ERROR");
    }
}
