//! Vernacular
//!
//! Runtime translation lookup over gettext catalogs. Messages are
//! [`TranslatableString`] values carrying their untranslated text, an
//! optional domain and a placeholder mapping. A [`Translator`] resolves them
//! for a target locale, falling back from `language_REGION` to `language`
//! and finally to the untranslated text.

pub mod catalog;
pub mod config;
pub mod i18n;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{VernacularError, Result};

// Re-export main components for easy access
pub use catalog::{CatalogLoader, CatalogStore, MessageCatalog, TranslationStore};
pub use i18n::{Mapping, TranslatableString, Translator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
