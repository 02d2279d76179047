//! Internationalization module
//!
//! Translatable strings, locale parsing, placeholder interpolation and the
//! [`Translator`] that resolves messages against a translation store.

pub mod interpolate;
pub mod locale;
pub mod message;
pub mod translator;

// Re-export commonly used i18n components
pub use interpolate::render;
pub use locale::{fallback_chain, LocaleKey};
pub use message::{Mapping, TranslatableString};
pub use translator::Translator;
