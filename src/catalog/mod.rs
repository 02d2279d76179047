//! Compiled catalogs and the translation store
//!
//! This module holds everything the translator consumes: the store and
//! catalog lookup traits, the in-memory implementations, plural rules,
//! the gettext `.po`/`.mo` codecs and the loader that assembles a store
//! from translation roots on disk.

pub mod loader;
pub mod message_catalog;
pub mod mo;
pub mod plural;
pub mod po;
pub mod store;

pub use loader::{CatalogLoader, TranslationSource};
pub use message_catalog::MessageCatalog;
pub use plural::{PluralExpr, PluralRule};
pub use store::{Catalog, CatalogStats, CatalogStore, StoreStats, TranslationStore};
