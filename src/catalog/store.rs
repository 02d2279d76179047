//! Translation store: domain → language → region → catalog
//!
//! The translator only sees the [`TranslationStore`] and [`Catalog`]
//! traits. [`CatalogStore`] is the in-memory implementation the loader
//! builds; once handed to a translator it is shared read-only.

use std::collections::HashMap;

use serde::Serialize;

use super::message_catalog::MessageCatalog;
use crate::i18n::locale::LocaleKey;
use crate::utils::errors::Result;

/// Lookup surface of one compiled catalog.
///
/// Errors are reserved for catalogs that cannot be read; a missing key is
/// `Ok(None)`.
pub trait Catalog: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<&str>>;

    fn get_plural(&self, singular: &str, plural: &str, count: u64) -> Result<Option<&str>>;
}

/// Lookup surface of a multi-domain, multi-locale store
pub trait TranslationStore: Send + Sync {
    type Catalog: Catalog;

    fn get(
        &self,
        domain: &str,
        language: &str,
        region: Option<&str>,
    ) -> Result<Option<&Self::Catalog>>;
}

/// Catalogs registered for one language of one domain
#[derive(Debug, Clone)]
pub struct LanguageCatalogs<C = MessageCatalog> {
    language: Option<C>,
    regions: HashMap<String, C>,
}

impl<C> LanguageCatalogs<C> {
    pub fn get(&self, region: Option<&str>) -> Option<&C> {
        match region {
            Some(region) => self.regions.get(region),
            None => self.language.as_ref(),
        }
    }

    fn insert(&mut self, region: Option<&str>, catalog: C) -> Option<C> {
        match region {
            Some(region) => self.regions.insert(region.to_string(), catalog),
            None => self.language.replace(catalog),
        }
    }

    /// Registered regions, `None` standing for the language-level catalog
    pub fn regions(&self) -> impl Iterator<Item = Option<&str>> {
        self.language
            .iter()
            .map(|_| None)
            .chain(self.regions.keys().map(|r| Some(r.as_str())))
    }

    fn catalogs(&self) -> impl Iterator<Item = (Option<&str>, &C)> {
        self.language
            .iter()
            .map(|c| (None, c))
            .chain(self.regions.iter().map(|(r, c)| (Some(r.as_str()), c)))
    }
}

/// In-memory translation store
#[derive(Debug, Clone)]
pub struct CatalogStore<C = MessageCatalog> {
    domains: HashMap<String, HashMap<String, LanguageCatalogs<C>>>,
}

impl<C> Default for CatalogStore<C> {
    fn default() -> Self {
        Self {
            domains: HashMap::new(),
        }
    }
}

impl<C> CatalogStore<C> {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog, returning the one it replaces
    pub fn insert(&mut self, domain: &str, locale: LocaleKey<'_>, catalog: C) -> Option<C> {
        self.domains
            .entry(domain.to_string())
            .or_default()
            .entry(locale.language.to_string())
            .or_insert_with(|| LanguageCatalogs {
                language: None,
                regions: HashMap::new(),
            })
            .insert(locale.region, catalog)
    }

    pub fn catalog(&self, domain: &str, language: &str, region: Option<&str>) -> Option<&C> {
        self.domains.get(domain)?.get(language)?.get(region)
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Registered domains, sorted
    pub fn domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = self.domains.keys().map(String::as_str).collect();
        domains.sort_unstable();
        domains
    }

    /// Registered languages of a domain, sorted
    pub fn languages(&self, domain: &str) -> Vec<&str> {
        let mut languages: Vec<&str> = self
            .domains
            .get(domain)
            .map(|l| l.keys().map(String::as_str).collect())
            .unwrap_or_default();
        languages.sort_unstable();
        languages
    }

    /// Registered regions of a domain's language; `None` first when the
    /// language-level catalog exists
    pub fn regions(&self, domain: &str, language: &str) -> Vec<Option<&str>> {
        let mut regions: Vec<Option<&str>> = self
            .domains
            .get(domain)
            .and_then(|l| l.get(language))
            .map(|c| c.regions().collect())
            .unwrap_or_default();
        regions.sort_unstable();
        regions
    }

    fn iter(&self) -> impl Iterator<Item = (&str, LocaleKey<'_>, &C)> {
        self.domains.iter().flat_map(|(domain, languages)| {
            languages.iter().flat_map(move |(language, catalogs)| {
                catalogs.catalogs().map(move |(region, catalog)| {
                    (
                        domain.as_str(),
                        LocaleKey {
                            language: language.as_str(),
                            region,
                        },
                        catalog,
                    )
                })
            })
        })
    }
}

impl CatalogStore<MessageCatalog> {
    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats {
            domains: Vec::new(),
            total_catalogs: 0,
            total_messages: 0,
        };

        for (domain, locale, catalog) in self.iter() {
            let messages = catalog.len();
            stats.total_catalogs += 1;
            stats.total_messages += messages;
            stats.domains.push(CatalogStats {
                domain: domain.to_string(),
                locale: locale.to_string(),
                messages,
            });
        }
        stats
            .domains
            .sort_by(|a, b| (&a.domain, &a.locale).cmp(&(&b.domain, &b.locale)));

        stats
    }
}

impl<C: Catalog> TranslationStore for CatalogStore<C> {
    type Catalog = C;

    fn get(&self, domain: &str, language: &str, region: Option<&str>) -> Result<Option<&C>> {
        Ok(self.catalog(domain, language, region))
    }
}

/// Store statistics
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub domains: Vec<CatalogStats>,
    pub total_catalogs: usize,
    pub total_messages: usize,
}

/// Per-catalog statistics
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub domain: String,
    pub locale: String,
    pub messages: usize,
}
