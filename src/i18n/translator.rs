//! Translation resolution
//!
//! The [`Translator`] resolves messages against an injected store. For each
//! call it picks the domain (explicit argument, then the message's own
//! domain, then the configured default), walks the locale fallback chain and
//! uses the first catalog that actually holds the key. A catalog that exists
//! but lacks the key does not end the walk. When nothing matches, the
//! untranslated text is returned; missing translations are never errors.

use std::sync::Arc;

use tracing::{debug, trace};

use super::interpolate::render;
use super::locale::fallback_chain;
use super::message::{Mapping, TranslatableString};
use crate::catalog::store::{Catalog, CatalogStore, TranslationStore};
use crate::utils::errors::Result;

/// Resolves translatable strings against a shared translation store
#[derive(Debug)]
pub struct Translator<S = CatalogStore> {
    store: Arc<S>,
    default_domain: String,
}

impl<S> Clone for Translator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            default_domain: self.default_domain.clone(),
        }
    }
}

impl<S: TranslationStore> Translator<S> {
    /// Create a translator over `store`
    pub fn new(store: Arc<S>, default_domain: impl Into<String>) -> Self {
        Self {
            store,
            default_domain: default_domain.into(),
        }
    }

    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Walk the fallback chain for `target_language` and return the first
    /// text `lookup` finds
    fn resolve<'s, F>(&'s self, domain: &str, target_language: &str, mut lookup: F) -> Result<Option<&'s str>>
    where
        F: FnMut(&'s S::Catalog) -> Result<Option<&'s str>>,
    {
        for key in fallback_chain(target_language) {
            let Some(catalog) = self.store.get(domain, key.language, key.region)? else {
                trace!(domain = domain, locale = %key, "No catalog");
                continue;
            };
            match lookup(catalog)? {
                Some(text) => {
                    debug!(domain = domain, locale = %key, "Translation found");
                    return Ok(Some(text));
                }
                None => trace!(domain = domain, locale = %key, "Key missing from catalog"),
            }
        }
        Ok(None)
    }

    /// Translate a message into `target_language`.
    ///
    /// The found template is rendered with the message's mapping. Without a
    /// translation the message's default text is returned as is.
    pub fn translate(
        &self,
        message: &TranslatableString,
        target_language: &str,
        domain: Option<&str>,
    ) -> Result<String> {
        let domain = domain
            .or(message.domain())
            .unwrap_or(&self.default_domain);

        match self.resolve(domain, target_language, |catalog| catalog.get(message))? {
            Some(template) => Ok(render(template, message.mapping()).into_owned()),
            None => {
                debug!(domain = domain, target_language = target_language, message = %message,
                       "No translation, using default text");
                Ok(message.default_text().to_string())
            }
        }
    }

    /// Translate a singular/plural pair for `count`.
    ///
    /// The catalog's plural rule picks the form. Without a translation,
    /// `singular` is used when `count == 1` and `plural` otherwise. Either
    /// way the text is rendered with `mapping`.
    pub fn pluralize(
        &self,
        singular: &str,
        plural: &str,
        count: u64,
        target_language: &str,
        domain: Option<&str>,
        mapping: Option<&Mapping>,
    ) -> Result<String> {
        let domain = domain.unwrap_or(&self.default_domain);

        let template = match self.resolve(domain, target_language, |catalog| {
            catalog.get_plural(singular, plural, count)
        })? {
            Some(template) => template,
            None => {
                debug!(domain = domain, target_language = target_language, count = count,
                       "No plural translation, using source text");
                if count == 1 { singular } else { plural }
            }
        };

        Ok(match mapping {
            Some(mapping) => render(template, mapping).into_owned(),
            None => template.to_string(),
        })
    }
}
