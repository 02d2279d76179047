//! Locale keys and fallback chains
//!
//! A locale code such as `fr_CA`, `fr-CA` or `fr` is split on its first
//! `_` or `-` into a language and an optional region. Case is preserved:
//! store keys are matched exactly as they were registered.

use std::fmt;

/// A `(language, region)` pair borrowed from a locale code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocaleKey<'a> {
    pub language: &'a str,
    pub region: Option<&'a str>,
}

impl<'a> LocaleKey<'a> {
    /// Parse a locale code. Never fails; anything after the first
    /// separator is taken as the region verbatim.
    pub fn parse(code: &'a str) -> Self {
        match code.split_once(['_', '-']) {
            Some((language, region)) if !region.is_empty() => LocaleKey {
                language,
                region: Some(region),
            },
            Some((language, _)) => LocaleKey {
                language,
                region: None,
            },
            None => LocaleKey {
                language: code,
                region: None,
            },
        }
    }

    /// The language-only key for this locale
    pub fn language_only(&self) -> Self {
        LocaleKey {
            language: self.language,
            region: None,
        }
    }
}

impl fmt::Display for LocaleKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => f.write_str(self.language),
        }
    }
}

/// Candidate keys for a locale code, most specific first.
///
/// `fr_CA` yields `[(fr, CA), (fr, None)]`; `fr` yields `[(fr, None)]`.
/// Callers fall back to the untranslated text once the chain is exhausted.
pub fn fallback_chain(code: &str) -> Vec<LocaleKey<'_>> {
    let key = LocaleKey::parse(code);
    match key.region {
        Some(_) => vec![key, key.language_only()],
        None => vec![key],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(code: &str) -> Vec<(&str, Option<&str>)> {
        fallback_chain(code)
            .into_iter()
            .map(|k| (k.language, k.region))
            .collect()
    }

    #[test]
    fn test_region_then_language() {
        assert_eq!(pairs("fr_CA"), vec![("fr", Some("CA")), ("fr", None)]);
        assert_eq!(pairs("fr-CA"), vec![("fr", Some("CA")), ("fr", None)]);
    }

    #[test]
    fn test_language_only() {
        assert_eq!(pairs("fr"), vec![("fr", None)]);
    }

    #[test]
    fn test_unknown_region_kept_literally() {
        assert_eq!(pairs("fr_LOL"), vec![("fr", Some("LOL")), ("fr", None)]);
    }

    #[test]
    fn test_split_on_first_separator_only() {
        assert_eq!(
            pairs("sr_Latn_RS"),
            vec![("sr", Some("Latn_RS")), ("sr", None)]
        );
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(pairs("FR_ca"), vec![("FR", Some("ca")), ("FR", None)]);
    }

    #[test]
    fn test_degenerate_codes() {
        assert_eq!(pairs(""), vec![("", None)]);
        assert_eq!(pairs("fr_"), vec![("fr", None)]);
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(LocaleKey::parse("fr-CA").to_string(), "fr_CA");
        assert_eq!(LocaleKey::parse("fr").to_string(), "fr");
    }
}
