//! Translatable strings
//!
//! A [`TranslatableString`] is a message that has not been resolved yet: it
//! carries its default text, an optional domain and a frozen [`Mapping`] of
//! interpolation values. It stands in for its default text everywhere a
//! plain string is expected, and compares and hashes by that text alone.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::utils::errors::{VernacularError, Result};

/// Read-only interpolation values, fixed at construction.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping(Arc<BTreeMap<String, String>>);

impl Mapping {
    /// An empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Item assignment entry point for callers holding a mapping.
    ///
    /// Mappings are frozen, so this always fails with
    /// [`VernacularError::ImmutableMapping`]. Use
    /// [`TranslatableString::replace`] to derive a message with other values.
    pub fn try_insert(&self, key: impl Into<String>, _value: impl ToString) -> Result<()> {
        Err(VernacularError::ImmutableMapping { key: key.into() })
    }
}

impl<K, V> FromIterator<(K, V)> for Mapping
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Mapping(Arc::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        ))
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Mapping
where
    K: Into<String>,
    V: ToString,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Mapping {
    fn from(map: BTreeMap<String, String>) -> Self {
        Mapping(Arc::new(map))
    }
}

impl From<std::collections::HashMap<String, String>> for Mapping {
    fn from(map: std::collections::HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

/// A user-facing message awaiting translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatableString {
    default: Arc<str>,
    #[serde(default)]
    domain: Option<Arc<str>>,
    #[serde(default)]
    mapping: Mapping,
}

impl TranslatableString {
    /// Create a message with no domain and an empty mapping
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: shared(default),
            domain: None,
            mapping: Mapping::new(),
        }
    }

    /// Create a message with every attribute supplied
    pub fn with_parts(
        default: impl Into<String>,
        domain: Option<&str>,
        mapping: Option<Mapping>,
    ) -> Self {
        Self {
            default: shared(default),
            domain: domain.map(Arc::from),
            mapping: mapping.unwrap_or_default(),
        }
    }

    /// Builder-style domain tag
    pub fn in_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(shared(domain));
        self
    }

    /// Builder-style mapping, used at construction time only
    pub fn with_mapping(mut self, mapping: impl Into<Mapping>) -> Self {
        self.mapping = mapping.into();
        self
    }

    /// Derive a new message sharing default text and domain with this one
    pub fn replace(&self, mapping: impl Into<Mapping>) -> Self {
        Self {
            default: Arc::clone(&self.default),
            domain: self.domain.clone(),
            mapping: mapping.into(),
        }
    }

    pub fn default_text(&self) -> &str {
        &self.default
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn as_str(&self) -> &str {
        &self.default
    }
}

fn shared(text: impl Into<String>) -> Arc<str> {
    let text: String = text.into();
    Arc::from(text)
}

impl PartialEq for TranslatableString {
    fn eq(&self, other: &Self) -> bool {
        self.default == other.default
    }
}

impl Eq for TranslatableString {}

impl PartialEq<str> for TranslatableString {
    fn eq(&self, other: &str) -> bool {
        &*self.default == other
    }
}

impl PartialEq<&str> for TranslatableString {
    fn eq(&self, other: &&str) -> bool {
        &*self.default == *other
    }
}

impl PartialEq<String> for TranslatableString {
    fn eq(&self, other: &String) -> bool {
        &*self.default == other.as_str()
    }
}

impl PartialEq<TranslatableString> for str {
    fn eq(&self, other: &TranslatableString) -> bool {
        self == &*other.default
    }
}

impl PartialEq<TranslatableString> for &str {
    fn eq(&self, other: &TranslatableString) -> bool {
        *self == &*other.default
    }
}

// Must agree with `str`'s hash so `Borrow<str>` lookups work.
impl Hash for TranslatableString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.default.hash(state);
    }
}

impl Borrow<str> for TranslatableString {
    fn borrow(&self) -> &str {
        &self.default
    }
}

impl AsRef<str> for TranslatableString {
    fn as_ref(&self) -> &str {
        &self.default
    }
}

impl Deref for TranslatableString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.default
    }
}

impl fmt::Display for TranslatableString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.default)
    }
}

impl From<&str> for TranslatableString {
    fn from(default: &str) -> Self {
        Self::new(default)
    }
}

impl From<String> for TranslatableString {
    fn from(default: String) -> Self {
        Self::new(default)
    }
}

impl From<TranslatableString> for String {
    fn from(message: TranslatableString) -> Self {
        message.default.to_string()
    }
}
