//! Compiled message catalog for one domain and locale

use std::collections::{BTreeMap, HashMap};

use super::plural::PluralRule;
use super::store::Catalog;
use crate::utils::errors::Result;

/// Separator gettext places between a context and its msgid
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// Runtime message catalog for lookups
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    /// Map from msgid to msgstr
    messages: HashMap<String, String>,
    /// Map from msgid to msgid_plural to `[msgstr[0], msgstr[1], ...]`
    plurals: HashMap<String, HashMap<String, Vec<String>>>,
    /// Rule selecting a plural form index
    plural_rule: PluralRule,
    /// Header fields carried by the empty msgid
    metadata: BTreeMap<String, String>,
}

impl MessageCatalog {
    /// Create an empty catalog using the default plural rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty catalog with the given plural rule
    pub fn with_plural_rule(plural_rule: PluralRule) -> Self {
        Self {
            plural_rule,
            ..Self::default()
        }
    }

    /// Add a singular translation
    pub fn add_message(&mut self, msgid: impl Into<String>, msgstr: impl Into<String>) {
        self.messages.insert(msgid.into(), msgstr.into());
    }

    /// Add a plural translation, one entry per form index
    pub fn add_plural_message(
        &mut self,
        msgid: impl Into<String>,
        msgid_plural: impl Into<String>,
        forms: Vec<String>,
    ) {
        self.plurals
            .entry(msgid.into())
            .or_default()
            .insert(msgid_plural.into(), forms);
    }

    /// Parse a gettext header block and apply its `Plural-Forms`.
    ///
    /// Headers are `Name: value` lines; lines without a colon are ignored.
    pub fn set_header(&mut self, header: &str) -> Result<()> {
        for line in header.lines() {
            if let Some((name, value)) = line.split_once(':') {
                self.metadata
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
        if let Some(plural_forms) = self.metadata.get("Plural-Forms") {
            self.plural_rule = PluralRule::from_header(plural_forms)?;
        }
        Ok(())
    }

    pub fn plural_rule(&self) -> &PluralRule {
        &self.plural_rule
    }

    /// Header value by field name, e.g. `Language`
    pub fn metadata(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(String::as_str)
    }

    /// Header as gettext stores it under the empty msgid
    pub fn header(&self) -> String {
        let mut header = String::new();
        for (name, value) in &self.metadata {
            header.push_str(name);
            header.push_str(": ");
            header.push_str(value);
            header.push('\n');
        }
        header
    }

    pub fn gettext(&self, msgid: &str) -> Option<&str> {
        self.messages.get(msgid).map(String::as_str)
    }

    pub fn ngettext(&self, msgid: &str, msgid_plural: &str, count: u64) -> Option<&str> {
        let forms = self.plurals.get(msgid)?.get(msgid_plural)?;
        forms
            .get(self.plural_rule.index(count))
            .map(String::as_str)
    }

    /// Look up a message with context
    pub fn pgettext(&self, msgctxt: &str, msgid: &str) -> Option<&str> {
        let key = format!("{}{}{}", msgctxt, CONTEXT_SEPARATOR, msgid);
        self.messages.get(&key).map(String::as_str)
    }

    /// Number of singular plus plural entries
    pub fn len(&self) -> usize {
        self.messages.len() + self.plurals.values().map(HashMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Singular entries
    pub fn messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Plural entries as `(msgid, msgid_plural, forms)`
    pub fn plural_messages(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.plurals.iter().flat_map(|(msgid, by_plural)| {
            by_plural
                .iter()
                .map(move |(msgid_plural, forms)| (msgid.as_str(), msgid_plural.as_str(), forms.as_slice()))
        })
    }
}

impl Catalog for MessageCatalog {
    fn get(&self, key: &str) -> Result<Option<&str>> {
        Ok(self.gettext(key))
    }

    fn get_plural(&self, singular: &str, plural: &str, count: u64) -> Result<Option<&str>> {
        Ok(self.ngettext(singular, plural, count))
    }
}
