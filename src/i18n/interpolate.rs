//! `${name}` placeholder substitution

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::message::Mapping;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Substitute `${identifier}` placeholders found in `mapping`.
///
/// Placeholders without a value stay verbatim. Substituted values are not
/// scanned again.
pub fn render<'t>(template: &'t str, mapping: &Mapping) -> Cow<'t, str> {
    if mapping.is_empty() {
        return Cow::Borrowed(template);
    }

    PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        match mapping.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        }
    })
}
