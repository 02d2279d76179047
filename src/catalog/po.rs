//! GNU gettext `.po` source files
//!
//! Only translated entries reach the catalog: fuzzy, obsolete (`#~`) and
//! untranslated entries are dropped, as `msgfmt` would drop them. The
//! header entry (empty msgid) is always applied.

use std::path::Path;

use super::message_catalog::{MessageCatalog, CONTEXT_SEPARATOR};
use crate::utils::errors::{VernacularError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    IdPlural,
    Str(usize),
}

#[derive(Debug, Default)]
struct Entry {
    context: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: Vec<(usize, String)>,
    fuzzy: bool,
    line: usize,
}

impl Entry {
    fn is_started(&self) -> bool {
        self.context.is_some() || self.msgid.is_some()
    }

    fn field_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Context => self.context.as_mut(),
            Field::Id => self.msgid.as_mut(),
            Field::IdPlural => self.msgid_plural.as_mut(),
            Field::Str(index) => self
                .msgstr
                .iter_mut()
                .find(|(i, _)| *i == index)
                .map(|(_, s)| s),
        }
    }
}

struct PoParser<'p> {
    path: &'p Path,
    catalog: MessageCatalog,
    entry: Entry,
    field: Option<Field>,
}

impl<'p> PoParser<'p> {
    fn error(&self, line: usize, reason: impl Into<String>) -> VernacularError {
        VernacularError::PoSyntax {
            path: self.path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    fn flush(&mut self) -> Result<()> {
        let entry = std::mem::take(&mut self.entry);
        self.field = None;

        let Some(msgid) = entry.msgid else {
            if entry.context.is_some() {
                return Err(self.error(entry.line, "msgctxt without msgid"));
            }
            return Ok(());
        };

        let mut msgstr = entry.msgstr;
        msgstr.sort_by_key(|(index, _)| *index);
        if msgstr.is_empty() {
            return Err(self.error(entry.line, format!("entry '{}' has no msgstr", msgid)));
        }
        if msgstr.iter().enumerate().any(|(expected, (index, _))| expected != *index) {
            return Err(self.error(entry.line, format!("entry '{}' has gaps in msgstr[N]", msgid)));
        }
        let mut forms: Vec<String> = msgstr.into_iter().map(|(_, s)| s).collect();

        if msgid.is_empty() && entry.context.is_none() {
            return self.catalog.set_header(&forms[0]);
        }
        if entry.fuzzy {
            return Ok(());
        }

        let key = match entry.context {
            Some(context) => format!("{}{}{}", context, CONTEXT_SEPARATOR, msgid),
            None => msgid,
        };

        match entry.msgid_plural {
            Some(msgid_plural) => {
                if forms.iter().all(|f| !f.is_empty()) {
                    self.catalog.add_plural_message(key, msgid_plural, forms);
                }
            }
            None => {
                if forms.len() > 1 {
                    return Err(self.error(entry.line, format!("entry '{}' has plural msgstr without msgid_plural", key)));
                }
                let translation = forms.swap_remove(0);
                if !translation.is_empty() {
                    self.catalog.add_message(key, translation);
                }
            }
        }
        Ok(())
    }

    fn comment(&mut self, line: &str) -> Result<()> {
        if self.entry.msgid.is_some() {
            self.flush()?;
        }
        if let Some(flags) = line.strip_prefix("#,") {
            if flags.split(',').any(|flag| flag.trim() == "fuzzy") {
                self.entry.fuzzy = true;
            }
        }
        Ok(())
    }

    fn keyword(&mut self, number: usize, keyword: &str, value: String) -> Result<()> {
        let field = match keyword {
            "msgctxt" => Field::Context,
            "msgid" => Field::Id,
            "msgid_plural" => Field::IdPlural,
            "msgstr" => Field::Str(0),
            other => match other
                .strip_prefix("msgstr[")
                .and_then(|rest| rest.strip_suffix(']'))
                .and_then(|index| index.parse::<usize>().ok())
            {
                Some(index) => Field::Str(index),
                None => return Err(self.error(number, format!("unknown keyword '{}'", other))),
            },
        };

        let starts_entry = match field {
            Field::Context => self.entry.is_started(),
            Field::Id => self.entry.msgid.is_some(),
            _ => false,
        };
        if starts_entry {
            self.flush()?;
        }
        if !self.entry.is_started() {
            self.entry.line = number;
        }

        match field {
            Field::Context => self.entry.context = Some(value),
            Field::Id if self.entry.msgid.is_none() => self.entry.msgid = Some(value),
            Field::IdPlural if self.entry.msgid.is_some() && self.entry.msgid_plural.is_none() => {
                self.entry.msgid_plural = Some(value)
            }
            Field::Str(index)
                if self.entry.msgid.is_some()
                    && self.entry.msgstr.iter().all(|(i, _)| *i != index) =>
            {
                self.entry.msgstr.push((index, value))
            }
            _ => return Err(self.error(number, format!("unexpected '{}'", keyword))),
        }
        self.field = Some(field);
        Ok(())
    }

    fn continuation(&mut self, number: usize, value: String) -> Result<()> {
        let field = self
            .field
            .ok_or_else(|| self.error(number, "string continuation without a keyword"))?;
        if let Some(target) = self.entry.field_mut(field) {
            target.push_str(&value);
            return Ok(());
        }
        Err(self.error(number, "string continuation without a keyword"))
    }
}

/// Parse `.po` source text. `path` is only used in error messages.
pub fn parse(source: &str, path: &Path) -> Result<MessageCatalog> {
    let mut parser = PoParser {
        path,
        catalog: MessageCatalog::new(),
        entry: Entry::default(),
        field: None,
    };

    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();

        if line.is_empty() {
            parser.flush()?;
        } else if line.starts_with("#~") {
            if parser.entry.is_started() {
                parser.flush()?;
            }
        } else if line.starts_with('#') {
            parser.comment(line)?;
        } else if line.starts_with('"') {
            let value = unquote(line).map_err(|reason| parser.error(number, reason))?;
            parser.continuation(number, value)?;
        } else {
            let (keyword, rest) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| parser.error(number, format!("expected a quoted string after '{}'", line)))?;
            let value = unquote(rest.trim()).map_err(|reason| parser.error(number, reason))?;
            parser.keyword(number, keyword, value)?;
        }
    }
    parser.flush()?;

    Ok(parser.catalog)
}

/// Read and parse a `.po` file
pub async fn read(path: &Path) -> Result<MessageCatalog> {
    let source = tokio::fs::read_to_string(path).await?;
    parse(&source, path)
}

fn unquote(quoted: &str) -> std::result::Result<String, String> {
    let inner = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| format!("malformed string {}", quoted))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = match chars.next() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some('a') => '\u{7}',
                    Some('b') => '\u{8}',
                    Some('f') => '\u{c}',
                    Some('v') => '\u{b}',
                    Some(c @ ('"' | '\\' | '\'' | '?')) => c,
                    Some(other) => return Err(format!("unknown escape '\\{}'", other)),
                    None => return Err("dangling backslash".to_string()),
                };
                out.push(escaped);
            }
            '"' => return Err(format!("unescaped quote in {}", quoted)),
            c => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const FRENCH: &str = r#"
# French translations.
msgid ""
msgstr ""
"Language: fr\n"
"Plural-Forms: nplurals=2; plural=(n > 1);\n"

#: src/car.rs:12
msgid "handbrake"
msgstr "frein à main"

msgid "greetings"
msgstr ""
"Bonjour ${name}. "
"Bienvenue à ${place}."

msgid "Unable to find user: ${users}"
msgid_plural "Unable to find users: ${users}"
msgstr[0] "Impossible de trouver l'utilisateur: ${users}"
msgstr[1] "Impossible de trouver les utilisateurs: ${users}"

#, fuzzy
msgid "sir"
msgstr "monsieur ?"

msgid "untranslated"
msgstr ""

msgctxt "plumbing"
msgid "tap"
msgstr "robinet"

msgid "quote"
msgstr "il a dit \"non\"\tpuis\n"

#~ msgid "old"
#~ msgstr "vieux"
"#;

    fn french() -> MessageCatalog {
        parse(FRENCH, Path::new("fr/LC_MESSAGES/test.po")).unwrap()
    }

    #[test]
    fn test_header_applied() {
        let catalog = french();
        assert_eq!(catalog.metadata("Language"), Some("fr"));
        assert_eq!(catalog.plural_rule().index(1), 0);
        assert_eq!(catalog.plural_rule().index(2), 1);
    }

    #[test]
    fn test_entries() {
        let catalog = french();
        assert_eq!(catalog.gettext("handbrake"), Some("frein à main"));
        assert_eq!(catalog.gettext("greetings"), Some("Bonjour ${name}. Bienvenue à ${place}."));
        assert_eq!(catalog.pgettext("plumbing", "tap"), Some("robinet"));
        assert_eq!(catalog.gettext("tap"), None);
        assert_eq!(catalog.gettext("quote"), Some("il a dit \"non\"\tpuis\n"));
        assert_eq!(
            catalog.ngettext("Unable to find user: ${users}", "Unable to find users: ${users}", 1),
            Some("Impossible de trouver l'utilisateur: ${users}")
        );
    }

    #[test]
    fn test_skipped_entries() {
        let catalog = french();
        assert_eq!(catalog.gettext("sir"), None);
        assert_eq!(catalog.gettext("untranslated"), None);
        assert_eq!(catalog.gettext("old"), None);
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_entries_without_blank_separators() {
        let source = "msgctxt \"k\"\nmsgid \"a\"\nmsgstr \"A\"\nmsgid \"b\"\nmsgstr \"B\"\n#, fuzzy\nmsgid \"c\"\nmsgstr \"C\"\n";
        let catalog = parse(source, Path::new("x.po")).unwrap();
        assert_eq!(catalog.pgettext("k", "a"), Some("A"));
        assert_eq!(catalog.gettext("b"), Some("B"));
        assert_eq!(catalog.gettext("c"), None);
    }

    #[test]
    fn test_partially_translated_plural_skipped() {
        let source = "msgid \"x\"\nmsgid_plural \"xs\"\nmsgstr[0] \"un x\"\nmsgstr[1] \"\"\n";
        let catalog = parse(source, Path::new("x.po")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_syntax_errors() {
        assert_matches!(
            parse("msgid \"a\"\nmsgstr \"A\nmsgid", Path::new("x.po")),
            Err(VernacularError::PoSyntax { line: 2, .. })
        );
        assert_matches!(
            parse("\"orphan\"\n", Path::new("x.po")),
            Err(VernacularError::PoSyntax { line: 1, .. })
        );
        assert_matches!(
            parse("msgid \"a\"\nmsgtxt \"A\"\n", Path::new("x.po")),
            Err(VernacularError::PoSyntax { line: 2, .. })
        );
        assert_matches!(
            parse("msgid \"a\"\n\n", Path::new("x.po")),
            Err(VernacularError::PoSyntax { line: 1, .. })
        );
        assert_matches!(
            parse("msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[1] \"B\"\n", Path::new("x.po")),
            Err(VernacularError::PoSyntax { .. })
        );
        assert_matches!(
            parse("msgid \"a\\q\"\nmsgstr \"\"\n", Path::new("x.po")),
            Err(VernacularError::PoSyntax { line: 1, .. })
        );
    }

    #[test]
    fn test_bad_plural_header_propagates() {
        let source = "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=2; plural=n >;\\n\"\n";
        assert_matches!(
            parse(source, Path::new("x.po")),
            Err(VernacularError::InvalidPluralForms(_))
        );
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let source = "\u{feff}msgid \"tap\"\nmsgstr \"robinet\"\n";
        let catalog = parse(source, Path::new("bom.po")).unwrap();
        assert_eq!(catalog.gettext("tap"), Some("robinet"));
    }
}
