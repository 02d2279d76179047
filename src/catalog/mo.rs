//! GNU gettext `.mo` files
//!
//! Layout: a 28-byte header (magic, revision, string count, offsets of the
//! original and translation tables, hash table size and offset), two tables
//! of `(length, offset)` pairs, then the NUL-terminated strings. Plural
//! entries join their ids and their forms with NUL. The empty msgid carries
//! the catalog header.

use std::path::Path;

use super::message_catalog::MessageCatalog;
use crate::utils::errors::{VernacularError, Result};

const MAGIC: u32 = 0x9504_12de;
const MAGIC_SWAPPED: u32 = 0xde12_0495;
const HEADER_SIZE: usize = 28;

/// Parse a `.mo` image. `path` is only used in error messages.
pub fn parse(bytes: &[u8], path: &Path) -> Result<MessageCatalog> {
    let reader = Reader::new(bytes, path)?;

    let revision = reader.u32_at(4)?;
    if revision >> 16 != 0 {
        return Err(VernacularError::malformed(
            path,
            format!("unsupported major revision {}", revision >> 16),
        ));
    }

    let count = reader.u32_at(8)? as usize;
    let originals = reader.u32_at(12)? as usize;
    let translations = reader.u32_at(16)? as usize;

    let mut catalog = MessageCatalog::new();
    let mut header = None;

    for index in 0..count {
        let msgid = reader.string_at(originals, index)?;
        let msgstr = reader.string_at(translations, index)?;

        if msgid.is_empty() {
            header = Some(msgstr);
            continue;
        }

        match msgid.split_once('\0') {
            Some((singular, plural)) => {
                let forms = msgstr.split('\0').map(str::to_string).collect();
                catalog.add_plural_message(singular, plural, forms);
            }
            None => catalog.add_message(msgid, msgstr),
        }
    }

    if let Some(header) = header {
        catalog.set_header(header)?;
    }

    Ok(catalog)
}

/// Read and parse a `.mo` file
pub async fn read(path: &Path) -> Result<MessageCatalog> {
    let bytes = tokio::fs::read(path).await?;
    parse(&bytes, path)
}

/// Serialize a catalog to a little-endian `.mo` image without a hash table
pub fn to_bytes(catalog: &MessageCatalog) -> Vec<u8> {
    let mut entries: Vec<(String, String)> = Vec::with_capacity(catalog.len() + 1);
    entries.push((String::new(), catalog.header()));
    entries.extend(
        catalog
            .messages()
            .map(|(msgid, msgstr)| (msgid.to_string(), msgstr.to_string())),
    );
    entries.extend(catalog.plural_messages().map(|(msgid, msgid_plural, forms)| {
        (format!("{}\0{}", msgid, msgid_plural), forms.join("\0"))
    }));
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let count = entries.len();
    let originals_offset = HEADER_SIZE;
    let translations_offset = originals_offset + count * 8;
    let mut data_offset = translations_offset + count * 8;

    let mut out = Vec::new();
    for value in [
        MAGIC,
        0,
        count as u32,
        originals_offset as u32,
        translations_offset as u32,
        0,
        data_offset as u32,
    ] {
        out.extend_from_slice(&value.to_le_bytes());
    }

    write_table(&mut out, entries.iter().map(|(msgid, _)| msgid), &mut data_offset);
    write_table(&mut out, entries.iter().map(|(_, msgstr)| msgstr), &mut data_offset);

    for (msgid, _) in &entries {
        out.extend_from_slice(msgid.as_bytes());
        out.push(0);
    }
    for (_, msgstr) in &entries {
        out.extend_from_slice(msgstr.as_bytes());
        out.push(0);
    }

    out
}

fn write_table<'e>(
    out: &mut Vec<u8>,
    strings: impl Iterator<Item = &'e String>,
    data_offset: &mut usize,
) {
    for s in strings {
        out.extend_from_slice(&(s.len() as u32).to_le_bytes());
        out.extend_from_slice(&(*data_offset as u32).to_le_bytes());
        *data_offset += s.len() + 1;
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    path: &'a Path,
    big_endian: bool,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], path: &'a Path) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(VernacularError::malformed(path, "file shorter than header"));
        }
        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let big_endian = match magic {
            MAGIC => false,
            MAGIC_SWAPPED => true,
            other => {
                return Err(VernacularError::malformed(
                    path,
                    format!("bad magic number {:#010x}", other),
                ))
            }
        };
        Ok(Self {
            bytes,
            path,
            big_endian,
        })
    }

    fn u32_at(&self, offset: usize) -> Result<u32> {
        let raw: [u8; 4] = offset
            .checked_add(4)
            .and_then(|end| self.bytes.get(offset..end))
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| {
                VernacularError::malformed(self.path, format!("offset {} out of bounds", offset))
            })?;
        Ok(if self.big_endian {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        })
    }

    fn string_at(&self, table: usize, index: usize) -> Result<&'a str> {
        let entry = table + index * 8;
        let length = self.u32_at(entry)? as usize;
        let offset = self.u32_at(entry + 4)? as usize;

        let raw = offset
            .checked_add(length)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or_else(|| {
                VernacularError::malformed(
                    self.path,
                    format!("string {} at {}+{} out of bounds", index, offset, length),
                )
            })?;

        std::str::from_utf8(raw).map_err(|e| {
            VernacularError::malformed(self.path, format!("string {} is not UTF-8: {}", index, e))
        })
    }
}
