//! Interned string table decoding.
//!
//! Layout of a `STRS` chunk:
//!
//! ```text
//! "STRS" | count: u32 | count x (id: u32, len: u16, bytes[len])
//! ```
//!
//! Entries are packed back to back, so each one takes exactly `6 + len` bytes.

use super::bytes::ByteReader;
use crate::utils::config::STRINGS_MAGIC;
use crate::utils::error::DecodeError;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt::Write;

/// Id -> string mapping shared by every frame of a capture session
///
/// Entries keep the exact bytes from the wire. Bytes that are not valid UTF-8
/// are shown as `\xNN` escapes in the text returned by [`StringTable::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: HashMap<u32, Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    bytes: Box<[u8]>,
    text: String,
}

impl Entry {
    fn new(bytes: Vec<u8>) -> Self {
        Self {
            text: display_text(&bytes),
            bytes: bytes.into_boxed_slice(),
        }
    }
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous string with the same id
    ///
    /// Returns `true` if an entry was replaced.
    pub fn insert(&mut self, id: u32, value: impl Into<Vec<u8>>) -> bool {
        self.entries.insert(id, Entry::new(value.into())).is_some()
    }

    /// Display text for an id
    pub fn get(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(|e| e.text.as_str())
    }

    /// The bytes exactly as they were on the wire
    pub fn get_bytes(&self, id: u32) -> Option<&[u8]> {
        self.entries.get(&id).map(|e| &*e.bytes)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(id, e)| (*id, e.text.as_str()))
    }
}

impl FromIterator<(u32, String)> for StringTable {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (id, value) in iter {
            table.insert(id, value);
        }
        table
    }
}

/// Render bytes as text, escaping every byte that is not part of valid UTF-8
///
/// Valid input comes back unchanged. Distinct byte strings give distinct text
/// unless the valid parts themselves contain a literal `\x` sequence.
pub fn display_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                out.push_str(&String::from_utf8_lossy(valid));
                let bad = e.error_len().unwrap_or(after.len());
                for byte in &after[..bad] {
                    let _ = write!(out, "\\x{:02x}", byte);
                }
                rest = &after[bad..];
            }
        }
    }
}

/// Check the 4-byte tag at the start of a chunk
pub(crate) fn expect_magic(chunk: &[u8], expected: &[u8; 4]) -> Result<(), DecodeError> {
    match chunk.get(..4) {
        Some(tag) if tag == expected => Ok(()),
        other => Err(DecodeError::BadMagic {
            expected: String::from_utf8_lossy(expected).into_owned(),
            found: String::from_utf8_lossy(other.unwrap_or(chunk)).into_owned(),
        }),
    }
}

/// Decode a `STRS` chunk
///
/// **Public** - called once per capture session
///
/// # Errors
/// * `DecodeError::BadMagic` - chunk does not start with "STRS"
/// * `DecodeError::OutOfBounds` / `Truncated` - an entry runs past the end
pub fn decode_string_table(chunk: &[u8]) -> Result<StringTable, DecodeError> {
    expect_magic(chunk, STRINGS_MAGIC)?;

    let mut reader = ByteReader::at(chunk, 4);
    let count = reader.read_u32()?;
    let mut table = StringTable::new();

    for _ in 0..count {
        let entry_offset = reader.position();
        let id = reader.read_u32().map_err(|_| truncated(entry_offset, chunk.len()))?;
        let len = reader.read_u16().map_err(|_| truncated(entry_offset, chunk.len()))?;
        let bytes = reader.read_bytes(usize::from(len))?;

        if std::str::from_utf8(bytes).is_err() {
            warn!("String {} is not valid UTF-8, keeping raw bytes", id);
        }

        if table.insert(id, bytes) {
            debug!("Duplicate string id {}, keeping the later entry", id);
        }
    }

    debug!("Decoded string table with {} entries", table.len());

    Ok(table)
}

fn truncated(offset: usize, len: usize) -> DecodeError {
    DecodeError::Truncated {
        offset,
        needed: crate::utils::config::STRING_ENTRY_HEADER_SIZE,
        len,
    }
}
