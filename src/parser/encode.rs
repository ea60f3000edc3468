//! Chunk writer, the inverse of the decoders.
//!
//! Used to build synthetic captures for tests and fixtures.

use super::frame::SampleLayout;
use crate::utils::config::{PROFILE_MAGIC, STRINGS_MAGIC};
use crate::utils::error::EncodeError;

/// A sample record as it appears on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawSample {
    pub name_id: u32,
    pub scope_id: u32,
    /// Dropped when encoding Revision A
    pub arg: u32,
    pub start_ticks: u32,
    pub elapsed_ticks: u32,
    pub thread_id: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawScope {
    pub name_id: u32,
    pub elapsed_ticks: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawCounter {
    pub name_id: u32,
    pub value: u32,
}

fn count(len: usize) -> Result<[u8; 4], EncodeError> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| EncodeError::TooManyEntries(len))
}

/// Encode a `STRS` chunk
///
/// Entries may be any byte string; they are written as given.
///
/// # Errors
/// * `EncodeError::TooManyEntries` - more than `u32::MAX` entries
/// * `EncodeError::StringTooLong` - an entry longer than `u16::MAX` bytes
pub fn encode_string_table<S: AsRef<[u8]>>(entries: &[(u32, S)]) -> Result<Vec<u8>, EncodeError> {
    let mut out = STRINGS_MAGIC.to_vec();
    out.extend_from_slice(&count(entries.len())?);

    for (id, value) in entries {
        let bytes = value.as_ref();
        let len = u16::try_from(bytes.len()).map_err(|_| EncodeError::StringTooLong {
            id: *id,
            len: bytes.len(),
        })?;
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(bytes);
    }

    Ok(out)
}

/// Encode a `PROF` chunk with the given sample layout
///
/// # Errors
/// * `EncodeError::TooManyEntries` - a section with more than `u32::MAX` records
pub fn encode_frame(
    layout: SampleLayout,
    samples: &[RawSample],
    scopes: &[RawScope],
    counters: &[RawCounter],
) -> Result<Vec<u8>, EncodeError> {
    let mut out = PROFILE_MAGIC.to_vec();

    out.extend_from_slice(&count(samples.len())?);
    for sample in samples {
        out.extend_from_slice(&sample.name_id.to_le_bytes());
        out.extend_from_slice(&sample.scope_id.to_le_bytes());
        if layout == SampleLayout::RevisionB {
            out.extend_from_slice(&sample.arg.to_le_bytes());
        }
        out.extend_from_slice(&sample.start_ticks.to_le_bytes());
        out.extend_from_slice(&sample.elapsed_ticks.to_le_bytes());
        out.extend_from_slice(&sample.thread_id.to_le_bytes());
        out.extend_from_slice(&[0, 0]);
    }

    out.extend_from_slice(&count(scopes.len())?);
    for scope in scopes {
        out.extend_from_slice(&scope.name_id.to_le_bytes());
        out.extend_from_slice(&scope.elapsed_ticks.to_le_bytes());
        out.extend_from_slice(&scope.count.to_le_bytes());
    }

    out.extend_from_slice(&count(counters.len())?);
    for counter in counters {
        out.extend_from_slice(&counter.name_id.to_le_bytes());
        out.extend_from_slice(&counter.value.to_le_bytes());
    }

    Ok(out)
}
