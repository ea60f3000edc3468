//! Frame (`PROF` chunk) decoding.
//!
//! Layout after the tag:
//!
//! ```text
//! samples:  count: u32 | count x sample record (stride depends on revision)
//! scopes:   count: u32 | count x (name: u32, elapsed: u32, count: u32)
//! counters: count: u32 | count x (name: u32, value: u32)
//! ```
//!
//! The wire data carries no revision marker, so the caller picks the
//! [`SampleLayout`] that matches the producer.

use super::bytes::ByteReader;
use super::schema::{CounterValue, Frame, Sample, ScopeStats};
use super::strings::{expect_magic, StringTable};
use crate::utils::config::{
    COUNTER_RECORD_SIZE, PROFILE_MAGIC, SAMPLE_STRIDE_REVISION_A, SAMPLE_STRIDE_REVISION_B,
    SCOPE_RECORD_SIZE, TICKS_PER_SECOND,
};
use crate::utils::error::DecodeError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Sample record revision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleLayout {
    /// name, scope, start, elapsed, thread (20-byte stride)
    RevisionA,
    /// name, scope, arg, start, elapsed, thread (24-byte stride)
    #[default]
    RevisionB,
}

impl SampleLayout {
    pub fn stride(self) -> usize {
        match self {
            SampleLayout::RevisionA => SAMPLE_STRIDE_REVISION_A,
            SampleLayout::RevisionB => SAMPLE_STRIDE_REVISION_B,
        }
    }

    fn has_arg(self) -> bool {
        self == SampleLayout::RevisionB
    }
}

/// Handling of ids that are missing from the string table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownIdPolicy {
    /// Resolve to an empty string and keep going
    #[default]
    Placeholder,
    /// Fail the chunk with `UnknownStringId`
    Reject,
}

/// Options for decoding frame chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub layout: SampleLayout,
    pub unknown_ids: UnknownIdPolicy,
}

impl DecodeOptions {
    pub fn new(layout: SampleLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }
}

/// Convert wire ticks to time
pub fn ticks_to_time(ticks: u32) -> f64 {
    f64::from(ticks) / TICKS_PER_SECOND
}

struct Resolver<'a> {
    table: &'a StringTable,
    policy: UnknownIdPolicy,
}

impl<'a> Resolver<'a> {
    fn resolve(&self, id: u32) -> Result<&'a str, DecodeError> {
        match self.table.get(id) {
            Some(s) => Ok(s),
            None => match self.policy {
                UnknownIdPolicy::Placeholder => {
                    warn!("String id {} missing from string table, using empty name", id);
                    Ok("")
                }
                UnknownIdPolicy::Reject => Err(DecodeError::UnknownStringId(id)),
            },
        }
    }
}

/// Decode a `PROF` chunk
///
/// **Public** - called once per captured frame
///
/// # Arguments
/// * `chunk` - Raw chunk bytes, including the tag
/// * `table` - String table of the capture session
/// * `options` - Sample revision and unknown-id policy
///
/// # Errors
/// * `DecodeError::BadMagic` - chunk does not start with "PROF"
/// * `DecodeError::Truncated` / `OutOfBounds` - a declared section runs past the end
/// * `DecodeError::UnknownStringId` - only with `UnknownIdPolicy::Reject`
pub fn decode_frame(
    chunk: &[u8],
    table: &StringTable,
    options: &DecodeOptions,
) -> Result<Frame, DecodeError> {
    expect_magic(chunk, PROFILE_MAGIC)?;

    let resolver = Resolver {
        table,
        policy: options.unknown_ids,
    };
    let mut reader = ByteReader::at(chunk, 4);
    let mut frame = Frame::default();

    let sample_count = reader.read_u32()? as usize;
    reader.require(sample_count.saturating_mul(options.layout.stride()))?;
    frame.samples.reserve(sample_count);

    for _ in 0..sample_count {
        let sample = read_sample(&mut reader, &resolver, options.layout)?;
        frame.frame_time = frame.frame_time.max(sample.elapsed);
        frame.samples.push(sample);
    }

    let scope_count = reader.read_u32()? as usize;
    reader.require(scope_count.saturating_mul(SCOPE_RECORD_SIZE))?;
    for _ in 0..scope_count {
        let name_id = reader.read_u32()?;
        let elapsed = ticks_to_time(reader.read_u32()?);
        let count = reader.read_u32()?;
        let name = resolver.resolve(name_id)?;

        frame
            .scopes
            .insert(name.to_string(), ScopeStats { elapsed, count });
    }

    let counter_count = reader.read_u32()? as usize;
    reader.require(counter_count.saturating_mul(COUNTER_RECORD_SIZE))?;
    for _ in 0..counter_count {
        let name_id = reader.read_u32()?;
        let value = reader.read_u32()?;
        let name = resolver.resolve(name_id)?;

        frame.counters.insert(name.to_string(), CounterValue { value });
    }

    if reader.remaining() > 0 {
        debug!("Ignoring {} trailing bytes in frame chunk", reader.remaining());
    }

    Ok(frame)
}

fn read_sample(
    reader: &mut ByteReader<'_>,
    resolver: &Resolver<'_>,
    layout: SampleLayout,
) -> Result<Sample, DecodeError> {
    let name_id = reader.read_u32()?;
    let scope_id = reader.read_u32()?;
    let arg = if layout.has_arg() {
        Some(reader.read_u32()?)
    } else {
        None
    };
    let start = ticks_to_time(reader.read_u32()?);
    let elapsed = ticks_to_time(reader.read_u32()?);
    let thread_id = reader.read_u16()?;
    reader.skip(2)?;

    let scope_name = resolver.resolve(scope_id)?;
    let leaf = resolver.resolve(name_id)?;

    Ok(Sample {
        scope_name: scope_name.to_string(),
        name: format!("{}.{}", scope_name, leaf),
        start,
        elapsed,
        arg,
        thread_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::encode::{encode_frame, RawCounter, RawSample, RawScope};
    use pretty_assertions::assert_eq;

    fn table() -> StringTable {
        [
            (1, "Engine"),
            (2, "Frame"),
            (3, "Graphics"),
            (4, "Flip"),
            (5, "DrawCalls"),
        ]
        .into_iter()
        .map(|(id, s)| (id, s.to_string()))
        .collect()
    }

    fn samples() -> Vec<RawSample> {
        vec![
            RawSample {
                name_id: 2,
                scope_id: 1,
                arg: 99,
                start_ticks: 1,
                elapsed_ticks: 15936,
                thread_id: 7,
            },
            RawSample {
                name_id: 4,
                scope_id: 3,
                arg: 0,
                start_ticks: 422,
                elapsed_ticks: 15515,
                thread_id: 7,
            },
        ]
    }

    #[test]
    fn test_decode_revision_b() {
        let chunk = encode_frame(
            SampleLayout::RevisionB,
            &samples(),
            &[RawScope { name_id: 1, elapsed_ticks: 2000, count: 3 }],
            &[RawCounter { name_id: 5, value: 42 }],
        )
        .unwrap();

        let frame = decode_frame(&chunk, &table(), &DecodeOptions::default()).unwrap();

        assert_eq!(frame.samples.len(), 2);
        assert_eq!(frame.samples[0].name, "Engine.Frame");
        assert_eq!(frame.samples[0].scope_name, "Engine");
        assert_eq!(frame.samples[0].arg, Some(99));
        assert_eq!(frame.samples[0].thread_id, 7);
        assert_eq!(frame.samples[0].start, 0.001);
        assert_eq!(frame.samples[0].elapsed, 15.936);
        assert_eq!(frame.samples[1].name, "Graphics.Flip");
        assert_eq!(frame.frame_time, 15.936);
        assert_eq!(frame.scopes["Engine"], ScopeStats { elapsed: 2.0, count: 3 });
        assert_eq!(frame.counters["DrawCalls"].value, 42);
    }

    #[test]
    fn test_decode_revision_a() {
        let chunk = encode_frame(SampleLayout::RevisionA, &samples(), &[], &[]).unwrap();
        let options = DecodeOptions::new(SampleLayout::RevisionA);

        let frame = decode_frame(&chunk, &table(), &options).unwrap();

        assert_eq!(frame.samples.len(), 2);
        assert_eq!(frame.samples[0].arg, None);
        assert_eq!(frame.samples[1].start, 0.422);
        assert!(frame.scopes.is_empty());
        assert!(frame.counters.is_empty());
    }

    #[test]
    fn test_wrong_revision_is_truncated() {
        // Revision A bytes read as Revision B run out before the counter section
        let chunk = encode_frame(SampleLayout::RevisionA, &samples(), &[], &[]).unwrap();
        let result = decode_frame(&chunk, &table(), &DecodeOptions::default());

        assert!(matches!(
            result,
            Err(DecodeError::OutOfBounds { .. }) | Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_scope_and_counter_last_wins() {
        let chunk = encode_frame(
            SampleLayout::RevisionB,
            &[],
            &[
                RawScope { name_id: 1, elapsed_ticks: 1000, count: 1 },
                RawScope { name_id: 1, elapsed_ticks: 3000, count: 9 },
            ],
            &[
                RawCounter { name_id: 5, value: 1 },
                RawCounter { name_id: 5, value: 2 },
            ],
        )
        .unwrap();

        let frame = decode_frame(&chunk, &table(), &DecodeOptions::default()).unwrap();

        assert_eq!(frame.scopes.len(), 1);
        assert_eq!(frame.scopes["Engine"], ScopeStats { elapsed: 3.0, count: 9 });
        assert_eq!(frame.counters["DrawCalls"].value, 2);
        assert_eq!(frame.frame_time, 0.0);
    }

    #[test]
    fn test_unknown_id_placeholder() {
        let raw = [RawSample {
            name_id: 500,
            scope_id: 1,
            elapsed_ticks: 10,
            ..Default::default()
        }];
        let chunk = encode_frame(SampleLayout::RevisionB, &raw, &[], &[]).unwrap();

        let frame = decode_frame(&chunk, &table(), &DecodeOptions::default()).unwrap();
        assert_eq!(frame.samples[0].name, "Engine.");
    }

    #[test]
    fn test_unknown_id_reject() {
        let raw = [RawSample {
            name_id: 500,
            scope_id: 1,
            ..Default::default()
        }];
        let chunk = encode_frame(SampleLayout::RevisionB, &raw, &[], &[]).unwrap();
        let options = DecodeOptions {
            layout: SampleLayout::RevisionB,
            unknown_ids: UnknownIdPolicy::Reject,
        };

        assert_eq!(
            decode_frame(&chunk, &table(), &options),
            Err(DecodeError::UnknownStringId(500))
        );
    }

    #[test]
    fn test_bad_magic() {
        let mut chunk = encode_frame(SampleLayout::RevisionB, &[], &[], &[]).unwrap();
        chunk[..4].copy_from_slice(b"XXXX");

        assert!(matches!(
            decode_frame(&chunk, &table(), &DecodeOptions::default()),
            Err(DecodeError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_huge_sample_count_is_truncated() {
        let mut chunk = b"PROF".to_vec();
        chunk.extend_from_slice(&u32::MAX.to_le_bytes());

        assert!(matches!(
            decode_frame(&chunk, &table(), &DecodeOptions::default()),
            Err(DecodeError::Truncated { offset: 8, .. })
        ));
    }
}
