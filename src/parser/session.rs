//! Decoding of a whole capture session.
//!
//! The transport delivers every `PROF` chunk first and the `STRS` chunk last,
//! so frames can only be decoded once the session is complete.

use super::frame::{decode_frame, DecodeOptions};
use super::schema::Frame;
use super::strings::{decode_string_table, StringTable};
use crate::utils::error::DecodeError;
use log::{debug, info, warn};

/// Raw chunks of one capture, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedSession {
    pub frame_chunks: Vec<Vec<u8>>,
    pub strings_chunk: Vec<u8>,
}

/// Decoded capture session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedSession {
    pub strings: StringTable,
    pub frames: Vec<Frame>,
    /// Indices of frame chunks that could not be decoded
    pub skipped_chunks: Vec<usize>,
}

/// Decode the string table and then every frame chunk
///
/// **Public** - main entry point for decoding
///
/// A frame chunk that is truncated or references an unknown id (under the
/// reject policy) is skipped and recorded; the rest of the session survives.
///
/// # Errors
/// * any error from the string table chunk
/// * `DecodeError::BadMagic` - a frame chunk has an unrecognized tag
pub fn decode_session(
    captured: &CapturedSession,
    options: &DecodeOptions,
) -> Result<DecodedSession, DecodeError> {
    let strings = decode_string_table(&captured.strings_chunk)?;

    let mut frames = Vec::with_capacity(captured.frame_chunks.len());
    let mut skipped_chunks = Vec::new();

    for (index, chunk) in captured.frame_chunks.iter().enumerate() {
        match decode_frame(chunk, &strings, options) {
            Ok(frame) => frames.push(frame),
            Err(e) if e.is_chunk_local() => {
                warn!("Skipping frame chunk {}: {}", index, e);
                skipped_chunks.push(index);
            }
            Err(e) => return Err(e),
        }
    }

    debug!("Decoded {} frames ({} skipped)", frames.len(), skipped_chunks.len());
    info!(
        "Decoded {} frames using {} strings",
        frames.len(),
        strings.len()
    );

    Ok(DecodedSession {
        strings,
        frames,
        skipped_chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::encode::{encode_frame, encode_string_table, RawSample};
    use crate::parser::frame::SampleLayout;

    fn frame_chunk(elapsed_ticks: u32) -> Vec<u8> {
        encode_frame(
            SampleLayout::RevisionB,
            &[RawSample {
                name_id: 2,
                scope_id: 1,
                elapsed_ticks,
                ..Default::default()
            }],
            &[],
            &[],
        )
        .unwrap()
    }

    #[test]
    fn test_truncated_chunk_is_skipped() {
        let good = frame_chunk(1000);
        let bad = good[..good.len() - 5].to_vec();
        let captured = CapturedSession {
            frame_chunks: vec![good.clone(), bad, good],
            strings_chunk: encode_string_table(&[(1, "Engine"), (2, "Frame")]).unwrap(),
        };

        let session = decode_session(&captured, &DecodeOptions::default()).unwrap();

        assert_eq!(session.frames.len(), 2);
        assert_eq!(session.skipped_chunks, vec![1]);
        assert_eq!(session.strings.len(), 2);
    }

    #[test]
    fn test_bad_magic_fails_session() {
        let mut bad = frame_chunk(1000);
        bad[..4].copy_from_slice(b"JUNK");
        let captured = CapturedSession {
            frame_chunks: vec![frame_chunk(1000), bad],
            strings_chunk: encode_string_table(&[(1, "Engine"), (2, "Frame")]).unwrap(),
        };

        assert!(matches!(
            decode_session(&captured, &DecodeOptions::default()),
            Err(DecodeError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_bad_string_table_fails_session() {
        let captured = CapturedSession {
            frame_chunks: vec![frame_chunk(1000)],
            strings_chunk: b"STRS\x01\x00\x00\x00\x01".to_vec(),
        };

        assert!(decode_session(&captured, &DecodeOptions::default()).is_err());
    }
}
