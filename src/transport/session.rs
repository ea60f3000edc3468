//! The capture loop.
//!
//! Frames are requested one at a time until the frame ceiling is reached or
//! the token is cancelled; then the string table is requested, which ends the
//! session. Transport failures are retried after a fixed delay for as long as
//! the capture is running.

use super::cancel::CancellationToken;
use super::{ChunkRequest, ChunkSource};
use crate::parser::session::CapturedSession;
use crate::utils::config::{
    CAPTURE_RETRY_DELAY, MAX_CAPTURE_FRAMES, PROFILE_MAGIC, PROGRESS_INTERVAL, STRINGS_MAGIC,
};
use crate::utils::error::{CaptureError, DecodeError};
use log::{debug, info, warn};
use std::thread;
use std::time::Duration;

/// Capture loop settings
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Stop requesting frames after this many
    pub max_frames: usize,

    /// Pause before retrying a failed request
    pub retry_delay: Duration,

    /// Consecutive failures tolerated per request (None = retry until cancelled)
    pub max_retries: Option<u32>,

    /// Report progress every this many frames
    pub progress_interval: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            max_frames: MAX_CAPTURE_FRAMES,
            retry_delay: CAPTURE_RETRY_DELAY,
            max_retries: None,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

enum ChunkKind {
    Profile,
    Strings,
}

fn classify(chunk: &[u8]) -> Result<ChunkKind, DecodeError> {
    match chunk.get(..4) {
        Some(tag) if tag == PROFILE_MAGIC => Ok(ChunkKind::Profile),
        Some(tag) if tag == STRINGS_MAGIC => Ok(ChunkKind::Strings),
        tag => Err(DecodeError::BadMagic {
            expected: "PROF or STRS".to_string(),
            found: String::from_utf8_lossy(tag.unwrap_or(chunk)).into_owned(),
        }),
    }
}

/// Run a capture session against a chunk source
///
/// **Public** - main entry point for capturing
///
/// # Arguments
/// * `source` - Where chunks come from (usually `HttpChunkSource`)
/// * `options` - Frame ceiling and retry policy
/// * `token` - Cancelling it stops frame requests; the string table is still fetched
/// * `progress` - Called with the frame count every `progress_interval` frames
///
/// # Errors
/// * `CaptureError::Decode` - a chunk with an unrecognized tag
/// * `CaptureError::Cancelled` - stopped before the string table arrived
/// * `CaptureError::RetriesExhausted` - `max_retries` consecutive failures
pub fn capture_session<S, F>(
    source: &mut S,
    options: &CaptureOptions,
    token: &CancellationToken,
    mut progress: F,
) -> Result<CapturedSession, CaptureError>
where
    S: ChunkSource + ?Sized,
    F: FnMut(usize),
{
    let mut frame_chunks = Vec::new();
    let mut request = ChunkRequest::Profile;

    loop {
        if request == ChunkRequest::Profile
            && (frame_chunks.len() >= options.max_frames || token.is_cancelled())
        {
            debug!("Stopping frame capture after {} frames", frame_chunks.len());
            request = ChunkRequest::Strings;
        }

        let Some(chunk) = fetch_with_retry(source, request, options, token)? else {
            if request == ChunkRequest::Profile && !frame_chunks.is_empty() {
                continue;
            }
            return Err(CaptureError::Cancelled);
        };

        match classify(&chunk)? {
            ChunkKind::Profile => {
                frame_chunks.push(chunk);
                let count = frame_chunks.len();
                if options.progress_interval > 0 && count % options.progress_interval == 0 {
                    debug!("Captured {} frames", count);
                    progress(count);
                }
            }
            ChunkKind::Strings => {
                info!("Capture complete: {} frames", frame_chunks.len());
                return Ok(CapturedSession {
                    frame_chunks,
                    strings_chunk: chunk,
                });
            }
        }
    }
}

/// Fetch one chunk, retrying transport failures while the capture runs
///
/// Returns `None` when a failure happens after cancellation.
fn fetch_with_retry<S: ChunkSource + ?Sized>(
    source: &mut S,
    request: ChunkRequest,
    options: &CaptureOptions,
    token: &CancellationToken,
) -> Result<Option<Vec<u8>>, CaptureError> {
    let mut failures = 0u32;

    loop {
        match source.fetch(request) {
            Ok(chunk) => return Ok(Some(chunk)),
            Err(e) => {
                failures += 1;

                if token.is_cancelled() {
                    warn!("Request for {} failed after cancellation: {}", request.path(), e);
                    return Ok(None);
                }

                if let Some(max) = options.max_retries {
                    if failures > max {
                        return Err(CaptureError::RetriesExhausted(failures));
                    }
                }

                warn!(
                    "Request for {} failed ({}), retrying in {:?}",
                    request.path(),
                    e,
                    options.retry_delay
                );
                thread::sleep(options.retry_delay);
            }
        }
    }
}
