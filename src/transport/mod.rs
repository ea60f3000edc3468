//! Chunk capture from a running engine.
//!
//! The engine serves profile chunks over plain HTTP. This module fetches
//! them; all decoding happens in `parser`.

pub mod cancel;
pub mod client;
pub mod session;

use crate::utils::error::CaptureError;

// Re-export main types
pub use cancel::CancellationToken;
pub use client::HttpChunkSource;
pub use session::{capture_session, CaptureOptions};

/// Which chunk to ask the engine for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkRequest {
    /// Next frame (`PROF`)
    Profile,
    /// String table (`STRS`), requested once after the last frame
    Strings,
}

impl ChunkRequest {
    pub fn path(self) -> &'static str {
        match self {
            ChunkRequest::Profile => "profile",
            ChunkRequest::Strings => "strings",
        }
    }
}

/// Anything that can hand out raw chunks
pub trait ChunkSource {
    fn fetch(&mut self, request: ChunkRequest) -> Result<Vec<u8>, CaptureError>;
}
