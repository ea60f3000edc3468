//! Wire format decoding.
//!
//! This module handles:
//! - Little-endian field reads
//! - String table (`STRS`) chunks
//! - Frame (`PROF`) chunks in both sample revisions
//! - Whole capture sessions

pub mod bytes;
#[doc(hidden)]
pub mod encode;
pub mod frame;
pub mod schema;
pub mod session;
pub mod strings;

// Re-export main types
pub use frame::{decode_frame, DecodeOptions, SampleLayout, UnknownIdPolicy};
pub use schema::{CounterValue, Frame, Sample, ScopeStats};
pub use session::{decode_session, CapturedSession, DecodedSession};
pub use strings::{decode_string_table, StringTable};
