//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while decoding a chunk
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("read of {width} bytes at offset {offset} exceeds buffer of {len} bytes")]
    OutOfBounds { offset: usize, width: usize, len: usize },

    #[error("entry at offset {offset} needs {needed} bytes but buffer has {len}")]
    Truncated { offset: usize, needed: usize, len: usize },

    #[error("bad chunk tag: expected {expected:?}, found {found:?}")]
    BadMagic { expected: String, found: String },

    #[error("string id {0} is not in the string table")]
    UnknownStringId(u32),
}

impl DecodeError {
    /// Whether this error only invalidates the chunk it came from
    ///
    /// `BadMagic` means the stream itself is wrong and the session must stop.
    pub fn is_chunk_local(&self) -> bool {
        !matches!(self, DecodeError::BadMagic { .. })
    }
}

/// Errors that can occur while writing a chunk
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{0} entries do not fit in a u32 count")]
    TooManyEntries(usize),

    #[error("string {id} is {len} bytes, longer than a u16 length allows")]
    StringTooLong { id: u32, len: usize },
}

/// Errors that can occur while capturing chunks from a running engine
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("engine answered with HTTP {0}")]
    HttpStatus(u16),

    #[error("invalid chunk: {0}")]
    Decode(#[from] DecodeError),

    #[error("capture cancelled before the session was complete")]
    Cancelled,

    #[error("gave up after {0} consecutive transport failures")]
    RetriesExhausted(u32),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading an analysis config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid analysis configuration: {0}")]
    Invalid(String),
}
