//! Utility modules for configuration, error handling, and analysis settings.

pub mod analysis_config;
pub mod config;
pub mod error;

// Re-export commonly used error types for convenience
pub use error::{CaptureError, ConfigError, DecodeError, EncodeError, OutputError};
