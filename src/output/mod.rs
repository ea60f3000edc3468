//! Output writers for analysis reports and raw capture chunks.
//!
//! This module handles writing data to disk and to the terminal:
//! - JSON reports
//! - Raw chunk directories (for offline re-analysis)
//! - Colored text summaries

pub mod chunks;
pub mod json;
pub mod report;
pub mod summary;

// Re-export main functions
pub use chunks::{read_session_dir, write_session_dir};
pub use json::{read_report, write_report};
pub use report::{DiagnosticRecord, Report};
pub use summary::render_summary;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create a directory and its parents if missing
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }

    debug!("Creating directory: {}", dir.display());
    std::fs::create_dir_all(dir).map_err(|e| {
        OutputError::InvalidPath(format!("Cannot create directory {}: {}", dir.display(), e))
    })
}
