//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analysis;
pub mod analyze;
pub mod capture;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analysis::{analyze_session, resolve_config};
pub use analyze::{execute_analyze, validate_analyze_args};
pub use capture::{execute_capture, validate_args};
pub use models::{AnalyzeArgs, CaptureArgs};
pub use utils::{display_version, validate_report_file};
