use std::path::PathBuf;
use crate::utils::config::{DEFAULT_ENGINE_URL, MAX_CAPTURE_FRAMES};

/// Arguments for the capture command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CaptureArgs {
    /// Engine profiler endpoint
    pub url: String,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Stop after this many frames
    pub max_frames: usize,

    /// Analysis config (TOML, optional)
    pub config: Option<PathBuf>,

    /// Directory to save the raw chunks in (optional)
    pub save_chunks: Option<PathBuf>,

    /// Include flattened samples in the report
    pub include_samples: bool,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for CaptureArgs {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENGINE_URL.to_string(),
            output_json: PathBuf::from("report.json"),
            max_frames: MAX_CAPTURE_FRAMES,
            config: None,
            save_chunks: None,
            include_samples: false,
            print_summary: false,
        }
    }
}

/// Arguments for the analyze command
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Directory written by `capture --save-chunks`
    pub input_dir: PathBuf,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Analysis config (TOML, optional)
    pub config: Option<PathBuf>,

    /// Include flattened samples in the report
    pub include_samples: bool,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("chunks"),
            output_json: PathBuf::from("report.json"),
            config: None,
            include_samples: false,
            print_summary: false,
        }
    }
}
