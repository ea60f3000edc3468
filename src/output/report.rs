//! Report schema written by `capture` and `analyze`.

use crate::aggregator::{FlatSample, FrameTimeStats, ResourceTotals, ScopeTotal, SeriesTable};
use serde::{Deserialize, Serialize};

/// Complete analysis of one capture session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version
    pub version: String,

    /// RFC 3339 timestamp
    pub generated_at: String,

    /// Frames that decoded successfully
    pub frame_count: usize,

    /// Indices of frame chunks that failed to decode
    #[serde(default)]
    pub skipped_chunks: Vec<usize>,

    pub frame_time: FrameTimeStats,

    /// Self time per scope, largest first
    pub scope_totals: Vec<ScopeTotal>,

    pub series: SeriesTable,

    pub resources: ResourceTotals,

    #[serde(default)]
    pub diagnostics: Vec<DiagnosticRecord>,

    /// Flattened samples per frame, only with `--samples`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<Vec<FlatSample>>>,
}

/// A node whose children cover more time than it does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// Index into the decoded frames
    pub frame: usize,
    pub name: String,
    pub start: f64,
    pub self_time: f64,
}

impl Report {
    /// Number of frames with at least one diagnostic
    pub fn frames_with_diagnostics(&self) -> usize {
        let mut frames: Vec<usize> = self.diagnostics.iter().map(|d| d.frame).collect();
        frames.dedup();
        frames.len()
    }
}
