//! Analysis pipeline shared by `capture` and `analyze`.
//!
//! Decoded frames go through four steps:
//! 1. Build a call tree per frame (self time, diagnostics)
//! 2. Flatten each tree in pre-order
//! 3. Aggregate scopes, series and resources across frames
//! 4. Assemble the report

use crate::aggregator::{
    build_series, flatten, frame_time_stats, resource_totals, scope_totals, CallTree, FlatSample,
};
use crate::output::report::{DiagnosticRecord, Report};
use crate::output::{render_summary, write_report};
use crate::parser::session::DecodedSession;
use crate::utils::analysis_config::{load_config, AnalysisConfig};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;

/// Rows per table in the terminal summary
const SUMMARY_ROWS: usize = 10;

/// Analyze a decoded session
///
/// **Public** - used by both commands and by library callers
///
/// # Arguments
/// * `session` - Decoded frames and string table
/// * `config` - Flatten mode, series and resource settings
/// * `include_samples` - Keep the flattened frames in the report
pub fn analyze_session(session: &DecodedSession, config: &AnalysisConfig, include_samples: bool) -> Report {
    let mut diagnostics = Vec::new();
    let mut flat_frames: Vec<Vec<FlatSample>> = Vec::with_capacity(session.frames.len());

    for (index, frame) in session.frames.iter().enumerate() {
        let mut tree = CallTree::build(&frame.samples);

        for diagnostic in tree.diagnostics() {
            let node = &tree[diagnostic.node()];
            diagnostics.push(DiagnosticRecord {
                frame: index,
                name: node.name.clone(),
                start: node.start,
                self_time: node.self_time,
            });
        }

        flat_frames.push(flatten(&mut tree, config.flatten));
    }

    if !diagnostics.is_empty() {
        warn!(
            "{} nodes have children covering more than their own time",
            diagnostics.len()
        );
    }

    let frame_time = frame_time_stats(&session.frames);
    info!("Frame time: {}", frame_time.summary());

    let scope_totals = scope_totals(&flat_frames);
    let series = build_series(&flat_frames, &config.series);
    let resources = resource_totals(&flat_frames, &session.strings, &config.resources);

    debug!(
        "{} scopes, {} series, {} resources",
        scope_totals.len(),
        series.names.len(),
        resources.by_resource.len()
    );

    Report {
        version: SCHEMA_VERSION.to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        frame_count: session.frames.len(),
        skipped_chunks: session.skipped_chunks.clone(),
        frame_time,
        scope_totals,
        series,
        resources,
        diagnostics,
        frames: include_samples.then_some(flat_frames),
    }
}

/// Load the config file if one was given, else defaults
pub fn resolve_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => {
            info!("Loading analysis config: {}", path.display());
            load_config(path).with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => Ok(AnalysisConfig::default()),
    }
}

/// Analyze, write the report and optionally print the summary
pub(crate) fn report_session(
    session: &DecodedSession,
    config: &AnalysisConfig,
    output_json: &Path,
    include_samples: bool,
    print_summary: bool,
) -> Result<Report> {
    let report = analyze_session(session, config, include_samples);

    write_report(&report, output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", output_json.display());

    if print_summary {
        println!("{}", render_summary(&report, SUMMARY_ROWS));
    }

    Ok(report)
}
