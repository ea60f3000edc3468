//! Analyze command implementation.
//!
//! Re-runs the analysis on chunks saved by `capture --save-chunks`, so a
//! capture can be inspected with different settings without the engine.

use super::analysis::{report_session, resolve_config};
use super::models::AnalyzeArgs;
use crate::output::read_session_dir;
use crate::parser::session::decode_session;
use anyhow::{Context, Result};
use log::info;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing or unreadable chunk directory
/// * Config load failures
/// * A string table that cannot be decoded
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref())?;

    info!("Reading chunks from: {}", args.input_dir.display());
    let captured = read_session_dir(&args.input_dir)
        .with_context(|| format!("Failed to read chunks from {}", args.input_dir.display()))?;

    let session = decode_session(&captured, &config.decode_options())
        .context("Failed to decode saved session")?;

    report_session(
        &session,
        &config,
        &args.output_json,
        args.include_samples,
        args.print_summary,
    )?;

    Ok(())
}

/// Validate analyze arguments
pub fn validate_analyze_args(args: &AnalyzeArgs) -> Result<()> {
    if !args.input_dir.is_dir() {
        anyhow::bail!("Input is not a directory: {}", args.input_dir.display());
    }

    Ok(())
}
