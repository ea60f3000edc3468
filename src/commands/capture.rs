//! Capture command implementation.
//!
//! The capture command:
//! 1. Captures frame chunks from the engine until the frame limit or Ctrl-C
//! 2. Optionally saves the raw chunks
//! 3. Decodes the session
//! 4. Analyzes it and writes the report

use super::analysis::{report_session, resolve_config};
use super::models::CaptureArgs;
use crate::output::write_session_dir;
use crate::parser::session::decode_session;
use crate::transport::{capture_session, CancellationToken, CaptureOptions, HttpChunkSource};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Upper bound for `--frames`
const MAX_FRAMES_LIMIT: usize = 1_000_000;

/// Execute the capture command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Capture command arguments
///
/// # Errors
/// * Config load failures
/// * Transport failures once retries are exhausted
/// * Chunk decode and file write errors
///
/// # Example
/// ```ignore
/// let args = CaptureArgs {
///     url: "http://10.0.1.6:8002".to_string(),
///     max_frames: 600,
///     print_summary: true,
///     ..Default::default()
/// };
///
/// execute_capture(args)?;
/// ```
pub fn execute_capture(args: CaptureArgs) -> Result<()> {
    let start_time = Instant::now();

    let config = resolve_config(args.config.as_deref())?;

    info!("Starting capture from: {}", args.url);
    info!("Press Ctrl-C to stop early");

    let token = CancellationToken::new();
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    // Step 1: Capture chunks
    info!("Step 1/3: Capturing frames...");
    let mut source = HttpChunkSource::new(&args.url).context("Failed to create HTTP client")?;
    let options = CaptureOptions {
        max_frames: args.max_frames,
        ..Default::default()
    };
    let captured = capture_session(&mut source, &options, &token, |frames| {
        info!("Captured {} frames", frames)
    })
    .with_context(|| format!("Failed to capture profile from {}", args.url))?;

    if let Some(dir) = &args.save_chunks {
        write_session_dir(dir, &captured).context("Failed to save raw chunks")?;
    }

    // Step 2: Decode
    info!("Step 2/3: Decoding {} frame chunks...", captured.frame_chunks.len());
    let session = decode_session(&captured, &config.decode_options())
        .context("Failed to decode captured session")?;

    debug!("String table holds {} entries", session.strings.len());

    // Step 3: Analyze and write
    info!("Step 3/3: Analyzing frames...");
    report_session(
        &session,
        &config,
        &args.output_json,
        args.include_samples,
        args.print_summary,
    )?;

    let elapsed = start_time.elapsed();
    info!("Capture completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate capture arguments
///
/// **Public** - can be called before execute_capture for early validation
pub fn validate_args(args: &CaptureArgs) -> Result<()> {
    if args.url.is_empty() {
        anyhow::bail!("Engine URL cannot be empty");
    }

    if !args.url.starts_with("http://") && !args.url.starts_with("https://") {
        anyhow::bail!("Engine URL must start with http:// or https://");
    }

    if args.max_frames == 0 {
        anyhow::bail!("frames must be greater than 0");
    }

    if args.max_frames > MAX_FRAMES_LIMIT {
        anyhow::bail!("frames is too large (max {})", MAX_FRAMES_LIMIT);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_valid() {
        let args = CaptureArgs {
            url: "http://10.0.1.6:8002".to_string(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_url() {
        let args = CaptureArgs {
            url: String::new(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_invalid_scheme() {
        let args = CaptureArgs {
            url: "ftp://localhost:8002".to_string(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_frames_zero() {
        let args = CaptureArgs {
            max_frames: 0,
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_frames_too_large() {
        let args = CaptureArgs {
            max_frames: 2_000_000,
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }
}
