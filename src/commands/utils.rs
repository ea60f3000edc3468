use anyhow::Result;
use std::path::PathBuf;
use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Report schema v{} does not match this build (v{})",
            report.version,
            SCHEMA_VERSION
        );
    }

    if let Some(frames) = &report.frames {
        if frames.len() != report.frame_count {
            anyhow::bail!(
                "Report lists {} frames but holds samples for {}",
                report.frame_count,
                frames.len()
            );
        }
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Frames: {}", report.frame_count);
    println!("  Scopes: {}", report.scope_totals.len());
    println!("  Resources: {}", report.resources.by_resource.len());
    println!("  Diagnostics: {}", report.diagnostics.len());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Engine Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Frame profiler capture and analysis for the game engine.");
}
