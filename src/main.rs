//! Engine Trace Studio CLI
//!
//! Captures frame profiles from a running engine and writes
//! JSON reports with per-scope and per-resource timings.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use engine_trace_studio::commands::{
    display_version, execute_analyze, execute_capture, validate_analyze_args, validate_args,
    validate_report_file, AnalyzeArgs, CaptureArgs,
};
use engine_trace_studio::utils::config::{DEFAULT_ENGINE_URL, MAX_CAPTURE_FRAMES};

/// Engine Trace Studio - frame profiler capture and analysis
#[derive(Parser, Debug)]
#[command(name = "engine-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture frames from a running engine and analyze them
    Capture {
        /// Engine profiler endpoint
        #[arg(short, long, env = "ENGINE_TRACE_URL", default_value = DEFAULT_ENGINE_URL)]
        url: String,

        /// Output path for JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Stop after this many frames (Ctrl-C stops earlier)
        #[arg(long, default_value_t = MAX_CAPTURE_FRAMES)]
        frames: usize,

        /// Analysis config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Save raw chunks to this directory for later `analyze`
        #[arg(long)]
        save_chunks: Option<PathBuf>,

        /// Include flattened samples in the report
        #[arg(long)]
        samples: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Analyze chunks saved with `capture --save-chunks`
    Analyze {
        /// Chunk directory
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Analysis config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Include flattened samples in the report
        #[arg(long)]
        samples: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Capture {
            url,
            output,
            frames,
            config,
            save_chunks,
            samples,
            summary,
        } => {
            let args = CaptureArgs {
                url,
                output_json: output,
                max_frames: frames,
                config,
                save_chunks,
                include_samples: samples,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_capture(args)?;
        }

        Commands::Analyze {
            input,
            output,
            config,
            samples,
            summary,
        } => {
            let args = AnalyzeArgs {
                input_dir: input,
                output_json: output,
                config,
                include_samples: samples,
                print_summary: summary,
            };

            validate_analyze_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
