//! Engine Trace Studio
//!
//! Capture and analysis of the game engine's frame profiler stream.
//! Decodes binary profile chunks, rebuilds per-frame call trees from
//! sample intervals, and aggregates self time by scope and by resource.
//!
//! This crate provides the core implementation for the
//! `engine-trace` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! engine-trace capture --url http://10.0.1.6:8002 --frames 600 --summary
//! engine-trace --help
//! ```
//!
//! Library users usually go through `parser::decode_session` and
//! `commands::analyze_session`.

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod transport;
pub mod utils;
