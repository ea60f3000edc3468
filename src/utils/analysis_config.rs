//! Analysis settings loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! same behaviour as the engine's built-in profiler view.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::config::{
    DEFAULT_SERIES_MIN_SELF, DEFAULT_SERIES_TOP, RESOURCE_CREATE_MARKER, RESOURCE_LOAD_MARKER,
};
use super::error::ConfigError;
use crate::aggregator::flatten::FlattenMode;
use crate::parser::frame::{DecodeOptions, SampleLayout, UnknownIdPolicy};

/// Complete analysis configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Sample record revision used by the producer
    #[serde(default)]
    pub sample_layout: SampleLayout,

    /// What to do with ids missing from the string table
    #[serde(default)]
    pub unknown_ids: UnknownIdPolicy,

    /// Whether flattening may tear down the call trees
    #[serde(default)]
    pub flatten: FlattenMode,

    #[serde(default)]
    pub series: SeriesConfig,

    #[serde(default)]
    pub resources: ResourceConfig,
}

/// Which sample attribute names a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesGrouping {
    #[default]
    Scope,
    Name,
}

/// Per-frame series settings for the stacked chart
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeriesConfig {
    #[serde(default)]
    pub group_by: SeriesGrouping,

    /// Number of series kept before folding into "Other"
    #[serde(default = "default_top")]
    pub top: usize,

    /// Samples with less self time are left out of the series
    #[serde(default = "default_min_self")]
    pub min_self: f64,

    /// Sample names never charted (e.g. "VSync.Wait")
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            group_by: SeriesGrouping::default(),
            top: DEFAULT_SERIES_TOP,
            min_self: DEFAULT_SERIES_MIN_SELF,
            exclude: Vec::new(),
        }
    }
}

/// Sample names that carry a resource path in their argument
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceConfig {
    #[serde(default = "default_load_markers")]
    pub load_markers: Vec<String>,

    #[serde(default = "default_create_markers")]
    pub create_markers: Vec<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            load_markers: default_load_markers(),
            create_markers: default_create_markers(),
        }
    }
}

fn default_top() -> usize {
    DEFAULT_SERIES_TOP
}

fn default_min_self() -> f64 {
    DEFAULT_SERIES_MIN_SELF
}

fn default_load_markers() -> Vec<String> {
    vec![RESOURCE_LOAD_MARKER.to_string()]
}

fn default_create_markers() -> Vec<String> {
    vec![RESOURCE_CREATE_MARKER.to_string()]
}

impl AnalysisConfig {
    /// Decoder options implied by this config
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            layout: self.sample_layout,
            unknown_ids: self.unknown_ids,
        }
    }

    /// Reject settings that cannot produce a meaningful report
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.series.top == 0 {
            return Err(ConfigError::Invalid(
                "series.top must be greater than 0".to_string(),
            ));
        }

        if !self.series.min_self.is_finite() || self.series.min_self < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "series.min_self must be a non-negative number, got {}",
                self.series.min_self
            )));
        }

        Ok(())
    }
}

/// Load an analysis config from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Parse` - If TOML is invalid
/// * `ConfigError::Invalid` - If values are out of range
///
/// # Example
/// ```ignore
/// let config = load_config("analysis.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
