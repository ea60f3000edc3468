//! Cross-frame statistics computed from flattened frames.
//!
//! Scope totals decide which scopes are material enough to get their own
//! series in the per-frame chart; everything else folds into "Other".

use super::flatten::FlatSample;
use crate::parser::schema::Frame;
use crate::utils::analysis_config::{SeriesConfig, SeriesGrouping};
use crate::utils::config::OTHER_SERIES;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Self time of one scope summed over the whole capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeTotal {
    pub scope: String,
    pub self_time: f64,
    /// Number of samples in this scope
    pub samples: usize,
}

/// Per-scope self time totals, largest first
///
/// **Public** - main entry point for scope aggregation
pub fn scope_totals(frames: &[Vec<FlatSample>]) -> Vec<ScopeTotal> {
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();

    for sample in frames.iter().flatten() {
        let entry = totals.entry(sample.scope_name.as_str()).or_insert((0.0, 0));
        entry.0 += sample.self_time;
        entry.1 += 1;
    }

    let mut totals: Vec<ScopeTotal> = totals
        .into_iter()
        .map(|(scope, (self_time, samples))| ScopeTotal {
            scope: scope.to_string(),
            self_time,
            samples,
        })
        .collect();

    totals.sort_by(|a, b| descending(a.self_time, b.self_time).then_with(|| a.scope.cmp(&b.scope)));

    debug!("Aggregated self time for {} scopes", totals.len());

    totals
}

/// Per-frame values for a stacked chart
///
/// `values[frame][i]` is the self time of series `names[i]` in that frame.
/// The last series is always "Other".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Build the per-frame series table
///
/// **Public** - feeds the stacked-area chart
///
/// # Algorithm
/// 1. Drop excluded names and samples below `min_self`
/// 2. Rank series keys by total self time, keep the top `top`
/// 3. Sum each frame's samples into its series, the rest into "Other"
pub fn build_series(frames: &[Vec<FlatSample>], config: &SeriesConfig) -> SeriesTable {
    let key = |sample: &FlatSample| -> String {
        match config.group_by {
            SeriesGrouping::Scope => sample.scope_name.clone(),
            SeriesGrouping::Name => sample.name.clone(),
        }
    };
    let charted = |sample: &&FlatSample| {
        sample.self_time >= config.min_self && !config.exclude.iter().any(|n| n == &sample.name)
    };

    let mut totals: HashMap<String, f64> = HashMap::new();
    for sample in frames.iter().flatten().filter(charted) {
        *totals.entry(key(sample)).or_insert(0.0) += sample.self_time;
    }

    let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| descending(a.1, b.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(config.top);

    let mut names: Vec<String> = ranked.into_iter().map(|(name, _)| name).collect();
    let slots: HashMap<String, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect();
    let other = names.len();
    names.push(OTHER_SERIES.to_string());

    let values = frames
        .iter()
        .map(|frame| {
            let mut row = vec![0.0; names.len()];
            for sample in frame.iter().filter(charted) {
                let slot = slots.get(&key(sample)).copied().unwrap_or(other);
                row[slot] += sample.self_time;
            }
            row
        })
        .collect();

    SeriesTable { names, values }
}

/// Frame time statistics across the capture
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTimeStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub total: f64,
}

impl FrameTimeStats {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "min {:.3} | mean {:.3} | max {:.3} | total {:.3}",
            self.min, self.mean, self.max, self.total
        )
    }
}

/// Min/mean/max of `frame_time` over all frames
pub fn frame_time_stats(frames: &[Frame]) -> FrameTimeStats {
    if frames.is_empty() {
        return FrameTimeStats::default();
    }

    let total: f64 = frames.iter().map(|f| f.frame_time).sum();
    let min = frames.iter().map(|f| f.frame_time).fold(f64::INFINITY, f64::min);
    let max = frames.iter().map(|f| f.frame_time).fold(0.0, f64::max);

    FrameTimeStats {
        min,
        mean: total / frames.len() as f64,
        max,
        total,
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(name: &str, self_time: f64) -> FlatSample {
        FlatSample {
            name: name.to_string(),
            scope_name: name.split('.').next().unwrap_or_default().to_string(),
            start: 0.0,
            elapsed: self_time,
            self_time,
            arg: None,
            depth: 0,
        }
    }

    fn frames() -> Vec<Vec<FlatSample>> {
        vec![
            vec![flat("Engine.Frame", 1.0), flat("Graphics.Flip", 8.0), flat("Script.Update", 0.5)],
            vec![flat("Engine.Frame", 2.0), flat("Graphics.Flip", 6.0), flat("Engine.Sim", 3.0)],
        ]
    }

    #[test]
    fn test_scope_totals_sorted() {
        let totals = scope_totals(&frames());

        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].scope, "Graphics");
        assert_eq!(totals[0].self_time, 14.0);
        assert_eq!(totals[1].scope, "Engine");
        assert_eq!(totals[1].self_time, 6.0);
        assert_eq!(totals[1].samples, 3);
        assert_eq!(totals[2].scope, "Script");
    }

    #[test]
    fn test_series_folds_into_other() {
        let config = SeriesConfig {
            top: 1,
            min_self: 0.0,
            ..SeriesConfig::default()
        };
        let table = build_series(&frames(), &config);

        assert_eq!(table.names, vec!["Graphics", "Other"]);
        assert_eq!(table.values[0], vec![8.0, 1.5]);
        assert_eq!(table.values[1], vec![6.0, 5.0]);
    }

    #[test]
    fn test_series_by_name_with_filters() {
        let config = SeriesConfig {
            group_by: SeriesGrouping::Name,
            top: 6,
            min_self: 1.0,
            exclude: vec!["Graphics.Flip".to_string()],
        };
        let table = build_series(&frames(), &config);

        // Equal totals are ordered by name
        assert_eq!(table.names, vec!["Engine.Frame", "Engine.Sim", "Other"]);
        assert_eq!(table.values[0], vec![1.0, 0.0, 0.0]);
        assert_eq!(table.values[1], vec![2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_frame_time_stats() {
        let frames = vec![
            Frame { frame_time: 10.0, ..Frame::default() },
            Frame { frame_time: 20.0, ..Frame::default() },
        ];
        let stats = frame_time_stats(&frames);

        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 20.0);
        assert_eq!(stats.mean, 15.0);
        assert_eq!(stats.total, 30.0);
        assert_eq!(frame_time_stats(&[]), FrameTimeStats::default());
    }
}
