//! Resource load/create time, by file extension and by resource path.
//!
//! Resource samples carry the resource path as a string id in `arg`.

use super::flatten::FlatSample;
use crate::parser::strings::StringTable;
use crate::utils::analysis_config::ResourceConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Load and create time accumulated for one key
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadCreate {
    pub load: f64,
    pub create: f64,
}

impl LoadCreate {
    pub fn total(&self) -> f64 {
        self.load + self.create
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionTotal {
    pub extension: String,
    #[serde(flatten)]
    pub time: LoadCreate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTotal {
    pub resource: String,
    pub extension: String,
    #[serde(flatten)]
    pub time: LoadCreate,
}

/// Resource totals, each list sorted by load + create, largest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTotals {
    pub by_extension: Vec<ExtensionTotal>,
    pub by_resource: Vec<ResourceTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceEvent {
    Load,
    Create,
}

/// Suffix after the last '.', or the whole path if it has none
pub fn extension_of(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Aggregate resource samples across all frames
///
/// **Public** - main entry point for resource aggregation
///
/// # Arguments
/// * `frames` - Flattened frames with self time
/// * `strings` - Session string table, used to resolve `arg`
/// * `config` - Marker names for load and create events
pub fn resource_totals(
    frames: &[Vec<FlatSample>],
    strings: &StringTable,
    config: &ResourceConfig,
) -> ResourceTotals {
    let mut by_extension: HashMap<&str, LoadCreate> = HashMap::new();
    // Keyed on the wire bytes; the display text only names the entry
    let mut by_resource: HashMap<&[u8], (&str, LoadCreate)> = HashMap::new();
    let mut skipped = 0usize;

    for sample in frames.iter().flatten() {
        let event = if config.load_markers.iter().any(|m| m == &sample.name) {
            ResourceEvent::Load
        } else if config.create_markers.iter().any(|m| m == &sample.name) {
            ResourceEvent::Create
        } else {
            continue;
        };

        let Some((key, resource)) = sample
            .arg
            .and_then(|id| Some((strings.get_bytes(id)?, strings.get(id)?)))
        else {
            skipped += 1;
            continue;
        };

        for entry in [
            by_extension.entry(extension_of(resource)).or_default(),
            &mut by_resource.entry(key).or_insert((resource, LoadCreate::default())).1,
        ] {
            match event {
                ResourceEvent::Load => entry.load += sample.self_time,
                ResourceEvent::Create => entry.create += sample.self_time,
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} resource samples without a resolvable path", skipped);
    }

    let mut by_extension: Vec<ExtensionTotal> = by_extension
        .into_iter()
        .map(|(extension, time)| ExtensionTotal {
            extension: extension.to_string(),
            time,
        })
        .collect();
    by_extension.sort_by(|a, b| largest_first(&a.time, &b.time).then_with(|| a.extension.cmp(&b.extension)));

    let mut by_resource: Vec<ResourceTotal> = by_resource
        .into_values()
        .map(|(resource, time)| ResourceTotal {
            resource: resource.to_string(),
            extension: extension_of(resource).to_string(),
            time,
        })
        .collect();
    by_resource.sort_by(|a, b| largest_first(&a.time, &b.time).then_with(|| a.resource.cmp(&b.resource)));

    ResourceTotals {
        by_extension,
        by_resource,
    }
}

fn largest_first(a: &LoadCreate, b: &LoadCreate) -> Ordering {
    b.total().partial_cmp(&a.total()).unwrap_or(Ordering::Equal)
}
