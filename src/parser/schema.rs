//! Decoded trace data.
//!
//! These are the structures the frame decoder produces. Times are already
//! converted from wire ticks (see `TICKS_PER_SECOND`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One timed event inside a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Scope the sample belongs to (e.g. "Engine")
    pub scope_name: String,

    /// Qualified name, "<scope_name>.<leaf>"
    pub name: String,

    /// Start offset within the capture
    pub start: f64,

    /// Duration, never negative
    pub elapsed: f64,

    /// Raw payload (Revision B only), e.g. a string id naming a resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<u32>,

    pub thread_id: u16,
}

impl Sample {
    pub fn end(&self) -> f64 {
        self.start + self.elapsed
    }
}

/// Per-scope summary carried in the frame chunk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScopeStats {
    pub elapsed: f64,
    pub count: u32,
}

/// Raw counter value carried in the frame chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterValue {
    pub value: u32,
}

/// One profiled engine tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Samples in arrival order
    pub samples: Vec<Sample>,

    /// Longest sample elapsed time in this frame
    pub frame_time: f64,

    /// Scope name -> summary; a repeated name keeps the last record
    pub scopes: BTreeMap<String, ScopeStats>,

    /// Counter name -> value; a repeated name keeps the last record
    pub counters: BTreeMap<String, CounterValue>,
}
