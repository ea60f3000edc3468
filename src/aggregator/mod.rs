//! Call tree reconstruction and aggregation of decoded frames.
//!
//! This module transforms decoded frames into:
//! - One call tree per frame, with self time per node
//! - Pre-order flattened sample lists
//! - Per-scope totals and per-frame chart series
//! - Resource load/create totals

pub mod call_tree;
pub mod flatten;
pub mod metrics;
pub mod resources;

// Re-export main types and functions
pub use call_tree::{CallTree, CallTreeNode, Diagnostic, NodeId};
pub use flatten::{flatten, FlatSample, FlattenMode};
pub use metrics::{build_series, frame_time_stats, scope_totals, FrameTimeStats, ScopeTotal, SeriesTable};
pub use resources::{extension_of, resource_totals, ExtensionTotal, LoadCreate, ResourceTotal, ResourceTotals};
