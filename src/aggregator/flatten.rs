//! Pre-order flattening of call trees.
//!
//! The flattened list is what every aggregate is computed from. Order is the
//! order children were attached, which is also left-to-right in time.

use super::call_tree::{CallTree, CallTreeNode};
use serde::{Deserialize, Serialize};

/// Whether flattening may tear the tree down as it goes
///
/// `Consume` drops each node's child list right after visiting it, so the
/// tree can't be walked again afterwards. Only those `Vec<NodeId>` lists are
/// freed. The nodes, with their name strings, stay in the arena until the
/// `CallTree` itself is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlattenMode {
    /// Leave the tree intact for reuse
    #[default]
    Preserve,
    /// Release child lists while walking
    Consume,
}

/// One node of a flattened tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatSample {
    pub name: String,
    pub scope_name: String,
    pub start: f64,
    pub elapsed: f64,
    #[serde(rename = "self")]
    pub self_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<u32>,
    /// 0 for nodes directly under the root
    pub depth: usize,
}

impl FlatSample {
    fn new(node: &CallTreeNode, depth: usize) -> Self {
        Self {
            name: node.name.clone(),
            scope_name: node.scope_name.clone(),
            start: node.start,
            elapsed: node.elapsed,
            self_time: node.self_time,
            arg: node.arg,
            depth,
        }
    }
}

/// Flatten a tree into pre-order, skipping the synthetic root
///
/// **Public** - called once per frame after `CallTree::build`
///
/// # Example
/// ```ignore
/// let mut tree = CallTree::build(&frame.samples);
/// let flat = flatten(&mut tree, FlattenMode::Preserve);
/// ```
pub fn flatten(tree: &mut CallTree, mode: FlattenMode) -> Vec<FlatSample> {
    let mut flat = Vec::with_capacity(tree.len());
    let root = tree.root_id();

    // Explicit stack so deep nesting can't overflow the call stack
    let mut stack: Vec<_> = tree[root].children().iter().rev().map(|&id| (id, 0)).collect();
    if mode == FlattenMode::Consume {
        tree.release_children(root);
    }

    while let Some((id, depth)) = stack.pop() {
        let node = &tree[id];
        flat.push(FlatSample::new(node, depth));
        stack.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));

        if mode == FlattenMode::Consume {
            tree.release_children(id);
        }
    }

    flat
}
