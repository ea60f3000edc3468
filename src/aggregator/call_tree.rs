//! Call tree reconstruction from a frame's flat sample list.
//!
//! The wire format has no parent/child links. Nesting is recovered from the
//! sample intervals alone: samples arrive in pre-order (a scope before the
//! scopes it encloses), so a sample whose end lies inside the current node's
//! end is a descendant, and anything ending later is a sibling further up.
//!
//! This only works for a laminar family of intervals (any two are disjoint or
//! nested). Partially overlapping input yields a wrong tree without any error;
//! it usually shows up as a negative self time, which is reported as a
//! [`Diagnostic`].
//!
//! Nodes live in an arena owned by [`CallTree`]. Children are listed by id and
//! the parent link is a plain id, so there are no ownership cycles.

use crate::parser::schema::Sample;
use crate::utils::config::{CONTAINMENT_EPSILON, ROOT_NAME, ROOT_SCOPE};
use log::{debug, warn};
use serde::Serialize;
use std::ops::Index;

/// Index of a node inside its [`CallTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A reconstructed call
#[derive(Debug, Clone, PartialEq)]
pub struct CallTreeNode {
    pub start: f64,
    pub end: f64,
    pub elapsed: f64,
    /// Exclusive time: elapsed minus the spans of direct children
    pub self_time: f64,
    pub name: String,
    pub scope_name: String,
    pub arg: Option<u32>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl CallTreeNode {
    fn from_sample(sample: &Sample) -> Self {
        Self {
            start: sample.start,
            end: sample.end(),
            elapsed: sample.elapsed,
            self_time: 0.0,
            name: sample.name.clone(),
            scope_name: sample.scope_name.clone(),
            arg: sample.arg,
            parent: None,
            children: Vec::new(),
        }
    }

    fn root() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            elapsed: 0.0,
            self_time: 0.0,
            name: ROOT_NAME.to_string(),
            scope_name: ROOT_SCOPE.to_string(),
            arg: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Data-quality finding attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Children cover more time than the node itself
    NegativeSelfTime { node: NodeId, self_time: f64 },
}

impl Diagnostic {
    pub fn node(&self) -> NodeId {
        match self {
            Diagnostic::NegativeSelfTime { node, .. } => *node,
        }
    }
}

/// Call tree of one frame, rooted at a synthetic `Root.Root` node
#[derive(Debug, Clone, PartialEq)]
pub struct CallTree {
    nodes: Vec<CallTreeNode>,
    diagnostics: Vec<Diagnostic>,
}

const ROOT: NodeId = NodeId(0);

impl CallTree {
    /// Build the tree for a frame's samples and compute self times
    ///
    /// **Public** - main entry point, called once per frame
    ///
    /// # Arguments
    /// * `samples` - Samples in arrival order
    ///
    /// # Algorithm
    /// 1. Walk the samples once, nesting by interval containment (with epsilon)
    /// 2. Wrap the top-level nodes in a root spanning all of them
    /// 3. Compute self time for every node, root included
    pub fn build(samples: &[Sample]) -> Self {
        let mut builder = TreeBuilder {
            samples,
            nodes: Vec::with_capacity(samples.len() + 1),
        };
        builder.nodes.push(CallTreeNode::root());

        let top_level = builder.build_forest();

        let mut tree = CallTree {
            nodes: builder.nodes,
            diagnostics: Vec::new(),
        };
        tree.attach(ROOT, top_level);
        tree.span_root();
        tree.compute_self_times();

        debug!(
            "Built call tree with {} nodes from {} samples",
            tree.nodes.len() - 1,
            samples.len()
        );

        tree
    }

    pub fn root_id(&self) -> NodeId {
        ROOT
    }

    pub fn root(&self) -> &CallTreeNode {
        &self[ROOT]
    }

    pub fn get(&self, id: NodeId) -> Option<&CallTreeNode> {
        self.nodes.get(id.0)
    }

    /// Nodes directly under the synthetic root
    pub fn top_level(&self) -> &[NodeId] {
        self.root().children()
    }

    /// Number of nodes, root excluded
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Depth of a node; top-level nodes are at depth 0
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self[id].parent;
        while let Some(parent) = current {
            if parent == ROOT {
                break;
            }
            depth += 1;
            current = self[parent].parent;
        }
        depth
    }

    /// Drop a node's child list, making its subtree unreachable
    pub(crate) fn release_children(&mut self, id: NodeId) {
        self.nodes[id.0].children = Vec::new();
    }

    fn attach(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0].children.extend(children);
    }

    fn span_root(&mut self) {
        let (start, end) = self
            .top_level()
            .iter()
            .map(|&id| (self[id].start, self[id].end))
            .fold(None, |acc: Option<(f64, f64)>, (s, e)| match acc {
                None => Some((s, e)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(e))),
            })
            .unwrap_or((0.0, 0.0));

        let root = &mut self.nodes[ROOT.0];
        root.start = start;
        root.end = end;
        root.elapsed = end - start;
    }

    /// Post-order self time pass
    ///
    /// Children always have larger ids than their parent, so walking the
    /// arena backwards visits every child before its parent.
    fn compute_self_times(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let children_span: f64 = self.nodes[index]
                .children
                .iter()
                .map(|&child| self.nodes[child.0].span())
                .sum();

            let node = &mut self.nodes[index];
            node.self_time = node.elapsed - children_span;

            if node.self_time < -CONTAINMENT_EPSILON {
                warn!(
                    "Negative self time {:.6} for {} at {:.3}; samples are not properly nested",
                    node.self_time, node.name, node.start
                );
                self.diagnostics.push(Diagnostic::NegativeSelfTime {
                    node: NodeId(index),
                    self_time: node.self_time,
                });
            }
        }
        self.diagnostics.reverse();
    }
}

impl Index<NodeId> for CallTree {
    type Output = CallTreeNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

struct TreeBuilder<'a> {
    samples: &'a [Sample],
    nodes: Vec<CallTreeNode>,
}

impl TreeBuilder<'_> {
    /// Attach every sample to the innermost open node that still contains it.
    ///
    /// `open` holds the chain of nodes whose interval has not ended yet, with
    /// their end times. A sample ending past the top of the chain closes that
    /// node, so nesting depth costs heap rather than call stack. Returns the
    /// top-level ids.
    fn build_forest(&mut self) -> Vec<NodeId> {
        let mut top_level = Vec::new();
        let mut open: Vec<(NodeId, f64)> = Vec::new();

        for sample in self.samples {
            let end = sample.end();
            while let Some(&(_, open_end)) = open.last() {
                if end > open_end + CONTAINMENT_EPSILON {
                    open.pop();
                } else {
                    break;
                }
            }

            let current = NodeId(self.nodes.len());
            self.nodes.push(CallTreeNode::from_sample(sample));

            match open.last() {
                Some(&(parent, _)) => {
                    self.nodes[current.0].parent = Some(parent);
                    self.nodes[parent.0].children.push(current);
                }
                None => top_level.push(current),
            }

            open.push((current, end));
        }

        top_level
    }
}
