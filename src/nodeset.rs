//! Dense node sets.

use crate::graph::NodeId;

/// A set of internal node ids backed by a membership bitmap.
///
/// Insertion order is preserved by [`NodeSet::iter`], which keeps diffusion output and
/// round logs reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    member: Vec<bool>,
    order: Vec<NodeId>,
}

/// Nodes accumulated by the orchestrator across rounds.
pub type ActivatedSet = NodeSet;

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { member: vec![false; n], order: Vec::new() }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.member.get(node).copied().unwrap_or(false)
    }

    /// Returns `true` if `node` was not already present.
    pub fn insert(&mut self, node: NodeId) -> bool {
        if node >= self.member.len() {
            self.member.resize(node + 1, false);
        }
        if self.member[node] {
            return false;
        }
        self.member[node] = true;
        self.order.push(node);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.order
    }

    pub fn clear(&mut self) {
        for &v in &self.order {
            self.member[v] = false;
        }
        self.order.clear();
    }
}

impl Extend<NodeId> for NodeSet {
    fn extend<I: IntoIterator<Item = NodeId>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

impl FromIterator<NodeId> for NodeSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut set = NodeSet::new();
        set.extend(iter);
        set
    }
}
