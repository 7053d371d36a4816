//! Reachability helpers.
//!
//! One BFS kernel, parameterized by a neighbor callback, so live-edge graphs (Linear
//! Threshold) and condensation DAGs (PMC checks) share the same traversal.

use crate::graph::NodeId;
use crate::nodeset::NodeSet;

/// All nodes reachable from `seeds` (seeds included), in BFS discovery order.
///
/// `neighbors(v)` yields the successors of `v`. Seeds `>= n` are ignored.
pub fn reachable_from<'a, F, I>(n: usize, seeds: &[NodeId], mut neighbors: F) -> NodeSet
where
    F: FnMut(NodeId) -> I,
    I: IntoIterator<Item = &'a NodeId>,
{
    let mut visited = NodeSet::with_capacity(n);
    let mut head = 0usize;
    for &s in seeds {
        if s < n {
            visited.insert(s);
        }
    }
    while head < visited.len() {
        let cur = visited.as_slice()[head];
        head += 1;
        for &nx in neighbors(cur) {
            if nx < n {
                visited.insert(nx);
            }
        }
    }
    visited
}
