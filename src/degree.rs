//! Degree heuristics: no diffusion model calls.
//!
//! - [`MaxDegree`]: the `k` eligible nodes of largest out-degree.
//! - [`DiscountDegree`]: weighted out-degree toward inactive nodes, discounted by
//!   `(1 - w)` each time an in-neighbor is picked as a seed.
//!
//! Ties go to the smaller node id, i.e. earlier in the input edge list.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use crate::graph::{Direction, Graph, NodeId};
use crate::nodeset::NodeSet;
use crate::priority_queue::{Handle, PriorityQueue};
use crate::{ensure_eligible, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Scored {
    node: NodeId,
    score: f64,
}

fn by_score_then_id(a: &Scored, b: &Scored) -> bool {
    (OrderedFloat(a.score), Reverse(a.node)) > (OrderedFloat(b.score), Reverse(b.node))
}

#[derive(Debug, Clone, Copy)]
pub struct MaxDegree<'g> {
    graph: &'g Graph,
}

impl<'g> MaxDegree<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn select(&self, activated: &NodeSet, k: usize) -> Result<Vec<NodeId>> {
        let mut queue = PriorityQueue::with_capacity(self.graph.node_count(), by_score_then_id);
        for v in self.graph.nodes().filter(|&v| !activated.contains(v)) {
            queue.push(Scored { node: v, score: self.graph.out_degree(v) as f64 });
        }
        ensure_eligible(k, queue.len())?;

        Ok(std::iter::from_fn(|| queue.pop()).take(k).map(|s| s.node).collect())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DiscountDegree<'g> {
    graph: &'g Graph,
}

impl<'g> DiscountDegree<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn select(&self, activated: &NodeSet, k: usize) -> Result<Vec<NodeId>> {
        let n = self.graph.node_count();
        let mut queue = PriorityQueue::with_capacity(n, by_score_then_id);
        let mut handles: Vec<Option<Handle>> = vec![None; n];

        for v in self.graph.nodes().filter(|&v| !activated.contains(v)) {
            let reach: f64 = self
                .graph
                .neighbors(v, Direction::Outgoing)
                .iter()
                .filter(|e| !activated.contains(e.target))
                .map(|e| e.weight)
                .sum();
            handles[v] = Some(queue.push(Scored { node: v, score: 1.0 + reach }));
        }
        ensure_eligible(k, queue.len())?;

        let mut seeds = NodeSet::with_capacity(n);
        while seeds.len() < k {
            let Some(top) = queue.pop() else { break };
            seeds.insert(top.node);
            for e in self.graph.neighbors(top.node, Direction::Outgoing) {
                if activated.contains(e.target) || seeds.contains(e.target) {
                    continue;
                }
                let Some(h) = handles[e.target] else { continue };
                if let Some(&cur) = queue.get(h) {
                    queue.update(h, Scored { score: cur.score * (1.0 - e.weight), ..cur });
                }
            }
        }
        Ok(seeds.as_slice().to_vec())
    }
}
