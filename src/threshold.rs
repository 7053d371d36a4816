//! Linear Threshold diffusion via the live-edge equivalence.
//!
//! Each node keeps at most one incoming edge, chosen proportionally to edge weight (with the
//! remaining `1 - sum(w)` mass meaning "no edge"). The activated set is whatever the seeds
//! reach over the kept edges.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::graph::{Direction, Graph, NodeId};
use crate::nodeset::NodeSet;
use crate::reachability::reachable_from;

#[derive(Debug, Clone)]
pub struct LinearThreshold<'g> {
    graph: &'g Graph,
    rng: ChaCha8Rng,
}

impl<'g> LinearThreshold<'g> {
    pub fn new(graph: &'g Graph, seed: u64) -> Self {
        Self { graph, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn diffuse(&mut self, seeds: &[NodeId]) -> NodeSet {
        let n = self.graph.node_count();
        let mut live: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        for v in self.graph.nodes() {
            let Some(i) = self.graph.sample_living_edge(v, &mut self.rng) else {
                continue;
            };
            let parent = self.graph.neighbors(v, Direction::Incoming)[i].target;
            live[parent].push(v);
        }
        reachable_from(n, seeds, |v| &live[v])
    }
}
