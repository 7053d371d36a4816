//! Possible worlds and their SCC condensation.
//!
//! A possible world keeps each edge independently with probability equal to its weight.
//! Worlds are stored as forward/reverse CSR (`at_e`/`es`, `at_r`/`rs`): the out-neighbors of
//! `v` are `es[at_e[v]..at_e[v + 1]]`, likewise for in-neighbors.
//!
//! Condensation is an iterative two-pass Kosaraju, so deep worlds never recurse. Component
//! ids come out in topological order: every condensed edge `(a, b)` has `a < b`.

use rand::Rng;

use crate::graph::{Direction, Graph, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveEdges {
    at_e: Vec<usize>,
    es: Vec<NodeId>,
    at_r: Vec<usize>,
    rs: Vec<NodeId>,
}

impl LiveEdges {
    /// CSR over `n` nodes. Neighbor lists keep the input order of `edges`.
    pub fn from_pairs(n: usize, edges: &[(NodeId, NodeId)]) -> Self {
        let mut at_e = vec![0usize; n + 1];
        let mut at_r = vec![0usize; n + 1];
        for &(a, b) in edges {
            at_e[a + 1] += 1;
            at_r[b + 1] += 1;
        }
        for i in 1..=n {
            at_e[i] += at_e[i - 1];
            at_r[i] += at_r[i - 1];
        }

        let mut es = vec![0; edges.len()];
        let mut rs = vec![0; edges.len()];
        let mut next_e = at_e.clone();
        let mut next_r = at_r.clone();
        for &(a, b) in edges {
            es[next_e[a]] = b;
            next_e[a] += 1;
            rs[next_r[b]] = a;
            next_r[b] += 1;
        }
        Self { at_e, es, at_r, rs }
    }

    /// Draw one possible world of `graph`: each edge survives iff a uniform draw is below
    /// its weight. Edges are examined in node order, then adjacency order.
    pub fn sample<R: Rng + ?Sized>(graph: &Graph, rng: &mut R) -> Self {
        let mut kept = Vec::new();
        for v in graph.nodes() {
            for e in graph.neighbors(v, Direction::Outgoing) {
                if rng.random::<f64>() < e.weight {
                    kept.push((e.source, e.target));
                }
            }
        }
        Self::from_pairs(graph.node_count(), &kept)
    }

    pub fn node_count(&self) -> usize {
        self.at_e.len().saturating_sub(1)
    }

    pub fn edge_count(&self) -> usize {
        self.es.len()
    }

    pub fn out(&self, v: NodeId) -> &[NodeId] {
        &self.es[self.at_e[v]..self.at_e[v + 1]]
    }

    pub fn inc(&self, v: NodeId) -> &[NodeId] {
        &self.rs[self.at_r[v]..self.at_r[v + 1]]
    }

    pub fn out_offsets(&self) -> &[usize] {
        &self.at_e
    }

    pub fn in_offsets(&self) -> &[usize] {
        &self.at_r
    }

    pub fn degree(&self, v: NodeId) -> usize {
        self.out(v).len() + self.inc(v).len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condensation {
    /// Component id of every original node.
    pub comp: Vec<usize>,
    pub count: usize,
    /// Deduplicated inter-component edges, sorted.
    pub edges: Vec<(usize, usize)>,
}

#[derive(Clone, Copy)]
enum Visit {
    Enter(NodeId),
    Exit(NodeId),
}

pub fn condensation(world: &LiveEdges) -> Condensation {
    let n = world.node_count();

    // Pass 1: post-order over forward edges.
    let mut seen = vec![false; n];
    let mut order: Vec<NodeId> = Vec::with_capacity(n);
    let mut stack: Vec<Visit> = (0..n).map(Visit::Enter).collect();
    while let Some(step) = stack.pop() {
        match step {
            Visit::Enter(v) => {
                if seen[v] {
                    continue;
                }
                seen[v] = true;
                stack.push(Visit::Exit(v));
                stack.extend(world.out(v).iter().map(|&u| Visit::Enter(u)));
            }
            Visit::Exit(v) => order.push(v),
        }
    }

    // Pass 2: reverse post-order over reverse edges; each fresh root opens a component.
    const UNASSIGNED: usize = usize::MAX;
    let mut comp = vec![UNASSIGNED; n];
    let mut count = 0usize;
    let mut stack: Vec<(NodeId, usize)> = order.iter().map(|&v| (v, UNASSIGNED)).collect();
    while let Some((v, c)) = stack.pop() {
        if comp[v] != UNASSIGNED {
            continue;
        }
        comp[v] = if c == UNASSIGNED {
            count += 1;
            count - 1
        } else {
            c
        };
        let cv = comp[v];
        stack.extend(world.inc(v).iter().map(|&u| (u, cv)));
    }

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for v in 0..n {
        for &u in world.out(v) {
            if comp[v] != comp[u] {
                edges.push((comp[v], comp[u]));
            }
        }
    }
    edges.sort_unstable();
    edges.dedup();

    Condensation { comp, count, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csr_offsets_are_prefix_sums() {
        let w = LiveEdges::from_pairs(4, &[(2, 0), (0, 1), (0, 3), (2, 3)]);
        assert_eq!(w.out_offsets(), &[0, 2, 2, 4, 4]);
        assert_eq!(w.in_offsets(), &[0, 1, 2, 2, 4]);
        assert_eq!(w.out(0), &[1, 3]);
        assert_eq!(w.inc(3), &[0, 2]);
        assert_eq!(w.degree(0), 3);
    }

    #[test]
    fn cycle_collapses_and_edges_are_topological() {
        // 0 -> 1 -> 2 -> 0 is one SCC; it feeds 3, which feeds 4; 5 feeds the cycle.
        let w = LiveEdges::from_pairs(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (0, 3), (3, 4), (5, 1)]);
        let c = condensation(&w);
        assert_eq!(c.count, 4);
        assert_eq!(c.comp[0], c.comp[1]);
        assert_eq!(c.comp[1], c.comp[2]);
        assert_ne!(c.comp[3], c.comp[0]);
        // parallel 0->3 / 2->3 collapse into one condensed edge
        assert_eq!(c.edges.len(), 3);
        for &(a, b) in &c.edges {
            assert!(a < b, "edge {a}->{b} is not topological");
        }
    }

    #[test]
    fn acyclic_world_keeps_every_node() {
        let w = LiveEdges::from_pairs(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]);
        let c = condensation(&w);
        assert_eq!(c.count, 5);
        let mut ids = c.comp.clone();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(c.edges.len(), 5);
    }

    #[test]
    fn sampled_world_respects_certain_and_impossible_edges() {
        use rand::SeedableRng;
        let g = Graph::from_edges([(0, 1, 1.0), (1, 2, 0.0), (2, 0, 1.0)]).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        let w = LiveEdges::sample(&g, &mut rng);
        assert_eq!(w.edge_count(), 2);
        assert_eq!(w.out(0), &[1]);
        assert!(w.out(1).is_empty());
        assert_eq!(w.out(2), &[0]);
    }
}
