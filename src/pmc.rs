//! PMC: pruned Monte-Carlo influence maximization.
//!
//! N. Ohsaka et al., *Fast and Accurate Influence Maximization on Large Networks with Pruned
//! Monte-Carlo Simulations*, AAAI 2014.
//!
//! A fixed set of possible worlds is sampled once per selection. In each world the exact
//! spread of a node is the weight reachable from its SCC in the condensation, and a
//! [`PrunedEstimator`] maintains those values under seed insertion:
//!
//! - a **hub** (max total degree SCC) has its descendants precomputed, so BFS from any hub
//!   ancestor stops at the hub's subtree and adds the hub's memoized spread instead;
//! - an SCC with exactly one live child inherits the child's spread (chain collapse);
//! - adding a seed removes everything it reaches and invalidates only the memos of SCCs
//!   that can reach a removed one.
//!
//! Summing the per-world spreads gives exact marginal gains for the sampled worlds.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::components::{condensation, LiveEdges};
use crate::graph::{Graph, NodeId};
use crate::nodeset::NodeSet;
use crate::{ensure_eligible, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PmcConfig {
    /// Possible worlds sampled per selection.
    pub samples: usize,
    /// World `t` draws from `ChaCha8Rng::seed_from_u64(seed + t)`.
    pub seed: u64,
}

impl Default for PmcConfig {
    fn default() -> Self {
        Self { samples: 250, seed: 0 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pmc<'g> {
    graph: &'g Graph,
    config: PmcConfig,
}

impl<'g> Pmc<'g> {
    pub fn new(graph: &'g Graph, config: PmcConfig) -> Self {
        Self { graph, config }
    }

    /// Build the estimator of world `t`.
    pub fn estimator(&self, t: usize, activated: &NodeSet) -> PrunedEstimator {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(t as u64));
        let world = LiveEdges::sample(self.graph, &mut rng);
        let c = condensation(&world);
        PrunedEstimator::new(c.count, &c.edges, &c.comp, activated)
    }

    #[cfg(not(feature = "parallel"))]
    fn estimators(&self, activated: &NodeSet) -> Vec<PrunedEstimator> {
        (0..self.config.samples).map(|t| self.estimator(t, activated)).collect()
    }

    /// Worlds are seeded by index, so the output does not depend on the thread count.
    #[cfg(feature = "parallel")]
    fn estimators(&self, activated: &NodeSet) -> Vec<PrunedEstimator> {
        use rayon::prelude::*;
        (0..self.config.samples).into_par_iter().map(|t| self.estimator(t, activated)).collect()
    }

    pub fn select(&self, activated: &NodeSet, k: usize) -> Result<Vec<NodeId>> {
        let n = self.graph.node_count();
        let mut open: Vec<bool> = (0..n).map(|v| !activated.contains(v)).collect();
        ensure_eligible(k, open.iter().filter(|&&o| o).count())?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut infs = self.estimators(activated);
        let mut gain = vec![0i64; n];
        let mut seeds = Vec::with_capacity(k);

        for round in 0..k {
            for inf in &mut infs {
                inf.update(&mut gain);
            }
            let mut next: Option<NodeId> = None;
            for v in 0..n {
                if open[v] && next.map_or(true, |b| gain[v] > gain[b]) {
                    next = Some(v);
                }
            }
            let Some(next) = next else { break };
            tracing::debug!(round, node = next, gain = gain[next], "pmc: seed chosen");

            open[next] = false;
            seeds.push(next);
            for inf in &mut infs {
                inf.add(next);
            }
        }
        Ok(seeds)
    }
}

enum Child {
    None,
    Unique(usize),
    Many,
}

/// Exact spread oracle for one possible world, over its SCC condensation.
///
/// SCCs are addressed by index; `removed` and `memo` are tombstone/validity flags over
/// those indices.
#[derive(Debug, Clone)]
pub struct PrunedEstimator {
    dag: LiveEdges,
    /// Component of every original node.
    comp: Vec<usize>,
    /// Original nodes grouped by component.
    members: LiveEdges,
    /// Non-activated original nodes per component.
    weight: Vec<i64>,
    sigmas: Vec<i64>,
    memo: Vec<bool>,
    removed: Vec<bool>,
    visited: Vec<bool>,
    hub: usize,
    ancestor: Vec<bool>,
    descendant: Vec<bool>,
    /// Original nodes whose gain changed since the last `update`.
    up: Vec<NodeId>,
    fresh: bool,
}

impl PrunedEstimator {
    /// `edges` are condensed edges over `count` components; `comp` maps original nodes.
    pub fn new(count: usize, edges: &[(usize, usize)], comp: &[usize], activated: &NodeSet) -> Self {
        let dag = LiveEdges::from_pairs(count, edges);
        let grouping: Vec<(usize, NodeId)> = comp.iter().enumerate().map(|(v, &c)| (c, v)).collect();
        let members = LiveEdges::from_pairs(count.max(comp.len()), &grouping);

        let mut weight = vec![0i64; count];
        for (v, &c) in comp.iter().enumerate() {
            if !activated.contains(v) {
                weight[c] += 1;
            }
        }

        let mut pe = Self {
            dag,
            comp: comp.to_vec(),
            members,
            weight,
            sigmas: vec![0; count],
            memo: vec![false; count],
            removed: vec![false; count],
            visited: vec![false; count],
            hub: 0,
            ancestor: vec![false; count],
            descendant: vec![false; count],
            up: (0..comp.len()).collect(),
            fresh: true,
        };
        pe.first();
        pe
    }

    pub fn component_count(&self) -> usize {
        self.sigmas.len()
    }

    pub fn component_of(&self, v: NodeId) -> usize {
        self.comp[v]
    }

    pub fn hub(&self) -> usize {
        self.hub
    }

    /// Spread (reachable non-activated weight) of original node `v`.
    pub fn sigma1(&mut self, v: NodeId) -> i64 {
        self.sigma(self.comp[v])
    }

    fn first(&mut self) {
        let n = self.component_count();
        if n == 0 {
            return;
        }
        self.hub = (0..n).fold(0, |best, i| if self.dag.degree(i) > self.dag.degree(best) { i } else { best });

        self.descendant = self.mark_from(self.hub, true);
        self.ancestor = self.mark_from(self.hub, false);
        self.ancestor[self.hub] = false;

        // Children carry higher ids, so walking backwards memoizes them first.
        for i in (0..n).rev() {
            self.sigma(i);
        }
        self.ancestor = vec![false; n];
        self.descendant = vec![false; n];
    }

    fn mark_from(&self, start: usize, forward: bool) -> Vec<bool> {
        let mut mark = vec![false; self.component_count()];
        mark[start] = true;
        let mut queue = vec![start];
        let mut head = 0;
        while head < queue.len() {
            let v = queue[head];
            head += 1;
            let next = if forward { self.dag.out(v) } else { self.dag.inc(v) };
            for &u in next {
                if !mark[u] {
                    mark[u] = true;
                    queue.push(u);
                }
            }
        }
        mark
    }

    /// Remove seed `v0`'s component and everything it reaches; invalidate memos upstream.
    pub fn add(&mut self, v0: NodeId) {
        let c0 = self.comp[v0];
        self.up.clear();

        let mut rm = Vec::new();
        if !self.removed[c0] {
            self.removed[c0] = true;
            rm.push(c0);
        }
        let mut head = 0;
        while head < rm.len() {
            let v = rm[head];
            head += 1;
            for &u in self.dag.out(v) {
                if !self.removed[u] {
                    self.removed[u] = true;
                    rm.push(u);
                }
            }
        }

        let mut stale: Vec<usize> = Vec::new();
        for &v in &rm {
            self.memo[v] = false;
            self.up.extend_from_slice(self.members.out(v));
            for &u in self.dag.inc(v) {
                if !self.removed[u] && !self.visited[u] {
                    self.visited[u] = true;
                    stale.push(u);
                }
            }
        }
        let mut head = 0;
        while head < stale.len() {
            let v = stale[head];
            head += 1;
            self.memo[v] = false;
            self.up.extend_from_slice(self.members.out(v));
            for &u in self.dag.inc(v) {
                if !self.removed[u] && !self.visited[u] {
                    self.visited[u] = true;
                    stale.push(u);
                }
            }
        }
        for &v in &stale {
            self.visited[v] = false;
        }
    }

    /// Fold this world's changed spreads into the running per-node sums.
    pub fn update(&mut self, sums: &mut [i64]) {
        if !self.fresh {
            for &v in &self.up {
                sums[v] -= self.sigmas[self.comp[v]];
            }
        }
        let up = std::mem::take(&mut self.up);
        for &v in &up {
            sums[v] += self.sigma1(v);
        }
        self.up = up;
        self.fresh = false;
    }

    fn unique_child(&self, v: usize) -> Child {
        let mut child = Child::None;
        for &u in self.dag.out(v) {
            if self.removed[u] {
                continue;
            }
            child = match child {
                Child::None => Child::Unique(u),
                _ => return Child::Many,
            };
        }
        child
    }

    /// Memoized spread of component `v0`.
    pub fn sigma(&mut self, v0: usize) -> i64 {
        let mut chain: Vec<usize> = Vec::new();
        let mut v = v0;
        let base = loop {
            if self.memo[v] {
                break self.sigmas[v];
            }
            self.memo[v] = true;
            if self.removed[v] {
                self.sigmas[v] = 0;
                break 0;
            }
            match self.unique_child(v) {
                Child::None => {
                    self.sigmas[v] = self.weight[v];
                    break self.weight[v];
                }
                Child::Unique(c) => {
                    chain.push(v);
                    v = c;
                }
                Child::Many => {
                    let s = self.reach_weight(v);
                    self.sigmas[v] = s;
                    break s;
                }
            }
        };

        let mut acc = base;
        while let Some(u) = chain.pop() {
            acc += self.weight[u];
            self.sigmas[u] = acc;
        }
        acc
    }

    /// BFS weight from `v0`; hub ancestors stop at the hub's subtree and reuse its spread.
    fn reach_weight(&mut self, v0: usize) -> i64 {
        let prune = self.ancestor[v0];
        let mut delta = if prune { self.sigma(self.hub) } else { 0 };

        let mut seen = vec![v0];
        self.visited[v0] = true;
        let mut head = 0;
        while head < seen.len() {
            let v = seen[head];
            head += 1;
            if self.removed[v] || (prune && self.descendant[v]) {
                continue;
            }
            delta += self.weight[v];
            for &u in self.dag.out(v) {
                if !self.removed[u] && !self.visited[u] {
                    self.visited[u] = true;
                    seen.push(u);
                }
            }
        }
        for &v in &seen {
            self.visited[v] = false;
        }
        delta
    }
}
