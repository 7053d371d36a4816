//! TIM: two-phase influence maximization over reverse-reachable (RR) sets.
//!
//! An RR set is the set of nodes that reach a uniformly random root in one live-edge
//! realization. A seed set's expected spread is proportional to the fraction of RR sets it
//! covers, so seed selection becomes greedy max-coverage over a sampled hypergraph.
//!
//! Phases (n = eligible nodes, m = edges, k = budget):
//! 1. KPT estimation by doubling a lower bound until the coverage estimate exceeds it.
//! 2. Refinement with `eps2 = 5 * (sqrt(eps) / k)^(1/3)` to tighten the spread estimate.
//! 3. Final sampling sized by `eps` and `log C(n, k)`; greedy coverage gives the seeds.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cascade::{CascadeConfig, IndependentCascade};
use crate::graph::{Direction, Graph, NodeId};
use crate::nodeset::NodeSet;
use crate::{ensure_eligible, Result};

/// Hard ceiling on RR sets per hypergraph, whatever the bounds ask for.
pub const MAX_SAMPLES: usize = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimConfig {
    pub epsilon: f64,
    pub seed: u64,
}

impl Default for TimConfig {
    fn default() -> Self {
        Self { epsilon: 0.1, seed: 0 }
    }
}

/// RR sets stored both ways: set -> members and node -> covering set ids.
#[derive(Debug, Clone, Default)]
pub struct Hypergraph {
    rr_sets: Vec<Vec<NodeId>>,
    covering: Vec<Vec<usize>>,
}

impl Hypergraph {
    pub fn new(node_count: usize) -> Self {
        Self { rr_sets: Vec::new(), covering: vec![Vec::new(); node_count] }
    }

    pub fn push(&mut self, rr: Vec<NodeId>) {
        let id = self.rr_sets.len();
        for &v in &rr {
            self.covering[v].push(id);
        }
        self.rr_sets.push(rr);
    }

    /// Number of RR sets.
    pub fn len(&self) -> usize {
        self.rr_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rr_sets.is_empty()
    }

    pub fn rr_set(&self, id: usize) -> &[NodeId] {
        &self.rr_sets[id]
    }

    /// Ids of the RR sets containing `node`.
    pub fn covering(&self, node: NodeId) -> &[usize] {
        &self.covering[node]
    }

    /// Distinct RR sets hit by `seeds`.
    pub fn coverage(&self, seeds: &[NodeId]) -> usize {
        let mut hit = vec![false; self.rr_sets.len()];
        let mut count = 0usize;
        for &s in seeds {
            for &r in &self.covering[s] {
                if !hit[r] {
                    hit[r] = true;
                    count += 1;
                }
            }
        }
        count
    }

    /// Greedy max-coverage: repeatedly take the candidate covering the most uncovered sets.
    ///
    /// `candidates` must be sorted ascending; ties go to the first one.
    pub fn greedy_cover(&self, candidates: &[NodeId], k: usize) -> Vec<NodeId> {
        let mut deg = vec![0i64; self.covering.len()];
        let mut open = vec![false; self.covering.len()];
        for &v in candidates {
            deg[v] = self.covering[v].len() as i64;
            open[v] = true;
        }
        let mut covered = vec![false; self.rr_sets.len()];
        let mut seeds = Vec::with_capacity(k);

        for _ in 0..k {
            let mut best: Option<NodeId> = None;
            for &v in candidates {
                if open[v] && best.map_or(true, |b| deg[v] > deg[b]) {
                    best = Some(v);
                }
            }
            let Some(id) = best else { break };
            open[id] = false;
            seeds.push(id);
            for &r in &self.covering[id] {
                if covered[r] {
                    continue;
                }
                covered[r] = true;
                for &u in &self.rr_sets[r] {
                    deg[u] -= 1;
                }
            }
        }
        seeds
    }
}

#[derive(Debug, Clone)]
pub struct Tim<'g> {
    graph: &'g Graph,
    config: TimConfig,
    rng: ChaCha8Rng,
}

impl<'g> Tim<'g> {
    pub fn new(graph: &'g Graph, config: TimConfig) -> Self {
        Self { graph, config, rng: ChaCha8Rng::seed_from_u64(config.seed) }
    }

    pub fn select(&mut self, activated: &NodeSet, k: usize) -> Result<Vec<NodeId>> {
        let roots: Vec<NodeId> = self.graph.nodes().filter(|&v| !activated.contains(v)).collect();
        ensure_eligible(k, roots.len())?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let n = roots.len() as f64;
        let kf = k as f64;
        let eps = self.config.epsilon;
        let eps2 = 5.0 * (eps.sqrt() / kf).powf(1.0 / 3.0);

        let mut rr = RrSampler {
            graph: self.graph,
            activated,
            roots: &roots,
            ic: IndependentCascade::new(self.graph, CascadeConfig { simulations: 1, seed: self.config.seed }),
            rng: &mut self.rng,
        };

        // Phase 1: KPT lower bound; `ept` is never below k (every seed reaches itself).
        let kpt = rr.estimate_kpt(k);
        let ept = (kpt / 2.0).max(kf);
        tracing::debug!(kpt, ept, "tim: kpt phase");

        // Phase 2: refine the spread estimate.
        let r2 = (8.0 + 2.0 * eps2) * (n * n.ln() + n * 2f64.ln()) / (eps2 * eps2 * ept) / 4.0;
        let hyper = rr.build(r2);
        let seeds = hyper.greedy_cover(&roots, k);
        let ept = (n * hyper.coverage(&seeds) as f64 / hyper.len() as f64 / (1.0 + eps2)).max(kf);
        tracing::debug!(eps2, r = hyper.len(), ept, "tim: refinement phase");

        // Phase 3: final sample size from eps and log C(n, k).
        let log_cnk: f64 = (1..=k).map(|j| (n - (j - 1) as f64).log10() - (j as f64).log10()).sum();
        let r3 = (8.0 + 2.0 * eps) * (n * n.ln() + n * 2f64.ln() + n * log_cnk) / (eps * eps * ept);
        let hyper = rr.build(r3);
        let seeds = hyper.greedy_cover(&roots, k);
        tracing::debug!(eps, r = hyper.len(), ?seeds, "tim: final phase");

        Ok(seeds)
    }
}

struct RrSampler<'a, 'g> {
    graph: &'g Graph,
    activated: &'a NodeSet,
    roots: &'a [NodeId],
    ic: IndependentCascade<'g>,
    rng: &'a mut ChaCha8Rng,
}

impl RrSampler<'_, '_> {
    fn rr_set(&mut self) -> Vec<NodeId> {
        let root = self.roots[self.rng.random_range(0..self.roots.len())];
        self.ic.trial(self.activated, &[root], Direction::Incoming);
        let mut rr = vec![root];
        rr.extend(self.ic.trials().iter().filter(|t| t.activated).map(|t| t.target));
        rr
    }

    /// Sample `r` RR sets; see [`sample_count`].
    fn build(&mut self, r: f64) -> Hypergraph {
        let r = sample_count(r);
        let mut hyper = Hypergraph::new(self.graph.node_count());
        for _ in 0..r {
            let rr = self.rr_set();
            hyper.push(rr);
        }
        hyper
    }

    fn estimate_kpt(&mut self, k: usize) -> f64 {
        let n = self.roots.len() as f64;
        let m = self.graph.edge_count().max(1) as f64;
        let max_steps = (n.log2() - 1.0).max(1.0) as usize;

        let mut lb = 0.5;
        let mut kpt = 1.0;
        for _ in 0..max_steps {
            let loops = sample_count(((6.0 * n.ln() + 6.0 * n.log2().ln()) / lb).ceil());
            let mut cc = 0.0;
            for _ in 0..loops {
                let rr = self.rr_set();
                let width: usize = rr.iter().map(|&v| self.graph.in_degree(v)).sum();
                let pu = width as f64 / m;
                cc += 1.0 - (1.0 - pu).powf(k as f64);
            }
            cc /= loops as f64;
            if cc > lb {
                kpt = cc * n;
                break;
            }
            lb /= 2.0;
        }
        kpt
    }
}

/// RR sets to draw for a bound of `r`: at least one, at most [`MAX_SAMPLES`]. NaN and
/// non-positive bounds give one.
fn sample_count(r: f64) -> usize {
    if r > MAX_SAMPLES as f64 {
        tracing::warn!(requested = r, cap = MAX_SAMPLES, "tim: RR sample count capped");
    }
    (r as usize).clamp(1, MAX_SAMPLES)
}
