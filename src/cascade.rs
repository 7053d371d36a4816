//! Independent Cascade diffusion.
//!
//! Each newly active node gets one chance to activate each inactive out-neighbor, succeeding
//! with probability equal to the edge weight. Expansion is FIFO from the seed frontier.
//!
//! The same kernel backs three entry points:
//! - [`IndependentCascade::sample`]: mean spread over `simulations` runs (CELF's estimator)
//! - [`IndependentCascade::trial`]: one run that logs every examined edge (TIM's RR sets)
//! - [`IndependentCascade::diffuse`]: one run returning the activated set

use std::collections::VecDeque;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::graph::{Direction, Graph, NodeId};
use crate::nodeset::NodeSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Runs averaged by [`IndependentCascade::sample`].
    pub simulations: usize,
    pub seed: u64,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self { simulations: 100, seed: 0 }
    }
}

/// One edge examined during a logged trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialRecord {
    pub source: NodeId,
    pub target: NodeId,
    pub activated: bool,
}

#[derive(Debug, Clone)]
pub struct IndependentCascade<'g> {
    graph: &'g Graph,
    simulations: usize,
    rng: ChaCha8Rng,
    trials: Vec<TrialRecord>,
    // Per-run membership: `stamp[v] == epoch` means v is active in the current run.
    stamp: Vec<u32>,
    epoch: u32,
    queue: VecDeque<NodeId>,
}

impl<'g> IndependentCascade<'g> {
    pub fn new(graph: &'g Graph, config: CascadeConfig) -> Self {
        Self {
            graph,
            simulations: config.simulations.max(1),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            trials: Vec::new(),
            stamp: vec![0; graph.node_count()],
            epoch: 0,
            queue: VecDeque::new(),
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Expected number of newly reached nodes (not in `activated`) from `seeds`.
    pub fn sample(&mut self, activated: &NodeSet, seeds: &[NodeId]) -> f64 {
        self.trials.clear();
        let mut total = 0usize;
        for _ in 0..self.simulations {
            total += self.run(activated, seeds, Direction::Outgoing, false);
        }
        total as f64 / self.simulations as f64
    }

    /// A single run that records every examined edge, readable via [`Self::trials`].
    ///
    /// With `Direction::Incoming` the cascade walks reverse adjacency, so the activated
    /// targets form a reverse-reachable set of the seeds.
    pub fn trial(&mut self, activated: &NodeSet, seeds: &[NodeId], dir: Direction) -> f64 {
        self.trials.clear();
        self.run(activated, seeds, dir, true) as f64
    }

    /// Edge log of the most recent [`Self::trial`].
    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// One full realization; returns every active node, seeds included.
    pub fn diffuse(&mut self, seeds: &[NodeId]) -> NodeSet {
        self.trials.clear();
        self.start(seeds);
        let mut active = NodeSet::with_capacity(self.graph.node_count());
        while let Some(v) = self.queue.pop_front() {
            active.insert(v);
            self.expand(v, Direction::Outgoing, false);
        }
        active
    }

    fn run(&mut self, activated: &NodeSet, seeds: &[NodeId], dir: Direction, log: bool) -> usize {
        self.start(seeds);
        let mut reached = 0usize;
        while let Some(v) = self.queue.pop_front() {
            self.expand(v, dir, log);
            if !activated.contains(v) {
                reached += 1;
            }
        }
        reached
    }

    fn start(&mut self, seeds: &[NodeId]) {
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.stamp.fill(0);
            self.epoch = 1;
        }
        self.queue.clear();
        // Seeds outside `0..n` are ignored, as in `reachable_from`.
        let n = self.stamp.len();
        for &s in seeds.iter().filter(|&&s| s < n) {
            if self.stamp[s] != self.epoch {
                self.stamp[s] = self.epoch;
                self.queue.push_back(s);
            }
        }
    }

    fn expand(&mut self, v: NodeId, dir: Direction, log: bool) {
        let graph = self.graph;
        for e in graph.neighbors(v, dir) {
            if self.stamp[e.target] == self.epoch {
                continue;
            }
            let hit = self.rng.random::<f64>() < e.weight;
            if hit {
                self.stamp[e.target] = self.epoch;
                self.queue.push_back(e.target);
            }
            if log {
                self.trials.push(TrialRecord { source: v, target: e.target, activated: hit });
            }
        }
    }
}
