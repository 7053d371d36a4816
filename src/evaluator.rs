//! Round driver: select, diffuse, accumulate, log.
//!
//! Each round picks `seeds` new nodes outside the activated set, diffuses from them, and
//! merges the result. One line per round goes to the round log:
//!
//! ```text
//! round \t activated \t minutes \t [label, ...]
//! ```

use std::io::Write;
use std::time::{Duration, Instant};

use crate::algorithm::Algorithm;
use crate::config::Config;
use crate::graph::{Graph, NodeId};
use crate::model::Model;
use crate::nodeset::ActivatedSet;
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    /// 1-based.
    pub round: usize,
    /// Cumulative activated count after the round.
    pub activated: usize,
    pub duration: Duration,
    pub seeds: Vec<NodeId>,
}

/// One round-log line, without the trailing newline.
pub fn format_round(round: usize, activated: usize, minutes: f64, labels: &[u64]) -> String {
    let labels: Vec<String> = labels.iter().map(u64::to_string).collect();
    format!("{round}\t{activated}\t{minutes:.5}\t[{}]", labels.join(", "))
}

#[derive(Debug)]
pub struct Evaluator<'g> {
    graph: &'g Graph,
    trials: usize,
    seeds: usize,
    algorithm: Algorithm<'g>,
    model: Model<'g>,
    activated: ActivatedSet,
}

impl<'g> Evaluator<'g> {
    pub fn new(config: &Config, graph: &'g Graph) -> Self {
        Self {
            graph,
            trials: config.trials,
            seeds: config.seeds,
            algorithm: Algorithm::new(config.algorithm, graph, config),
            model: Model::new(config.model, graph, config),
            activated: ActivatedSet::with_capacity(graph.node_count()),
        }
    }

    /// Nodes activated so far, across all rounds run.
    pub fn activated(&self) -> &ActivatedSet {
        &self.activated
    }

    pub fn run<W: Write>(&mut self, mut out: W) -> Result<Vec<RoundRecord>> {
        tracing::info!(algorithm = %self.algorithm.kind(), model = %self.model.kind(), "running evaluator");

        let mut records = Vec::with_capacity(self.trials);
        let mut total = Duration::ZERO;
        for round in 1..=self.trials {
            let t0 = Instant::now();
            let seeds = self.algorithm.select(&self.activated, self.seeds)?;
            let reached = self.model.diffuse(&seeds);
            self.activated.extend(reached.iter());
            let duration = t0.elapsed();
            total += duration;

            let labels: Vec<u64> = seeds.iter().map(|&v| self.graph.label(v)).collect();
            let minutes = duration.as_secs_f64() / 60.0;
            writeln!(out, "{}", format_round(round, self.activated.len(), minutes, &labels))?;
            out.flush()?;

            tracing::info!(round, activated = self.activated.len(), minutes, "round complete");
            records.push(RoundRecord { round, activated: self.activated.len(), duration, seeds });
        }

        tracing::info!(minutes = total.as_secs_f64() / 60.0, rounds = records.len(), "evaluator finished");
        Ok(records)
    }
}
