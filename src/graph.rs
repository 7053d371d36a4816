//! Immutable directed, edge-weighted graph with forward and reverse adjacency.
//!
//! Edge weights are activation probabilities in `[0, 1]`. Node ids in the input are arbitrary
//! non-negative integers; internally they are remapped to dense indices `0..n` in first-seen
//! order so every per-node table is a flat `Vec`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::sampler::WeightedSampler;
use crate::weights::{self, WeightScheme};
use crate::{Error, Result};

/// Dense internal node index.
pub type NodeId = usize;

/// A directed edge as seen from the node whose adjacency list holds it.
///
/// In the reverse adjacency, `source` is the node being queried and `target` is the
/// original tail of the edge, so both directions can be walked with the same code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone)]
pub struct Graph {
    labels: Vec<u64>,
    index: HashMap<u64, NodeId>,
    out_edges: Vec<Vec<Edge>>,
    in_edges: Vec<Vec<Edge>>,
    edge_count: usize,
    /// Linear-Threshold live-edge distributions over `in_edges`, plus one trailing
    /// "no edge" slot when the in-weights sum to less than one.
    lt_dist: Vec<Option<WeightedSampler>>,
}

impl Graph {
    /// Build from `(src, dst, weight)` triples given as external ids.
    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, u64, f64)>,
    {
        let mut b = Builder::default();
        for (i, (u, v, w)) in edges.into_iter().enumerate() {
            b.add_edge(i + 1, u, v, w)?;
        }
        Ok(b.finish())
    }

    /// Read a whitespace-separated `src dst weight` edge list.
    ///
    /// Blank lines and `#` comments are skipped; any other malformed line is fatal.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut b = Builder::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (u, v, w) = parse_line(trimmed, line_no)?;
            b.add_edge(line_no, u, v, w)?;
        }
        Ok(b.finish())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "reading graph file");
        let f = File::open(path)?;
        Self::from_reader(BufReader::new(f))
    }

    /// Build from unweighted `(src, dst)` pairs. Repeated pairs are dropped, then `scheme`
    /// assigns probabilities; randomized schemes draw from a ChaCha stream seeded by `seed`.
    pub fn from_pairs<I>(pairs: I, scheme: &WeightScheme, seed: u64) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let pairs = weights::dedup_pairs(pairs);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let edges = scheme.assign(&pairs, &mut rng)?;
        tracing::debug!(edges = edges.len(), %scheme, "weighted edge pairs");
        Self::from_edges(edges)
    }

    /// Load a `src dst` edge list (extra columns ignored) and weight it with `scheme`.
    pub fn load_pairs<P: AsRef<Path>>(path: P, scheme: &WeightScheme, seed: u64) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), %scheme, "reading unweighted graph file");
        let f = File::open(path)?;
        Self::from_pairs(weights::read_pairs(BufReader::new(f))?, scheme, seed)
    }

    /// Build from a `petgraph` directed graph whose edge weights are probabilities.
    #[cfg(feature = "petgraph")]
    pub fn from_petgraph<N, Ix>(g: &petgraph::Graph<N, f64, petgraph::Directed, Ix>) -> Result<Self>
    where
        Ix: petgraph::graph::IndexType,
    {
        use petgraph::visit::EdgeRef;
        Self::from_edges(
            g.edge_references()
                .map(|e| (e.source().index() as u64, e.target().index() as u64, *e.weight())),
        )
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn nodes(&self) -> std::ops::Range<NodeId> {
        0..self.labels.len()
    }

    /// External id of an internal node.
    pub fn label(&self, node: NodeId) -> u64 {
        self.labels[node]
    }

    /// Internal id of an external label, if the label appeared in the edge list.
    pub fn index_of(&self, label: u64) -> Option<NodeId> {
        self.index.get(&label).copied()
    }

    /// Edges leaving `node` in the given direction (empty if none).
    pub fn neighbors(&self, node: NodeId, dir: Direction) -> &[Edge] {
        let adj = match dir {
            Direction::Outgoing => &self.out_edges,
            Direction::Incoming => &self.in_edges,
        };
        adj.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.neighbors(node, Direction::Outgoing).len()
    }

    pub fn in_degree(&self, node: NodeId) -> usize {
        self.neighbors(node, Direction::Incoming).len()
    }

    /// Fresh copy of the live-edge distribution for `node`.
    ///
    /// Sampling consumes weight, so callers take a copy per diffusion run.
    pub fn living_edge_sampler(&self, node: NodeId) -> Option<WeightedSampler> {
        self.lt_dist.get(node).and_then(Clone::clone)
    }

    /// Pick at most one incoming edge of `node`, proportionally to weight.
    ///
    /// Returns an index into `neighbors(node, Incoming)`, or `None` when the node has no
    /// in-edges or the draw lands on the "no edge" mass.
    pub fn sample_living_edge<R: Rng + ?Sized>(&self, node: NodeId, rng: &mut R) -> Option<usize> {
        let mut dist = self.living_edge_sampler(node)?;
        let idx = dist.take(rng)?;
        (idx < self.in_degree(node)).then_some(idx)
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<(u64, u64, f64)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(Error::Parse {
            line: line_no,
            message: format!("expected `src dst weight`, got {} field(s)", fields.len()),
        });
    }
    let id = |s: &str| {
        s.parse::<u64>().map_err(|e| Error::Parse { line: line_no, message: format!("node id {s:?}: {e}") })
    };
    let u = id(fields[0])?;
    let v = id(fields[1])?;
    let w = fields[2].parse::<f64>().map_err(|e| Error::Parse {
        line: line_no,
        message: format!("weight {:?}: {e}", fields[2]),
    })?;
    Ok((u, v, w))
}

#[derive(Default)]
struct Builder {
    labels: Vec<u64>,
    index: HashMap<u64, NodeId>,
    out_edges: Vec<Vec<Edge>>,
    in_edges: Vec<Vec<Edge>>,
    edge_count: usize,
    max_label: u64,
}

impl Builder {
    fn intern(&mut self, label: u64) -> NodeId {
        if let Some(&id) = self.index.get(&label) {
            return id;
        }
        let id = self.labels.len();
        self.labels.push(label);
        self.index.insert(label, id);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        self.max_label = self.max_label.max(label);
        id
    }

    fn add_edge(&mut self, line: usize, u: u64, v: u64, weight: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(Error::InvalidWeight { line, weight });
        }
        let src = self.intern(u);
        let tgt = self.intern(v);
        self.out_edges[src].push(Edge { source: src, target: tgt, weight });
        self.in_edges[tgt].push(Edge { source: tgt, target: src, weight });
        self.edge_count += 1;
        Ok(())
    }

    fn finish(self) -> Graph {
        let lt_dist = self
            .in_edges
            .iter()
            .map(|incoming| {
                if incoming.is_empty() {
                    return None;
                }
                let mut w: Vec<f64> = incoming.iter().map(|e| e.weight).collect();
                let total: f64 = w.iter().sum();
                if total < 1.0 {
                    w.push(1.0 - total);
                }
                Some(WeightedSampler::new(&w))
            })
            .collect();

        tracing::info!(
            nodes = self.labels.len(),
            edges = self.edge_count,
            max_node_id = self.max_label,
            "graph loaded"
        );

        Graph {
            labels: self.labels,
            index: self.index,
            out_edges: self.out_edges,
            in_edges: self.in_edges,
            edge_count: self.edge_count,
            lt_dist,
        }
    }
}
