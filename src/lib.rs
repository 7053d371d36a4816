//! `influence`: seed selection and stochastic diffusion on directed, edge-weighted graphs.
//!
//! Given a graph whose edge weights are activation probabilities, pick `k` seed nodes that
//! maximize expected spread, then simulate the spread. Repeated rounds exclude nodes that
//! are already activated.
//!
//! Public invariants (must not drift):
//! - **Node ids**: internal ids are dense `0..n` in first-seen order of the edge list;
//!   external ids are kept as labels ([`Graph::label`]).
//! - **Determinism**: every stochastic component owns its own seeded PRNG; identical
//!   inputs + configs produce identical seeds and cascades.
//! - **Selection contract**: `select(activated, k)` returns `k` distinct, non-activated nodes
//!   or [`Error::InsufficientNodes`].
//!
//! Swappable (allowed to change without breaking the contract):
//! - serial vs parallel possible-world construction in PMC (`parallel` feature)
//! - internal data structures (so long as invariants hold)

pub mod algorithm;
pub mod cascade;
pub mod celf;
pub mod components;
pub mod config;
pub mod degree;
pub mod evaluator;
pub mod graph;
pub mod model;
pub mod nodeset;
pub mod pmc;
pub mod priority_queue;
pub mod reachability;
pub mod sampler;
pub mod threshold;
pub mod tim;
pub mod weights;

pub use algorithm::{Algorithm, AlgorithmKind};
pub use cascade::{CascadeConfig, IndependentCascade, TrialRecord};
pub use celf::Celf;
pub use components::{condensation, Condensation, LiveEdges};
pub use config::Config;
pub use degree::{DiscountDegree, MaxDegree};
pub use evaluator::{format_round, Evaluator, RoundRecord};
pub use graph::{Direction, Edge, Graph, NodeId};
pub use model::{Model, ModelKind};
pub use nodeset::{ActivatedSet, NodeSet};
pub use pmc::{Pmc, PmcConfig, PrunedEstimator};
pub use priority_queue::{Handle, PriorityQueue};
pub use reachability::reachable_from;
pub use sampler::WeightedSampler;
pub use threshold::LinearThreshold;
pub use tim::{Hypergraph, Tim, TimConfig};
pub use weights::WeightScheme;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed graph line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("edge weight out of [0, 1] on line {line}: {weight}")]
    InvalidWeight { line: usize, weight: f64 },
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("unknown diffusion model: {0}")]
    UnknownModel(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("requested {requested} seeds but only {available} nodes are eligible")]
    InsufficientNodes { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Check the selection precondition shared by every algorithm.
pub(crate) fn ensure_eligible(requested: usize, available: usize) -> Result<()> {
    if requested > available {
        return Err(Error::InsufficientNodes { requested, available });
    }
    Ok(())
}
