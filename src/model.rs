//! Diffusion model dispatch.

use std::fmt;
use std::str::FromStr;

use crate::cascade::IndependentCascade;
use crate::config::Config;
use crate::graph::{Graph, NodeId};
use crate::nodeset::NodeSet;
use crate::threshold::LinearThreshold;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    IndependentCascade,
    LinearThreshold,
}

impl ModelKind {
    /// Lower-case configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::IndependentCascade => "ic",
            Self::LinearThreshold => "lt",
        }
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ic" => Ok(Self::IndependentCascade),
            "lt" => Ok(Self::LinearThreshold),
            _ => Err(Error::UnknownModel(s.to_string())),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_ascii_uppercase())
    }
}

#[derive(Debug, Clone)]
pub enum Model<'g> {
    IndependentCascade(IndependentCascade<'g>),
    LinearThreshold(LinearThreshold<'g>),
}

impl<'g> Model<'g> {
    pub fn new(kind: ModelKind, graph: &'g Graph, config: &Config) -> Self {
        match kind {
            ModelKind::IndependentCascade => {
                Self::IndependentCascade(IndependentCascade::new(graph, config.cascade_config()))
            }
            ModelKind::LinearThreshold => Self::LinearThreshold(LinearThreshold::new(graph, config.seed)),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::IndependentCascade(_) => ModelKind::IndependentCascade,
            Self::LinearThreshold(_) => ModelKind::LinearThreshold,
        }
    }

    /// One realization from `seeds`; the result includes the seeds.
    pub fn diffuse(&mut self, seeds: &[NodeId]) -> NodeSet {
        match self {
            Self::IndependentCascade(m) => m.diffuse(seeds),
            Self::LinearThreshold(m) => m.diffuse(seeds),
        }
    }
}
