//! Seed-selection dispatch over the closed set of algorithms.

use std::fmt;
use std::str::FromStr;

use crate::celf::Celf;
use crate::config::Config;
use crate::degree::{DiscountDegree, MaxDegree};
use crate::graph::{Graph, NodeId};
use crate::nodeset::NodeSet;
use crate::pmc::Pmc;
use crate::tim::Tim;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    Celf,
    Tim,
    MaxDegree,
    DiscountDegree,
    Pmc,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 5] = [Self::Celf, Self::Tim, Self::MaxDegree, Self::DiscountDegree, Self::Pmc];

    /// Lower-case configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Celf => "celf",
            Self::Tim => "tim",
            Self::MaxDegree => "maxdegree",
            Self::DiscountDegree => "discountdegree",
            Self::Pmc => "pmc",
        }
    }
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_ascii_uppercase())
    }
}

#[derive(Debug, Clone)]
pub enum Algorithm<'g> {
    MaxDegree(MaxDegree<'g>),
    DiscountDegree(DiscountDegree<'g>),
    Celf(Celf<'g>),
    Tim(Tim<'g>),
    Pmc(Pmc<'g>),
}

impl<'g> Algorithm<'g> {
    pub fn new(kind: AlgorithmKind, graph: &'g Graph, config: &Config) -> Self {
        match kind {
            AlgorithmKind::MaxDegree => Self::MaxDegree(MaxDegree::new(graph)),
            AlgorithmKind::DiscountDegree => Self::DiscountDegree(DiscountDegree::new(graph)),
            AlgorithmKind::Celf => Self::Celf(Celf::new(graph, config.cascade_config())),
            AlgorithmKind::Tim => Self::Tim(Tim::new(graph, config.tim_config())),
            AlgorithmKind::Pmc => Self::Pmc(Pmc::new(graph, config.pmc_config())),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Self::MaxDegree(_) => AlgorithmKind::MaxDegree,
            Self::DiscountDegree(_) => AlgorithmKind::DiscountDegree,
            Self::Celf(_) => AlgorithmKind::Celf,
            Self::Tim(_) => AlgorithmKind::Tim,
            Self::Pmc(_) => AlgorithmKind::Pmc,
        }
    }

    /// `k` distinct seeds outside `activated`, in selection order.
    pub fn select(&mut self, activated: &NodeSet, k: usize) -> Result<Vec<NodeId>> {
        match self {
            Self::MaxDegree(a) => a.select(activated, k),
            Self::DiscountDegree(a) => a.select(activated, k),
            Self::Celf(a) => a.select(activated, k),
            Self::Tim(a) => a.select(activated, k),
            Self::Pmc(a) => a.select(activated, k),
        }
    }
}
