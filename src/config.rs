//! Run configuration, loaded from TOML.
//!
//! ```toml
//! outputDir = "output"
//! graphPath = "data/graph.txt"
//! trials = 5
//! algorithm = "celf"
//! seeds = 10
//! model = "ic"
//! simulations = 100
//! seed = 42
//! # Optional: treat graphPath as bare `src dst` pairs and weight them.
//! weights = "wc"
//! ```
//!
//! Every key is optional. Algorithm and model names are case-insensitive and rejected at
//! load time when unknown.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::algorithm::AlgorithmKind;
use crate::cascade::CascadeConfig;
use crate::graph::Graph;
use crate::model::ModelKind;
use crate::pmc::PmcConfig;
use crate::tim::TimConfig;
use crate::weights::WeightScheme;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output_dir: PathBuf,
    pub graph_path: PathBuf,
    /// Selection/diffusion rounds.
    pub trials: usize,
    pub algorithm: AlgorithmKind,
    /// Seeds chosen per round (k).
    pub seeds: usize,
    pub model: ModelKind,
    /// Independent Cascade runs per spread estimate.
    pub simulations: usize,
    pub seed: u64,
    /// When set, the graph file holds unweighted pairs weighted by this scheme.
    pub weights: Option<WeightScheme>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            graph_path: PathBuf::new(),
            trials: 1,
            algorithm: AlgorithmKind::Celf,
            seeds: 1,
            model: ModelKind::IndependentCascade,
            simulations: 100,
            seed: 0,
            weights: None,
        }
    }
}

/// On-disk shape: names stay strings until validated into the closed enums.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawConfig {
    output_dir: PathBuf,
    graph_path: PathBuf,
    trials: usize,
    algorithm: String,
    seeds: usize,
    model: String,
    simulations: usize,
    seed: u64,
    weights: Option<String>,
}

impl Default for RawConfig {
    fn default() -> Self {
        let c = Config::default();
        Self {
            output_dir: c.output_dir,
            graph_path: c.graph_path,
            trials: c.trials,
            algorithm: c.algorithm.name().to_string(),
            seeds: c.seeds,
            model: c.model.name().to_string(),
            simulations: c.simulations,
            seed: c.seed,
            weights: None,
        }
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self> {
        Ok(Self {
            output_dir: raw.output_dir,
            graph_path: raw.graph_path,
            trials: raw.trials,
            algorithm: raw.algorithm.parse()?,
            seeds: raw.seeds,
            model: raw.model.parse()?,
            simulations: raw.simulations,
            seed: raw.seed,
            weights: raw.weights.as_deref().map(str::parse::<WeightScheme>).transpose()?,
        })
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        let config = Self::try_from(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(Error::InvalidParameter("simulations must be at least 1".into()));
        }
        Ok(())
    }

    /// `<outputDir>/<graph stem>_<algorithm>_<trials>_<seeds>_<seed>_<timestamp_ms>.log`
    pub fn log_file_name(&self, timestamp_ms: u128) -> PathBuf {
        let stem = self.graph_path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        self.output_dir.join(format!(
            "{stem}_{}_{}_{}_{}_{timestamp_ms}.log",
            self.algorithm.name(),
            self.trials,
            self.seeds,
            self.seed
        ))
    }

    /// Load `graph_path`, as a weighted edge list or as pairs weighted by `weights`.
    pub fn load_graph(&self) -> Result<Graph> {
        match &self.weights {
            Some(scheme) => Graph::load_pairs(&self.graph_path, scheme, self.seed),
            None => Graph::load(&self.graph_path),
        }
    }

    pub fn cascade_config(&self) -> CascadeConfig {
        CascadeConfig { simulations: self.simulations, seed: self.seed }
    }

    pub fn tim_config(&self) -> TimConfig {
        TimConfig { seed: self.seed, ..TimConfig::default() }
    }

    pub fn pmc_config(&self) -> PmcConfig {
        PmcConfig { seed: self.seed, ..PmcConfig::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_keys_and_mixed_case_names() {
        let c = Config::from_toml_str(
            r#"
            outputDir = "out"
            graphPath = "data/nethept.txt"
            trials = 3
            algorithm = "DiscountDegree"
            seeds = 7
            model = "LT"
            simulations = 20
            seed = 11
            "#,
        )
        .unwrap();
        assert_eq!(c.output_dir, PathBuf::from("out"));
        assert_eq!(c.algorithm, AlgorithmKind::DiscountDegree);
        assert_eq!(c.model, ModelKind::LinearThreshold);
        assert_eq!((c.trials, c.seeds, c.simulations, c.seed), (3, 7, 20, 11));
        assert_eq!(c.cascade_config().simulations, 20);
        assert_eq!(c.pmc_config().samples, 250);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn unknown_names_are_typed_errors() {
        assert!(matches!(
            Config::from_toml_str(r#"algorithm = "greedy""#),
            Err(Error::UnknownAlgorithm(name)) if name == "greedy"
        ));
        assert!(matches!(Config::from_toml_str(r#"model = "sir""#), Err(Error::UnknownModel(_))));
        assert!(matches!(Config::from_toml_str("trials = \"x\""), Err(Error::Config(_))));
        assert!(matches!(Config::from_toml_str("simulations = 0"), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn weight_scheme_key_is_parsed_and_checked() {
        let c = Config::from_toml_str(r#"weights = "random-lt""#).unwrap();
        assert_eq!(c.weights, Some(WeightScheme::RandomThreshold));
        let c = Config::from_toml_str(r#"weights = "constant:0.01""#).unwrap();
        assert_eq!(c.weights, Some(WeightScheme::Constant(0.01)));
        assert!(matches!(Config::from_toml_str(r#"weights = "heavy""#), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn component_configs_deserialize_with_defaults() {
        let pmc: PmcConfig = toml::from_str("samples = 12").unwrap();
        assert_eq!(pmc, PmcConfig { samples: 12, seed: 0 });
        let tim: TimConfig = toml::from_str("epsilon = 0.2\nseed = 3").unwrap();
        assert_eq!(tim, TimConfig { epsilon: 0.2, seed: 3 });
        let ic: CascadeConfig = toml::from_str("").unwrap();
        assert_eq!(ic, CascadeConfig::default());

        let text = toml::to_string(&TimConfig::default()).unwrap();
        assert_eq!(toml::from_str::<TimConfig>(&text).unwrap(), TimConfig::default());
    }

    #[test]
    fn log_file_name_encodes_run_parameters() {
        let c = Config {
            graph_path: PathBuf::from("data/hep.txt"),
            algorithm: AlgorithmKind::Tim,
            trials: 2,
            seeds: 5,
            seed: 9,
            ..Config::default()
        };
        assert_eq!(c.log_file_name(1234), PathBuf::from("output/hep_tim_2_5_9_1234.log"));
    }
}
