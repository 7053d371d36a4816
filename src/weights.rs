//! Edge-probability assignment for unweighted edge lists.
//!
//! Public datasets usually ship as bare `src dst` pairs. The standard influence-maximization
//! weightings are:
//!
//! | Scheme | Weight of `u -> v` |
//! |---|---|
//! | [`WeightScheme::Constant`] | fixed `p` (IC) |
//! | [`WeightScheme::WeightedCascade`] | `1 / in_degree(v)` (IC) |
//! | [`WeightScheme::Trivalency`] | uniform draw from a small set, default `{0.1, 0.01, 0.001}` (IC) |
//! | [`WeightScheme::UniformThreshold`] | `1 / in_degree(v)` (LT; same numbers as weighted cascade) |
//! | [`WeightScheme::RandomThreshold`] | uniform draws normalized so each node's in-weights sum to 1 (LT) |
//!
//! Pairs are deduplicated first (first occurrence wins), so in-degrees count distinct
//! in-neighbors.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Trivalency default probabilities.
pub const TRIVALENCY: [f64; 3] = [0.1, 0.01, 0.001];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WeightScheme {
    Constant(f64),
    WeightedCascade,
    Trivalency(Vec<f64>),
    UniformThreshold,
    RandomThreshold,
}

impl WeightScheme {
    pub fn trivalency() -> Self {
        Self::Trivalency(TRIVALENCY.to_vec())
    }

    fn validate(&self) -> Result<()> {
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        match self {
            Self::Constant(p) if !in_unit(*p) => {
                Err(Error::InvalidParameter(format!("constant probability {p} is outside [0, 1]")))
            }
            Self::Trivalency(ps) if ps.is_empty() => {
                Err(Error::InvalidParameter("trivalency needs at least one probability".into()))
            }
            Self::Trivalency(ps) => match ps.iter().find(|&&p| !in_unit(p)) {
                Some(p) => Err(Error::InvalidParameter(format!("trivalency probability {p} is outside [0, 1]"))),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Weight every pair. `pairs` should already be deduplicated (see [`dedup_pairs`]).
    pub fn assign<R: Rng + ?Sized>(&self, pairs: &[(u64, u64)], rng: &mut R) -> Result<Vec<(u64, u64, f64)>> {
        self.validate()?;
        let weights: Vec<f64> = match self {
            Self::Constant(p) => vec![*p; pairs.len()],
            Self::Trivalency(ps) => pairs.iter().map(|_| ps[rng.random_range(0..ps.len())]).collect(),
            Self::WeightedCascade | Self::UniformThreshold => {
                let indeg = in_degrees(pairs);
                pairs.iter().map(|(_, v)| 1.0 / indeg[v] as f64).collect()
            }
            Self::RandomThreshold => {
                let raw: Vec<f64> = pairs.iter().map(|_| rng.random::<f64>()).collect();
                let mut sums: HashMap<u64, f64> = HashMap::new();
                for (&(_, v), &w) in pairs.iter().zip(&raw) {
                    *sums.entry(v).or_default() += w;
                }
                let indeg = in_degrees(pairs);
                pairs
                    .iter()
                    .zip(&raw)
                    .map(|(&(_, v), &w)| match sums[&v] {
                        // Every draw came up zero: fall back to equal shares.
                        s if s <= 0.0 => 1.0 / indeg[&v] as f64,
                        s => w / s,
                    })
                    .collect()
            }
        };
        Ok(pairs.iter().zip(weights).map(|(&(u, v), w)| (u, v, w)).collect())
    }
}

fn in_degrees(pairs: &[(u64, u64)]) -> HashMap<u64, usize> {
    let mut indeg = HashMap::new();
    for &(_, v) in pairs {
        *indeg.entry(v).or_insert(0usize) += 1;
    }
    indeg
}

impl FromStr for WeightScheme {
    type Err = Error;

    /// `wc`, `trivalency`, `uniform-lt`, `random-lt`, or `constant:<p>`.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let scheme = match lower.as_str() {
            "wc" | "weighted-cascade" => Self::WeightedCascade,
            "tv" | "trivalency" => Self::trivalency(),
            "uniform-lt" => Self::UniformThreshold,
            "random-lt" => Self::RandomThreshold,
            other if other.starts_with("trivalency:") => {
                let list = &other["trivalency:".len()..];
                let ps = list
                    .split(',')
                    .map(|p| p.trim().parse::<f64>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| Error::InvalidParameter(format!("trivalency list {list:?}: {e}")))?;
                Self::Trivalency(ps)
            }
            other => {
                let p = other
                    .strip_prefix("constant:")
                    .and_then(|p| p.parse::<f64>().ok())
                    .ok_or_else(|| Error::InvalidParameter(format!("unknown weight scheme: {s}")))?;
                Self::Constant(p)
            }
        };
        scheme.validate()?;
        Ok(scheme)
    }
}

impl TryFrom<String> for WeightScheme {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<WeightScheme> for String {
    fn from(scheme: WeightScheme) -> Self {
        scheme.to_string()
    }
}

impl fmt::Display for WeightScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(p) => write!(f, "constant:{p}"),
            Self::WeightedCascade => f.write_str("wc"),
            Self::Trivalency(ps) if ps[..] == TRIVALENCY[..] => f.write_str("trivalency"),
            Self::Trivalency(ps) => {
                let list: Vec<String> = ps.iter().map(f64::to_string).collect();
                write!(f, "trivalency:{}", list.join(","))
            }
            Self::UniformThreshold => f.write_str("uniform-lt"),
            Self::RandomThreshold => f.write_str("random-lt"),
        }
    }
}

/// Drop repeated `(src, dst)` pairs, keeping first occurrences in order.
pub fn dedup_pairs<I>(pairs: I) -> Vec<(u64, u64)>
where
    I: IntoIterator<Item = (u64, u64)>,
{
    let mut seen = HashSet::new();
    pairs.into_iter().filter(|p| seen.insert(*p)).collect()
}

/// Read `src dst [ignored...]` lines. Blank lines and `#` comments are skipped.
pub fn read_pairs<R: BufRead>(reader: R) -> Result<Vec<(u64, u64)>> {
    let mut pairs = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let mut id = || -> Result<u64> {
            let s = fields.next().ok_or_else(|| Error::Parse {
                line: i + 1,
                message: "expected `src dst`".into(),
            })?;
            s.parse::<u64>().map_err(|e| Error::Parse { line: i + 1, message: format!("node id {s:?}: {e}") })
        };
        let u = id()?;
        let v = id()?;
        pairs.push((u, v));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // 1 -> 3, 2 -> 3, 4 -> 3, 3 -> 1, 1 -> 2
    fn pairs() -> Vec<(u64, u64)> {
        vec![(1, 3), (2, 3), (4, 3), (3, 1), (1, 2)]
    }

    fn in_sums(edges: &[(u64, u64, f64)]) -> HashMap<u64, f64> {
        let mut sums = HashMap::new();
        for &(_, v, w) in edges {
            *sums.entry(v).or_insert(0.0) += w;
        }
        sums
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(dedup_pairs([(1, 2), (2, 1), (1, 2), (3, 3), (2, 1)]), vec![(1, 2), (2, 1), (3, 3)]);
    }

    #[test]
    fn weighted_cascade_in_weights_sum_to_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let edges = WeightScheme::WeightedCascade.assign(&pairs(), &mut rng).unwrap();
        assert_eq!(edges[0], (1, 3, 1.0 / 3.0));
        for (v, s) in in_sums(&edges) {
            assert!((s - 1.0).abs() < 1e-12, "node {v}: {s}");
        }
        let uniform = WeightScheme::UniformThreshold.assign(&pairs(), &mut rng).unwrap();
        assert_eq!(uniform, edges);
    }

    #[test]
    fn random_threshold_normalizes_per_target_and_is_seeded() {
        let run = |seed| WeightScheme::RandomThreshold.assign(&pairs(), &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let a = run(7);
        for (v, s) in in_sums(&a) {
            assert!((s - 1.0).abs() < 1e-12, "node {v}: {s}");
        }
        assert!(a.iter().all(|&(_, _, w)| (0.0..=1.0).contains(&w)));
        assert_eq!(a, run(7));
        assert_ne!(a, run(8));
    }

    #[test]
    fn trivalency_draws_only_from_its_set() {
        let many: Vec<(u64, u64)> = (0..300).map(|i| (i, i + 1)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let edges = WeightScheme::trivalency().assign(&many, &mut rng).unwrap();
        let mut seen = HashSet::new();
        for &(_, _, w) in &edges {
            assert!(TRIVALENCY.contains(&w), "{w}");
            seen.insert(w.to_bits());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn constant_and_invalid_parameters() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let edges = WeightScheme::Constant(0.05).assign(&pairs(), &mut rng).unwrap();
        assert!(edges.iter().all(|&(_, _, w)| w == 0.05));

        for bad in [WeightScheme::Constant(1.5), WeightScheme::Constant(f64::NAN), WeightScheme::Trivalency(vec![])] {
            assert!(matches!(bad.assign(&pairs(), &mut rng), Err(Error::InvalidParameter(_))));
        }
    }

    #[test]
    fn names_parse_and_display() {
        assert_eq!("WC".parse::<WeightScheme>().unwrap(), WeightScheme::WeightedCascade);
        assert_eq!("trivalency".parse::<WeightScheme>().unwrap(), WeightScheme::trivalency());
        assert_eq!("constant:0.1".parse::<WeightScheme>().unwrap(), WeightScheme::Constant(0.1));
        assert_eq!(WeightScheme::RandomThreshold.to_string(), "random-lt");
        let custom: WeightScheme = "trivalency:0.5, 0.05".parse().unwrap();
        assert_eq!(custom, WeightScheme::Trivalency(vec![0.5, 0.05]));
        assert_eq!(custom.to_string().parse::<WeightScheme>().unwrap(), custom);
        assert!("trivalency:0.5,x".parse::<WeightScheme>().is_err());
        assert!("constant:2".parse::<WeightScheme>().is_err());
        assert!("heavy".parse::<WeightScheme>().is_err());
    }

    #[test]
    fn read_pairs_ignores_extra_columns_and_comments() {
        let txt = "# header\n1 2\n\n2\t3\t0.7\n";
        assert_eq!(read_pairs(txt.as_bytes()).unwrap(), vec![(1, 2), (2, 3)]);
        assert!(matches!(read_pairs("1\n".as_bytes()), Err(Error::Parse { line: 1, .. })));
    }
}
