use std::collections::HashSet;

use influence::{
    Algorithm, AlgorithmKind, CascadeConfig, Celf, Config, DiscountDegree, Error, Graph, IndependentCascade,
    LinearThreshold, MaxDegree, NodeId, NodeSet, Pmc, PmcConfig, Tim, TimConfig,
};

/// Small deterministic "social" graph: two dense clusters joined by a weak bridge,
/// plus a tail of low-probability edges.
fn clustered() -> Graph {
    let mut edges = Vec::new();
    for a in 0..6u64 {
        for b in 0..6u64 {
            if a != b && (a + b) % 2 == 1 {
                edges.push((a, b, 0.4));
            }
        }
    }
    for a in 10..16u64 {
        edges.push((a, 10 + (a + 1) % 6, 0.6));
        edges.push((a, 10 + (a + 3) % 6, 0.2));
    }
    edges.push((5, 10, 0.05));
    for t in 20..30u64 {
        edges.push((t, t + 1, 0.1));
    }
    Graph::from_edges(edges).unwrap()
}

fn assert_contract(seeds: &[NodeId], activated: &NodeSet, k: usize, what: &str) {
    assert_eq!(seeds.len(), k, "{what}: wrong size");
    let distinct: HashSet<_> = seeds.iter().collect();
    assert_eq!(distinct.len(), k, "{what}: repeated seed in {seeds:?}");
    for &s in seeds {
        assert!(!activated.contains(s), "{what}: picked activated node {s}");
    }
}

#[test]
fn four_node_chain_scenario() {
    // 0 -> 1 -> 2 -> 3, all 0.5
    let g = Graph::from_edges([(0, 1, 0.5), (1, 2, 0.5), (2, 3, 0.5)]).unwrap();
    let none = NodeSet::new();
    let n0 = g.index_of(0).unwrap();
    let n3 = g.index_of(3).unwrap();

    assert_eq!(MaxDegree::new(&g).select(&none, 1).unwrap(), vec![n0]);

    let cfg = CascadeConfig { simulations: 5000, seed: 1 };
    let mut ic = IndependentCascade::new(&g, cfg);
    let s0 = ic.sample(&none, &[n0]);
    let s3 = ic.sample(&none, &[n3]);
    assert!(s0 > s3, "sigma(0) = {s0}, sigma(3) = {s3}");
    assert_eq!(s3, 1.0);

    assert_eq!(Celf::new(&g, cfg).select(&none, 1).unwrap(), vec![n0]);
}

#[test]
fn every_algorithm_honors_the_selection_contract() {
    let g = clustered();
    let activated: NodeSet = [0, 3, 7, 12].into_iter().collect();
    let config = Config { simulations: 30, seed: 5, ..Config::default() };
    for kind in AlgorithmKind::ALL {
        let mut algo = Algorithm::new(kind, &g, &config);
        let seeds = algo.select(&activated, 4).unwrap();
        assert_contract(&seeds, &activated, 4, kind.name());
    }
}

#[test]
fn every_algorithm_rejects_more_seeds_than_eligible_nodes() {
    let g = Graph::from_edges([(0, 1, 0.5), (1, 2, 0.5)]).unwrap();
    let activated: NodeSet = [0].into_iter().collect();
    let config = Config { simulations: 5, ..Config::default() };
    for kind in AlgorithmKind::ALL {
        let mut algo = Algorithm::new(kind, &g, &config);
        let err = algo.select(&activated, 3).unwrap_err();
        assert!(
            matches!(err, Error::InsufficientNodes { requested: 3, available: 2 }),
            "{kind}: {err}"
        );
        // Exactly the eligible count is fine.
        let seeds = algo.select(&activated, 2).unwrap();
        assert_contract(&seeds, &activated, 2, kind.name());
    }
}

#[test]
fn celf_beats_degree_heuristics_when_degree_misleads() {
    // 0 has the most out-edges but they almost never fire; 10 heads a certain chain.
    let g = Graph::from_edges([
        (0, 1, 0.01),
        (0, 2, 0.01),
        (0, 3, 0.01),
        (10, 11, 1.0),
        (11, 12, 1.0),
        (12, 13, 1.0),
        (13, 14, 1.0),
    ])
    .unwrap();
    let none = NodeSet::new();
    let cfg = CascadeConfig { simulations: 200, seed: 2 };

    let celf = Celf::new(&g, cfg).select(&none, 1).unwrap();
    let max = MaxDegree::new(&g).select(&none, 1).unwrap();
    let discount = DiscountDegree::new(&g).select(&none, 1).unwrap();
    assert_eq!(celf, vec![g.index_of(10).unwrap()]);
    assert_eq!(max, vec![g.index_of(0).unwrap()]);

    let mut judge = IndependentCascade::new(&g, CascadeConfig { simulations: 2000, seed: 99 });
    let spread_celf = judge.sample(&none, &celf);
    assert!(spread_celf >= judge.sample(&none, &max));
    assert!(spread_celf >= judge.sample(&none, &discount));
}

#[test]
fn tim_is_deterministic_for_a_fixed_seed() {
    let g = clustered();
    let none = NodeSet::new();
    let cfg = TimConfig { epsilon: 0.3, seed: 17 };
    let a = Tim::new(&g, cfg).select(&none, 3).unwrap();
    let b = Tim::new(&g, cfg).select(&none, 3).unwrap();
    assert_eq!(a, b);
    assert_contract(&a, &none, 3, "tim");
}

#[test]
fn pmc_is_deterministic_and_excludes_activated() {
    let g = clustered();
    let activated: NodeSet = [1, 2].into_iter().collect();
    let cfg = PmcConfig { samples: 40, seed: 3 };
    let a = Pmc::new(&g, cfg).select(&activated, 3).unwrap();
    let b = Pmc::new(&g, cfg).select(&activated, 3).unwrap();
    assert_eq!(a, b);
    assert_contract(&a, &activated, 3, "pmc");
}

#[cfg(feature = "parallel")]
#[test]
fn pmc_selection_is_thread_count_invariant() {
    let g = clustered();
    let none = NodeSet::new();
    let cfg = PmcConfig { samples: 64, seed: 8 };

    let one = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let four = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let a = one.install(|| Pmc::new(&g, cfg).select(&none, 4).unwrap());
    let b = four.install(|| Pmc::new(&g, cfg).select(&none, 4).unwrap());
    assert_eq!(a, b);
}

#[test]
fn linear_threshold_bounds() {
    let g = clustered();
    let mut lt = LinearThreshold::new(&g, 4);
    let all: Vec<NodeId> = g.nodes().collect();
    assert_eq!(lt.diffuse(&all).len(), g.node_count());
    assert!(lt.diffuse(&[]).is_empty());

    // A source with no in-edges is active only when seeded.
    let isolated_source = g.index_of(20).unwrap();
    let seeds = [g.index_of(10).unwrap()];
    for _ in 0..20 {
        let reached = lt.diffuse(&seeds);
        assert!(reached.contains(seeds[0]));
        assert!(!reached.contains(isolated_source));
    }
}
