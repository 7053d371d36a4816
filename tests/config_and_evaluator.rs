use std::fs;
use std::io::Write;

use influence::{AlgorithmKind, Config, Direction, Error, Evaluator, Graph, ModelKind};

const GRAPH: &str = "\
# src dst weight
1 2 1.0
2 3 1.0
7 8 0.5
8 9 0.5
9 7 0.5
";

#[test]
fn load_graph_and_config_from_disk_then_run() {
    let dir = tempfile::tempdir().unwrap();
    let graph_path = dir.path().join("toy.txt");
    fs::write(&graph_path, GRAPH).unwrap();

    let out_dir = dir.path().join("out");
    let conf_path = dir.path().join("config.toml");
    let mut f = fs::File::create(&conf_path).unwrap();
    writeln!(f, "outputDir = {:?}", out_dir.to_str().unwrap()).unwrap();
    writeln!(f, "graphPath = {:?}", graph_path.to_str().unwrap()).unwrap();
    writeln!(f, "trials = 2\nalgorithm = \"PMC\"\nseeds = 1\nmodel = \"ic\"\nseed = 4").unwrap();
    drop(f);

    let config = Config::load(&conf_path).unwrap();
    assert_eq!(config.algorithm, AlgorithmKind::Pmc);
    assert_eq!(config.model, ModelKind::IndependentCascade);

    let graph = Graph::load(&config.graph_path).unwrap();
    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.edge_count(), 5);

    let log_path = config.log_file_name(42);
    assert_eq!(log_path, out_dir.join("toy_pmc_2_1_4_42.log"));
    fs::create_dir_all(&config.output_dir).unwrap();
    let file = fs::File::create(&log_path).unwrap();

    let mut evaluator = Evaluator::new(&config, &graph);
    let records = evaluator.run(std::io::BufWriter::new(file)).unwrap();
    assert_eq!(records.len(), 2);
    // The certain chain 1 -> 2 -> 3 is the best first pick.
    assert_eq!(records[0].seeds, vec![graph.index_of(1).unwrap()]);
    assert!(records[0].activated >= 3);
    for pair in records.windows(2) {
        assert!(pair[0].activated <= pair[1].activated);
    }

    let text = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let fields: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0], "1");
    assert_eq!(fields[1], records[0].activated.to_string());
    assert!(fields[2].parse::<f64>().is_ok());
    assert_eq!(fields[3], "[1]");
}

#[test]
fn malformed_inputs_are_load_errors() {
    let dir = tempfile::tempdir().unwrap();

    let bad_graph = dir.path().join("bad.txt");
    fs::write(&bad_graph, "1 2 0.5\n3 x 0.5\n").unwrap();
    assert!(matches!(Graph::load(&bad_graph), Err(Error::Parse { line: 2, .. })));

    let heavy = dir.path().join("heavy.txt");
    fs::write(&heavy, "1 2 1.5\n").unwrap();
    assert!(matches!(Graph::load(&heavy), Err(Error::InvalidWeight { line: 1, .. })));

    assert!(matches!(Graph::load(dir.path().join("missing.txt")), Err(Error::Io(_))));

    let conf = dir.path().join("c.toml");
    fs::write(&conf, "algorithm = \"random\"\n").unwrap();
    assert!(matches!(Config::load(&conf), Err(Error::UnknownAlgorithm(_))));
}

#[test]
fn unweighted_pair_file_is_weighted_by_the_configured_scheme() {
    let dir = tempfile::tempdir().unwrap();
    let graph_path = dir.path().join("pairs.txt");
    // 5 -> 6 appears twice; 6 has in-neighbors {5, 7}, 7 has {6}.
    fs::write(&graph_path, "5 6\n7 6\n5 6\n6 7\n").unwrap();

    let config = Config::from_toml_str(&format!(
        "graphPath = {:?}\nweights = \"random-lt\"\nseed = 3",
        graph_path.to_str().unwrap()
    ))
    .unwrap();
    let graph = config.load_graph().unwrap();
    assert_eq!(graph.edge_count(), 3);
    for v in graph.nodes() {
        let incoming = graph.neighbors(v, Direction::Incoming);
        if !incoming.is_empty() {
            let sum: f64 = incoming.iter().map(|e| e.weight).sum();
            assert!((sum - 1.0).abs() < 1e-12, "node {}: {sum}", graph.label(v));
        }
    }
    let again = config.load_graph().unwrap();
    let weights = |g: &Graph| g.nodes().flat_map(|v| g.neighbors(v, Direction::Outgoing).to_vec()).collect::<Vec<_>>();
    assert_eq!(weights(&graph), weights(&again));
}
