//! `influence` binary: run repeated seed-selection / diffusion rounds over one graph.
//!
//! ```bash
//! influence --conf config.toml
//! influence --graph data/hep.txt --algorithm pmc --model ic --seeds 10 --trials 5
//! influence --graph data/pairs.txt --weights wc --algorithm tim
//! RUST_LOG=influence=debug influence --log run.log
//! ```
//!
//! Settings come from the TOML file (if present) and are overridden by flags. The round
//! log is written to `<outputDir>/<graph>_<algorithm>_<trials>_<seeds>_<seed>_<ms>.log`.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use influence::{Config, Evaluator};

#[derive(Parser, Debug)]
#[command(name = "influence", version, about = "Influence maximization: seed selection and diffusion")]
struct Cli {
    /// Config file location.
    #[arg(long, default_value = "config.toml")]
    conf: PathBuf,

    /// Path for output files.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path of graph file.
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Seed of the PRNGs.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rounds.
    #[arg(long)]
    trials: Option<usize>,

    /// Seed-selection algorithm: celf, tim, maxdegree, discountdegree, pmc.
    #[arg(long)]
    algorithm: Option<String>,

    /// Number of seeds in each round.
    #[arg(long)]
    seeds: Option<usize>,

    /// Diffusion model: ic, lt.
    #[arg(long)]
    model: Option<String>,

    /// Independent Cascade runs per spread estimate.
    #[arg(long)]
    simulations: Option<usize>,

    /// Treat the graph file as `src dst` pairs weighted by this scheme:
    /// wc, trivalency, uniform-lt, random-lt, constant:<p>.
    #[arg(long)]
    weights: Option<String>,

    /// Write diagnostics to this file instead of stderr.
    #[arg(long)]
    log: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> influence::Result<Config> {
        let mut config = if self.conf.exists() {
            Config::load(&self.conf)?
        } else {
            tracing::warn!(path = %self.conf.display(), "config file not found; using defaults");
            Config::default()
        };
        if let Some(v) = &self.output {
            config.output_dir = v.clone();
        }
        if let Some(v) = &self.graph {
            config.graph_path = v.clone();
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.trials {
            config.trials = v;
        }
        if let Some(v) = &self.algorithm {
            config.algorithm = v.parse()?;
        }
        if let Some(v) = self.seeds {
            config.seeds = v;
        }
        if let Some(v) = &self.model {
            config.model = v.parse()?;
        }
        if let Some(v) = self.simulations {
            config.simulations = v;
        }
        if let Some(v) = &self.weights {
            config.weights = Some(v.parse()?);
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(log: Option<&PathBuf>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("influence=info"));
    match log {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn run(cli: &Cli) -> influence::Result<()> {
    let config = cli.config()?;
    let graph = config.load_graph()?;

    let stamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    let path = config.log_file_name(stamp);
    fs::create_dir_all(&config.output_dir)?;
    tracing::info!(output = %path.display(), "writing round log");

    let out = BufWriter::new(File::create(&path)?);
    let mut evaluator = Evaluator::new(&config, &graph);
    evaluator.run(out)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log.as_ref()) {
        eprintln!("cannot open log file: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
