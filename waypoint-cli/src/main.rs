//! Route planner: cheapest path from start to end visiting all mandatory stops.

use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;
use log::info;

use waypoint_core::find_optimal_circuit;

use crate::config::Config;

mod config;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let opts: Opts = Opts::parse();

    let mut config = Config::load(opts.config.as_deref())?;
    opts.apply_to(&mut config);

    let graph = config.graph()?;
    let (start, end) = config.endpoints()?;

    let circuit = find_optimal_circuit(&graph, &start, &end, &config.stops, &config.circuit_options())?;
    if circuit.truncated {
        info!("Search budget exhausted after {} orderings, the route may not be optimal", circuit.evaluated);
    }

    println!("{}", serde_json::to_string(&circuit)?);
    Ok(())
}

/// Find the cheapest route from start to end through all mandatory stops.
#[derive(Parser, Debug)]
#[clap(version, author = "The waypoint developers")]
struct Opts {
    /// Network config file path (default `~/.waypoint.json`)
    #[clap(long)]
    config: Option<PathBuf>,

    /// Start node
    #[clap(long)]
    start: Option<String>,

    /// End node
    #[clap(long)]
    end: Option<String>,

    /// Mandatory stop, may be repeated. Replaces the stops from the config file
    #[clap(long = "stop")]
    stops: Vec<String>,

    /// Maximum number of mandatory stops accepted
    #[clap(long)]
    max_stops: Option<usize>,

    /// Search time budget in milliseconds
    #[clap(long)]
    deadline_ms: Option<u64>,

    /// Maximum number of stop orderings to evaluate
    #[clap(long)]
    max_permutations: Option<u64>,

    /// Evaluate stop orderings on all CPU cores
    #[clap(long)]
    parallel: bool,
}

impl Opts {
    /// Command line values take precedence over the config file.
    fn apply_to(&self, config: &mut Config) {
        if self.start.is_some() {
            config.start = self.start.clone();
        }
        if self.end.is_some() {
            config.end = self.end.clone();
        }
        if !self.stops.is_empty() {
            config.stops = self.stops.clone();
        }
        if self.max_stops.is_some() {
            config.max_stops = self.max_stops;
        }
        if self.deadline_ms.is_some() {
            config.deadline_ms = self.deadline_ms;
        }
        if self.max_permutations.is_some() {
            config.max_permutations = self.max_permutations;
        }
        config.parallel |= self.parallel;
    }
}

#[test]
fn test_apply_to() {
    let s = |s: &str| -> Option<String> { Some(s.to_string()) };
    let opts = |args: &[&str]| Opts::parse_from(std::iter::once("waypoint").chain(args.iter().cloned()));

    let base = Config {
        start: s("Warehouse"),
        end: s("Delivery_Hub"),
        stops: vec!["C".to_string()],
        max_stops: Some(4),
        ..Config::default()
    };

    let mut config = base.clone();
    opts(&[]).apply_to(&mut config);
    assert_eq!(config, base);

    let mut config = base.clone();
    opts(&["--start", "A", "--stop", "D", "--stop", "F", "--max-permutations", "10", "--parallel"]).apply_to(&mut config);
    assert_eq!(
        config,
        Config {
            start: s("A"),
            stops: vec!["D".to_string(), "F".to_string()],
            max_permutations: Some(10),
            parallel: true,
            ..base.clone()
        }
    );

    let mut config = base.clone();
    opts(&["--end", "G", "--max-stops", "2", "--deadline-ms", "50"]).apply_to(&mut config);
    assert_eq!(config.end, s("G"));
    assert_eq!(config.max_stops, Some(2));
    assert_eq!(config.deadline_ms, Some(50));
    assert_eq!(config.stops, base.stops);
}
