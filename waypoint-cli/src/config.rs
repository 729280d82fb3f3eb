//! Configuration file: the network and the search policy.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use waypoint_core::{CircuitOptions, Graph, DEFAULT_MAX_STOPS};

const DEFAULT_CONFIG_FILE_NAME: &'static str = ".waypoint.json";

/// Errors loading the configuration or building the network from it.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file (`~/.waypoint.json` by default).
    #[error("File error reading [{0}]: {1}")]
    ConfigFileRead(PathBuf, #[source] io::Error),

    /// Config file is not valid JSON or has unexpected field types.
    #[error("JSON parse error: {0}")]
    BadConfigFile(#[from] serde_json::Error),

    /// Network violates graph invariants.
    #[error("Invalid network: {0}")]
    BadNetwork(#[source] waypoint_core::Error<String>),

    /// Network has no nodes at all.
    #[error("No network configured - use --config to point to a network file")]
    EmptyNetwork,

    /// Start or end node is not set either in the file or on the command line.
    #[error("The {0} node is not specified")]
    MissingEndpoint(&'static str),
}

/// Network and search options. Can be loaded from a config file.
#[derive(Clone, Default, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Links are one-way. By default every edge is usable in both directions.
    #[serde(default)]
    pub directed: bool,

    /// Nodes without any links.
    #[serde(default)]
    pub nodes: Vec<String>,

    /// Links as `[from, to, weight]` triples.
    #[serde(default)]
    pub edges: Vec<(String, String, f64)>,

    pub start: Option<String>,

    pub end: Option<String>,

    /// Mandatory stops.
    #[serde(default)]
    pub stops: Vec<String>,

    pub max_stops: Option<usize>,

    pub deadline_ms: Option<u64>,

    pub max_permutations: Option<u64>,

    #[serde(default)]
    pub parallel: bool,
}

impl Config {
    /// Load the config from `path`, or from the default location if no path given.
    /// Missing default config file is not an error, the default (empty) config is used then.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::read_config_file(path);
        }

        if let Some(path) = Self::default_config_file_location() {
            if let Some(config) = Self::read_optional_config_file(&path)? {
                debug!("Using config file [{}]", path.display());
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Build and validate the network.
    pub fn graph(&self) -> Result<Graph<String, f64>, ConfigError> {
        let mut g = Graph::new();
        for node in self.nodes.iter() {
            g.ensure_node(node.clone());
        }
        for (from, to, weight) in self.edges.iter() {
            if self.directed {
                g.add_edge(from.clone(), to.clone(), *weight);
            } else {
                g.add_undirected_edge(from.clone(), to.clone(), *weight);
            }
        }

        if g.is_empty() {
            return Err(ConfigError::EmptyNetwork);
        }
        g.validate().map_err(ConfigError::BadNetwork)?;

        debug!("Loaded network with {} nodes and {} edges", g.len(), self.edges.len());
        Ok(g)
    }

    /// Start and end nodes.
    pub fn endpoints(&self) -> Result<(String, String), ConfigError> {
        let start = self.start.clone().ok_or(ConfigError::MissingEndpoint("start"))?;
        let end = self.end.clone().ok_or(ConfigError::MissingEndpoint("end"))?;
        Ok((start, end))
    }

    pub fn circuit_options(&self) -> CircuitOptions {
        CircuitOptions {
            max_stops: self.max_stops.unwrap_or(DEFAULT_MAX_STOPS),
            deadline: self.deadline_ms.map(Duration::from_millis),
            max_permutations: self.max_permutations,
            parallel: self.parallel,
        }
    }

    fn default_config_file_location() -> Option<PathBuf> {
        let mut path = dirs::home_dir()?;
        path.push(DEFAULT_CONFIG_FILE_NAME);
        Some(path)
    }

    fn parse_config(json: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(json).map_err(ConfigError::BadConfigFile)
    }

    fn read_config_file(file_path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read(file_path).map_err(|e| ConfigError::ConfigFileRead(file_path.to_owned(), e))?;
        Self::parse_config(&json)
    }

    fn read_optional_config_file(file_path: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::read_config_file(file_path) {
            Ok(conf) => Ok(Some(conf)),
            Err(ConfigError::ConfigFileRead(_, err)) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use waypoint_core::{find_optimal_circuit, GraphSolver};

    use super::{Config, ConfigError};

    const DELIVERY_NETWORK: &str = include_str!("../../demos/delivery_network.json");

    fn c(json: &str) -> Config {
        Config::parse_config(json.as_bytes()).expect("bad test config")
    }

    #[test]
    fn test_parse_config() {
        let s = |s: &str| -> Option<String> { Some(s.to_string()) };

        assert_eq!(c(r#"{}"#), Config::default());
        assert_eq!(c(r#"{ "unknown": "foo" }"#), Config::default());
        assert_eq!(
            c(r#"{ "start": "A", "end": "B", "stops": ["C"], "maxStops": 3, "deadlineMs": 250, "parallel": true }"#),
            Config {
                start: s("A"),
                end: s("B"),
                stops: vec!["C".to_string()],
                max_stops: Some(3),
                deadline_ms: Some(250),
                parallel: true,
                ..Config::default()
            }
        );
        assert!(matches!(Config::parse_config(br#"{ "edges": [["A", "B"]] }"#), Err(ConfigError::BadConfigFile(_))));
    }

    #[test]
    fn test_circuit_options() {
        let opts = c(r#"{}"#).circuit_options();
        assert_eq!(opts, Default::default());

        let opts = c(r#"{ "maxStops": 4, "deadlineMs": 1500, "maxPermutations": 10 }"#).circuit_options();
        assert_eq!(opts.max_stops, 4);
        assert_eq!(opts.deadline, Some(Duration::from_millis(1500)));
        assert_eq!(opts.max_permutations, Some(10));
        assert!(!opts.parallel);
    }

    #[test]
    fn test_graph() {
        let g = c(r#"{ "nodes": ["Lonely"], "edges": [["A", "B", 2.5]] }"#).graph().expect("graph");
        assert_eq!(g.len(), 3);
        assert_eq!(g.weight(&"A".to_string(), &"B".to_string()), Some(2.5));
        assert_eq!(g.weight(&"B".to_string(), &"A".to_string()), Some(2.5));

        let g = c(r#"{ "directed": true, "edges": [["A", "B", 2.5]] }"#).graph().expect("graph");
        assert_eq!(g.weight(&"B".to_string(), &"A".to_string()), None);

        assert!(matches!(c(r#"{}"#).graph(), Err(ConfigError::EmptyNetwork)));
        assert!(matches!(
            c(r#"{ "edges": [["A", "B", -1.0]] }"#).graph(),
            Err(ConfigError::BadNetwork(waypoint_core::Error::NegativeWeight { .. }))
        ));
    }

    #[test]
    fn test_endpoints() {
        assert!(matches!(c(r#"{ "end": "B" }"#).endpoints(), Err(ConfigError::MissingEndpoint("start"))));
        assert!(matches!(c(r#"{ "start": "A" }"#).endpoints(), Err(ConfigError::MissingEndpoint("end"))));
        assert_eq!(c(r#"{ "start": "A", "end": "B" }"#).endpoints().expect("endpoints"), ("A".to_string(), "B".to_string()));
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/waypoint/config.json");
        assert!(matches!(Config::load(Some(path)), Err(ConfigError::ConfigFileRead(..))));
        assert!(matches!(Config::read_optional_config_file(path), Ok(None)));
    }

    #[test]
    fn test_delivery_network_file() {
        let config = c(DELIVERY_NETWORK);
        let g = config.graph().expect("graph");
        let (start, end) = config.endpoints().expect("endpoints");
        assert_eq!(g.len(), 9);

        let circuit = find_optimal_circuit(&g, &start, &end, &config.stops, &config.circuit_options()).expect("circuit");
        assert_eq!(circuit.distance, 23.0);
        assert_eq!(circuit.path, vec!["Warehouse", "A", "C", "D", "F", "G", "Delivery_Hub"]);
        assert_eq!(g.shortest_path(&start, &"F".to_string()).map(|r| r.distance).ok(), Some(13.0));
    }
}
