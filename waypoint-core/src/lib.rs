//! Shortest routes through mandatory stops in a weighted graph.
//!
//! [`Graph`] holds the network; [`GraphSolver::shortest_path`] is a Dijkstra search between two nodes;
//! [`find_optimal_circuit`] tries every ordering of the mandatory stops and stitches the cheapest
//! one into a single path.

pub use self::circuit::{find_optimal_circuit, stitch, Circuit, CircuitOptions, DEFAULT_MAX_STOPS};
pub use self::errors::Error;
pub use self::graph::{Graph, GraphBuilder, GraphSolver, Route};
pub use self::numtraits::{IntoOrd, Weight, Zero};
pub use self::permutations::{factorial, Permutations};

mod circuit;
mod dijkstra;
mod errors;
mod frontier;
mod graph;
mod numtraits;
mod permutations;
