//! Weighted graph model and path solver traits.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::errors::Error;
use crate::numtraits::Weight;

/// Graph building functions.
pub trait GraphBuilder<T, W> {
    /// Set the outgoing links of `node_tag`, replacing any links it had before.
    fn add_node<I: IntoIterator<Item=(T, W)>>(&mut self, node_tag: T, links: I);
}

/// Path finding functions.
pub trait GraphSolver<T, W> {
    /// Whether `node` is a member of the graph.
    fn contains(&self, node: &T) -> bool;

    /// Find the cheapest path from `from` node to `to` node.
    fn shortest_path(&self, from: &T, to: &T) -> Result<Route<T, W>, Error<T>>;

    /// Find a path from `from` node to `to` node.
    /// Returns empty path if there is none (or the search failed).
    fn path(&self, from: &T, to: &T) -> Vec<T> {
        self.shortest_path(from, to).map(|route| route.path).unwrap_or_default()
    }

    /// Find a reverse path from `to` node to `from` node.
    fn reverse_path(&self, from: &T, to: &T) -> Vec<T> {
        let mut path = self.path(from, to);
        path.reverse();
        path
    }
}

/// A path together with its total weight.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Route<T, W> {
    /// Sum of the edge weights along `path`.
    pub distance: W,

    /// Visited nodes, source first. Never empty.
    pub path: Vec<T>,
}

/// Directed weighted graph.
/// Undirected links are stored as a pair of opposite directed ones.
#[derive(Clone, Debug)]
pub struct Graph<T, W> {
    /// Links node with tag `<T>` to the list of adjacent nodes with corresponding weights `<W>`.
    /// Lists keep insertion order, which makes searches reproducible.
    nodes: HashMap<T, Vec<(T, W)>>,
}

impl<T, W> Default for Graph<T, W> {
    fn default() -> Self {
        Graph {
            nodes: HashMap::new(),
        }
    }
}

impl<T, W> Graph<T, W> {
    /// Create new instance with empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node tags, in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item=&T> {
        self.nodes.keys()
    }
}

impl<T, W> Graph<T, W> where T: Clone + Eq + Hash, W: Weight {
    /// Add a node without links. Existing node is left untouched.
    pub fn ensure_node(&mut self, node: T) {
        self.nodes.entry(node).or_insert_with(Vec::new);
    }

    /// Add or replace the directed link `from -> to`. Missing endpoints are created.
    pub fn add_edge(&mut self, from: T, to: T, weight: W) {
        self.ensure_node(to.clone());
        let links = self.nodes.entry(from).or_insert_with(Vec::new);
        upsert_link(links, to, weight);
    }

    /// Add or replace links in both directions between `a` and `b`.
    pub fn add_undirected_edge(&mut self, a: T, b: T, weight: W) {
        self.add_edge(a.clone(), b.clone(), weight);
        self.add_edge(b, a, weight);
    }

    pub fn contains(&self, node: &T) -> bool {
        self.nodes.contains_key(node)
    }

    /// Outgoing links of `node`.
    pub fn neighbors(&self, node: &T) -> Result<&[(T, W)], Error<T>> {
        self.nodes
            .get(node)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownNode(node.clone()))
    }

    /// Weight of the directed link `from -> to`, if there is one.
    pub fn weight(&self, from: &T, to: &T) -> Option<W> {
        let links = self.nodes.get(from)?;
        links.iter().find(|(n, _)| n == to).map(|&(_, w)| w)
    }

    /// Check graph invariants: every weight is non-negative and every linked node is itself a member.
    pub fn validate(&self) -> Result<(), Error<T>> {
        for (node, links) in self.nodes.iter() {
            for (n_node, n_cost) in links.iter() {
                if !n_cost.is_admissible() {
                    return Err(Error::NegativeWeight { from: node.clone(), to: n_node.clone() });
                }
                if !self.nodes.contains_key(n_node) {
                    return Err(Error::UnknownNode(n_node.clone()));
                }
            }
        }
        Ok(())
    }

    /// A path is valid when it is not empty, never repeats a node twice in a row,
    /// and every pair of consecutive nodes is linked in the direction of travel.
    pub fn is_valid_path(&self, path: &[T]) -> bool {
        match path {
            [] => false,
            [single] => self.contains(single),
            _ => path.windows(2).all(|w| w[0] != w[1] && self.weight(&w[0], &w[1]).is_some()),
        }
    }

    /// Sum of the link weights along `path`, `None` if some link is missing or the sum overflows.
    pub fn path_weight(&self, path: &[T]) -> Option<W> {
        path.windows(2).try_fold(W::ZERO, |acc, w| self.weight(&w[0], &w[1]).and_then(|x| acc.checked_add(x)))
    }
}

impl<T, W> GraphBuilder<T, W> for Graph<T, W> where T: Clone + Eq + Hash, W: Weight {
    fn add_node<I: IntoIterator<Item=(T, W)>>(&mut self, node_tag: T, links: I) {
        let mut new_links = Vec::new();
        for (n_node, n_cost) in links {
            upsert_link(&mut new_links, n_node, n_cost);
        }
        self.nodes.insert(node_tag, new_links);
    }
}

fn upsert_link<T: Eq, W>(links: &mut Vec<(T, W)>, to: T, weight: W) {
    if let Some(link) = links.iter_mut().find(|(n, _)| *n == to) {
        link.1 = weight;
    } else {
        links.push((to, weight));
    }
}
