//! Dijkstra path search implementation.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::errors::Error;
use crate::frontier::Frontier;
use crate::graph::{Graph, GraphSolver, Route};
use crate::numtraits::Weight;

impl<T, W> GraphSolver<T, W> for Graph<T, W> where T: Clone + Eq + Hash, W: Weight {
    fn contains(&self, node: &T) -> bool {
        Graph::contains(self, node)
    }

    fn shortest_path(&self, from: &T, to: &T) -> Result<Route<T, W>, Error<T>> {
        for node in &[from, to] {
            if !Graph::contains(self, node) {
                return Err(Error::UnknownNode((*node).clone()));
            }
        }

        if from == to {
            return Ok(Route { distance: W::ZERO, path: vec![from.clone()] });
        }

        // Algorithm state
        let mut explored = HashSet::<T>::new();
        let mut frontier = Frontier::<T, W>::new();
        let mut previous = HashMap::<T, T>::new();

        // Last link whose cost could not be represented, such links are left unexplored
        let mut overflow = None;

        // Add the starting point to the frontier, it will be the first node visited
        frontier.push(from.clone(), W::ZERO);

        // Run until we have visited every node in the frontier
        while let Some((id, cost)) = frontier.pop() {
            // When the node with the lowest cost in the frontier is our goal node, we're done.
            if id == *to {
                return reconstruct(&previous, from, id, cost);
            }

            // Add the current node to the explored set
            explored.insert(id.clone());

            // Loop all the neighboring nodes
            for (n_node, n_cost) in self.neighbors(&id)?.iter() {
                if !n_cost.is_admissible() {
                    return Err(Error::NegativeWeight { from: id.clone(), to: n_node.clone() });
                }

                // If we already explored the node - skip it
                if explored.contains(n_node) {
                    continue;
                }

                // Costlier than any representable path, so it never wins over one
                let node_cost = match cost.checked_add(*n_cost) {
                    Some(node_cost) => node_cost,
                    None => {
                        overflow = Some((id.clone(), n_node.clone()));
                        continue;
                    }
                };

                // If the neighboring node is not yet in the frontier, we add it with the correct cost.
                // Otherwise we only update the cost of this node in the frontier when it's below what's currently set.
                let updated = frontier.try_insert_or_decrease_cost(n_node, node_cost);
                if updated {
                    previous.insert(n_node.clone(), id.clone());
                }
            }
        }

        match overflow {
            Some((from, to)) => Err(Error::WeightOverflow { from, to }),
            None => Err(Error::NoPathFound { from: from.clone(), to: to.clone() }),
        }
    }
}

/// Walk the predecessor chain back from `target`, then flip it so the path starts at `source`.
fn reconstruct<T, W>(previous: &HashMap<T, T>, source: &T, target: T, distance: W) -> Result<Route<T, W>, Error<T>>
    where T: Clone + Eq + Hash
{
    let mut rev_path = vec![target];
    while let Some(prev) = rev_path.last().and_then(|cur| previous.get(cur)) {
        rev_path.push(prev.clone());
    }

    if rev_path.last() != Some(source) {
        let target = rev_path.swap_remove(0);
        return Err(Error::NoPathFound { from: source.clone(), to: target });
    }

    rev_path.reverse();
    Ok(Route { distance, path: rev_path })
}
