//! Frontier for the Dijkstra algorithm.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

use super::numtraits::IntoOrd;

/// Frontier for the Dijkstra algorithm.
/// Internally uses a binary heap with lazily invalidated entries and a hashmap-based index.
///
/// Among entries with equal cost the one inserted first is extracted first.
pub(crate) struct Frontier<T, W: IntoOrd> {
    /// Max-heap over reversed keys, so the cheapest entry is on top.
    heap: BinaryHeap<Entry<T, W>>,

    /// Links node tag `<T>` to its current cost and the sequence number of its live heap entry.
    /// Heap entries with a different sequence number are stale.
    index: HashMap<T, (W, u64)>,

    /// Insertion counter, used for invalidation and tie-breaking.
    seq: u64,
}

struct Entry<T, W: IntoOrd> {
    key: (Reverse<W::Output>, Reverse<u64>),
    tag: T,
    cost: W,
}

impl<T, W: IntoOrd> PartialEq for Entry<T, W> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T, W: IntoOrd> Eq for Entry<T, W> {}

impl<T, W: IntoOrd> PartialOrd for Entry<T, W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, W: IntoOrd> Ord for Entry<T, W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<T, W> Frontier<T, W> where T: Clone + Eq + Hash, W: Copy + PartialOrd + IntoOrd {
    /// Create new empty instance.
    pub fn new() -> Frontier<T, W> {
        Frontier {
            heap: BinaryHeap::new(),
            index: HashMap::new(),
            seq: 0,
        }
    }

    /// Insert a node with associated cost into the priority queue.
    /// Replaces any cost previously associated with this node.
    pub fn push(&mut self, tag: T, cost: W) {
        let seq = self.seq;
        self.seq += 1;
        self.index.insert(tag.clone(), (cost, seq));
        self.heap.push(Entry {
            key: (Reverse(cost.into_ord()), Reverse(seq)),
            tag,
            cost,
        });
    }

    /// Extract node with the least cost from the queue.
    pub fn pop(&mut self) -> Option<(T, W)> {
        while let Some(Entry { key: (_, Reverse(seq)), tag, cost }) = self.heap.pop() {
            let is_live = matches!(self.index.get(&tag), Some(&(_, live_seq)) if live_seq == seq);
            if is_live {
                self.index.remove(&tag);
                return Some((tag, cost));
            }
        }
        None
    }

    /// Insert a node if it is not in the queue yet,
    /// otherwise update associated cost if the new cost is less that existing.
    /// Returns `true` if the node was either inserted or updated,
    /// otherwise (node existed and current cost is less or equal to the new one) `false`.
    pub fn try_insert_or_decrease_cost(&mut self, tag: &T, new_cost: W) -> bool {
        if let Some(&(cost, _)) = self.index.get(tag) {
            if new_cost < cost {
                self.push(tag.clone(), new_cost);
                true
            } else {
                false
            }
        } else {
            self.push(tag.clone(), new_cost);
            true
        }
    }

    /// Number of live (not yet extracted) nodes.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.index.len()
    }
}

#[test]
fn test_push_pop() {
    let mut f = Frontier::new();
    assert_eq!(f.pop(), None);

    f.push("N", 1.0);
    assert_eq!(f.pop(), Some(("N", 1.0)));
    assert_eq!(f.pop(), None);

    f.push("A", 1.0);
    f.push("B", 2.0);
    assert_eq!(f.pop(), Some(("A", 1.0)));
    assert_eq!(f.pop(), Some(("B", 2.0)));
    assert_eq!(f.pop(), None);

    f.push("X", 2.0);
    f.push("Y", 1.0);
    assert_eq!(f.pop(), Some(("Y", 1.0)));
    assert_eq!(f.pop(), Some(("X", 2.0)));
    assert_eq!(f.pop(), None);
}

#[test]
fn test_decrease_cost() {
    let mut f = Frontier::new();
    assert_eq!(f.pop(), None);

    assert_eq!(f.try_insert_or_decrease_cost(&"A", 1.0), true);
    assert_eq!(f.pop(), Some(("A", 1.0)));
    assert_eq!(f.pop(), None);

    f.push("B", 2.0);
    assert_eq!(f.try_insert_or_decrease_cost(&"A", 1.0), true);
    assert_eq!(f.pop(), Some(("A", 1.0)));
    assert_eq!(f.pop(), Some(("B", 2.0)));
    assert_eq!(f.pop(), None);

    f.push("X", 1.0);
    assert_eq!(f.try_insert_or_decrease_cost(&"X", 2.0), false);
    assert_eq!(f.try_insert_or_decrease_cost(&"X", 1.0), false);
    assert_eq!(f.pop(), Some(("X", 1.0)));
    assert_eq!(f.pop(), None);

    f.push("X", 1.0);
    f.push("Y", 3.0);
    assert_eq!(f.try_insert_or_decrease_cost(&"Y", 2.0), true);
    assert_eq!(f.pop(), Some(("X", 1.0)));
    assert_eq!(f.pop(), Some(("Y", 2.0)));
    assert_eq!(f.pop(), None);

    f.push("X", 2.0);
    f.push("Y", 3.0);
    assert_eq!(f.try_insert_or_decrease_cost(&"Y", 1.0), true);
    assert_eq!(f.pop(), Some(("Y", 1.0)));
    assert_eq!(f.pop(), Some(("X", 2.0)));
    assert_eq!(f.pop(), None);
}

#[test]
fn test_stale_entries_are_skipped() {
    let mut f = Frontier::new();
    f.push("A", 5_u32);
    f.try_insert_or_decrease_cost(&"A", 3);
    f.try_insert_or_decrease_cost(&"A", 1);
    assert_eq!(f.len(), 1);
    assert_eq!(f.pop(), Some(("A", 1)));
    // The two superseded heap entries for "A" must not resurface
    assert_eq!(f.pop(), None);
    assert_eq!(f.len(), 0);
}

#[test]
fn test_equal_cost_earliest_first() {
    let mut f = Frontier::new();
    f.push("Z", 4_u32);
    f.push("M", 4);
    f.push("A", 4);
    assert_eq!(f.pop(), Some(("Z", 4)));
    assert_eq!(f.pop(), Some(("M", 4)));
    assert_eq!(f.pop(), Some(("A", 4)));
}
