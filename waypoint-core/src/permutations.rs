//! Lazy permutation generator.

/// Iterator over all orderings of a sequence, produced one at a time by Heap's algorithm.
///
/// The first ordering is the input itself. For an empty input exactly one (empty) ordering is produced.
/// Enumeration order is deterministic for a given input order, so a generator built again from the same
/// input repeats it. Cloning forks the enumeration at the current position.
#[derive(Clone, Debug)]
pub struct Permutations<T> {
    items: Vec<T>,
    /// Per-level swap counters of the iterative algorithm.
    counters: Vec<usize>,
    /// Current level.
    level: usize,
    started: bool,
}

impl<T: Clone> Permutations<T> {
    pub fn new(items: Vec<T>) -> Self {
        let n = items.len();
        Permutations {
            items,
            counters: vec![0; n],
            level: 1,
            started: false,
        }
    }

    /// Total number of orderings this generator produces from the start, `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        factorial(self.items.len())
    }
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some(self.items.clone());
        }

        let n = self.items.len();
        while self.level < n {
            let i = self.level;
            if self.counters[i] < i {
                if i % 2 == 0 {
                    self.items.swap(0, i);
                } else {
                    self.items.swap(self.counters[i], i);
                }
                self.counters[i] += 1;
                self.level = 1;
                return Some(self.items.clone());
            }
            self.counters[i] = 0;
            self.level += 1;
        }

        None
    }
}

/// `n!`, or `None` if it does not fit into `u64`.
pub fn factorial(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1_u64, |acc, k| acc.checked_mul(k))
}
