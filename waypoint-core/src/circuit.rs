//! Cheapest route from start to end through a set of mandatory stops.
//!
//! Every ordering of the stops is tried (brute force), so the stop count is capped
//! by [`CircuitOptions::max_stops`]. A search can also be bounded by a deadline or
//! a cap on evaluated orderings; when either runs out, the best circuit found so far
//! is returned marked as truncated.

use std::fmt::Debug;
use std::hash::Hash;
use std::iter;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::errors::Error;
use crate::graph::{GraphSolver, Route};
use crate::numtraits::Weight;
use crate::permutations::{factorial, Permutations};

/// Stop count limit used by `CircuitOptions::default()`.
pub const DEFAULT_MAX_STOPS: usize = 8;

/// Search policy.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CircuitOptions {
    /// More stops than this is rejected with `Error::TooManyStops`.
    pub max_stops: usize,

    /// Wall clock budget, counted from the start of the call. Segment routing is included.
    pub deadline: Option<Duration>,

    /// Maximum number of stop orderings to evaluate.
    pub max_permutations: Option<u64>,

    /// Evaluate orderings on the rayon thread pool.
    pub parallel: bool,
}

impl Default for CircuitOptions {
    fn default() -> Self {
        CircuitOptions {
            max_stops: DEFAULT_MAX_STOPS,
            deadline: None,
            max_permutations: None,
            parallel: false,
        }
    }
}

/// Winning circuit.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Circuit<T, W> {
    /// Total weight of `path`.
    pub distance: W,

    /// Stitched path from start to end.
    pub path: Vec<T>,

    /// Order in which the mandatory stops are visited.
    pub order: Vec<T>,

    /// Search stopped early, so a cheaper circuit may exist.
    pub truncated: bool,

    /// Number of stop orderings evaluated.
    pub evaluated: u64,
}

impl<T, W> Circuit<T, W> {
    pub fn into_route(self) -> Route<T, W> {
        Route { distance: self.distance, path: self.path }
    }
}

/// Find the cheapest path from `start` to `end` visiting every node in `stops`.
///
/// Stops are expected to be distinct and different from `start` and `end`; this is not checked.
/// With no stops this is exactly `graph.shortest_path(start, end)`.
/// Among orderings of equal total weight the first enumerated one wins.
/// When the total weight of every connected ordering overflows `W`, fails with `Error::WeightOverflow`.
pub fn find_optimal_circuit<G, T, W>(graph: &G, start: &T, end: &T, stops: &[T], options: &CircuitOptions) -> Result<Circuit<T, W>, Error<T>>
    where G: GraphSolver<T, W>, T: Clone + Eq + Hash + Debug + Send + Sync, W: Weight + Send + Sync
{
    for node in iter::once(start).chain(iter::once(end)).chain(stops.iter()) {
        if !graph.contains(node) {
            return Err(Error::UnknownNode(node.clone()));
        }
    }

    if stops.len() > options.max_stops {
        return Err(Error::TooManyStops { count: stops.len(), limit: options.max_stops });
    }

    if stops.is_empty() {
        let route = graph.shortest_path(start, end)?;
        return Ok(Circuit { distance: route.distance, path: route.path, order: Vec::new(), truncated: false, evaluated: 1 });
    }

    debug!(
        "searching circuit {:?} -> {:?} through {} stops ({:?} orderings)",
        start, end, stops.len(), factorial(stops.len())
    );

    let budget = Budget::new(options);
    let table = SegmentTable::build(graph, start, end, stops)?;

    let (best, overflow) = if options.parallel {
        let n = stops.len();
        let partials = (0..n)
            .into_par_iter()
            .map(|first| {
                let rest = (0..n).filter(|&i| i != first).collect();
                table.search(&[first], rest, &budget)
            })
            .collect::<Vec<_>>();
        partials.into_iter().fold((None, None), |(best, overflow), (b, o)| (pick_best(best, b), overflow.or(o)))
    } else {
        table.search(&[], (0..stops.len()).collect(), &budget)
    };

    let evaluated = budget.evaluated();
    let truncated = budget.is_expired();
    if truncated {
        warn!("circuit search truncated after {} orderings", evaluated);
    }

    match best {
        Some((distance, order)) => {
            let path = table.stitch(&order);
            debug!("best circuit {:?} with distance {:?}", path, distance);
            Ok(Circuit {
                distance,
                path,
                order: order.into_iter().map(|i| stops[i].clone()).collect(),
                truncated,
                evaluated,
            })
        }
        None if truncated => Err(Error::SearchTruncated { evaluated }),
        None => {
            let overflow = overflow
                .map(|(from, to)| (table.point(from).clone(), table.point(to).clone()))
                .or_else(|| table.overflow.clone());
            match overflow {
                Some((from, to)) => Err(Error::WeightOverflow { from, to }),
                None => Err(Error::Infeasible),
            }
        }
    }
}

/// Concatenate contiguous segments, dropping each junction node the second time it appears.
pub fn stitch<'a, T, W, I>(segments: I) -> Vec<T>
    where T: 'a + Clone + PartialEq + Debug, W: 'a, I: IntoIterator<Item=&'a Route<T, W>>
{
    let mut path = Vec::<T>::new();
    for segment in segments {
        let skip = if path.is_empty() {
            0
        } else {
            debug_assert_eq!(path.last(), segment.path.first(), "segments are not contiguous");
            1
        };
        path.extend(segment.path.iter().skip(skip).cloned());
    }
    debug_assert!(path.windows(2).all(|w| w[0] != w[1]), "repeated node in stitched path {:?}", path);
    path
}

/// Strict `<`, so on a tie the earlier candidate is kept.
fn pick_best<W: PartialOrd>(best: Option<(W, Vec<usize>)>, candidate: Option<(W, Vec<usize>)>) -> Option<(W, Vec<usize>)> {
    match (best, candidate) {
        (Some(b), Some(c)) => Some(if c.0 < b.0 { c } else { b }),
        (b, c) => b.or(c),
    }
}

/// Shortest paths between every pair of points a circuit can link, computed once per search.
///
/// Stops are points `0..n`, start is point `n`, end is point `n + 1`.
/// Missing entries are unreachable pairs or pairs whose path weight overflows.
struct SegmentTable<T, W> {
    n: usize,
    points: Vec<T>,
    segments: Vec<Option<Route<T, W>>>,
    /// Link reported by the last segment search that overflowed.
    overflow: Option<(T, T)>,
}

impl<T, W> SegmentTable<T, W> where T: Clone + Eq + Debug, W: Weight {
    fn build<G: GraphSolver<T, W>>(graph: &G, start: &T, end: &T, stops: &[T]) -> Result<Self, Error<T>> {
        let n = stops.len();
        let points = stops.iter().chain(iter::once(start)).chain(iter::once(end)).cloned().collect();

        let mut table = SegmentTable { n, points, segments: vec![None; (n + 2) * (n + 2)], overflow: None };
        for from in (0..n).chain(iter::once(n)) {
            for to in (0..n).chain(iter::once(n + 1)) {
                // Start to end directly is never a segment once there is a stop
                if from == to || (from == n && to == n + 1) {
                    continue;
                }
                let segment = match graph.shortest_path(table.point(from), table.point(to)) {
                    Ok(route) => Some(route),
                    Err(Error::NoPathFound { .. }) => None,
                    Err(Error::WeightOverflow { from: a, to: b }) => {
                        table.overflow = Some((a, b));
                        None
                    }
                    Err(e) => return Err(e),
                };
                trace!("segment {:?} -> {:?}: {:?}", table.point(from), table.point(to), segment.as_ref().map(|s| s.distance));
                let idx = table.index(from, to);
                table.segments[idx] = segment;
            }
        }
        Ok(table)
    }

    fn point(&self, i: usize) -> &T {
        &self.points[i]
    }

    fn index(&self, from: usize, to: usize) -> usize {
        from * (self.n + 2) + to
    }

    fn segment(&self, from: usize, to: usize) -> Option<&Route<T, W>> {
        self.segments[self.index(from, to)].as_ref()
    }

    /// Total weight of the circuit, `Ok(None)` if some segment is unreachable.
    /// Fails with the segment whose weight no longer fits into the running total.
    fn total(&self, order: &[usize]) -> Result<Option<W>, (usize, usize)> {
        let mut total = W::ZERO;
        for (from, to) in segment_points(self.n, order) {
            let segment = match self.segment(from, to) {
                Some(segment) => segment,
                None => return Ok(None),
            };
            total = total.checked_add(segment.distance).ok_or((from, to))?;
        }
        Ok(Some(total))
    }

    fn stitch(&self, order: &[usize]) -> Vec<T> {
        let segments = segment_points(self.n, order)
            .filter_map(|(from, to)| self.segment(from, to))
            .collect::<Vec<_>>();
        stitch(segments)
    }

    /// Try every ordering that starts with `prefix` followed by some permutation of `rest`.
    /// Returns the cheapest one and the first segment pair an ordering total overflowed on.
    fn search(&self, prefix: &[usize], rest: Vec<usize>, budget: &Budget) -> (Option<(W, Vec<usize>)>, Option<(usize, usize)>) {
        let mut best: Option<(W, Vec<usize>)> = None;
        let mut overflow = None;
        let mut order = Vec::with_capacity(prefix.len() + rest.len());

        for tail in Permutations::new(rest) {
            if !budget.try_acquire() {
                break;
            }

            order.clear();
            order.extend_from_slice(prefix);
            order.extend(tail);

            match self.total(&order) {
                Ok(Some(total)) => {
                    trace!("ordering {:?}: total {:?}", order, total);
                    if best.as_ref().map_or(true, |(b, _)| total < *b) {
                        best = Some((total, order.clone()));
                    }
                }
                Ok(None) => trace!("ordering {:?}: disconnected", order),
                Err(pair) => {
                    trace!("ordering {:?}: total overflows at segment {:?}", order, pair);
                    overflow = overflow.or(Some(pair));
                }
            }
        }

        (best, overflow)
    }
}

/// Consecutive point pairs of a circuit with the given stop order, `n` being the stop count.
fn segment_points(n: usize, order: &[usize]) -> impl Iterator<Item=(usize, usize)> + '_ {
    let seq = iter::once(n).chain(order.iter().cloned());
    let next = order.iter().cloned().chain(iter::once(n + 1));
    seq.zip(next)
}

/// Evaluation budget shared by all workers of one search.
struct Budget {
    started: Instant,
    deadline: Option<Duration>,
    max_permutations: Option<u64>,
    evaluated: AtomicU64,
    expired: AtomicBool,
}

impl Budget {
    fn new(options: &CircuitOptions) -> Self {
        Budget {
            started: Instant::now(),
            deadline: options.deadline,
            max_permutations: options.max_permutations,
            evaluated: AtomicU64::new(0),
            expired: AtomicBool::new(false),
        }
    }

    /// Take permission to evaluate one more ordering.
    /// Once refused, all later calls are refused too.
    fn try_acquire(&self) -> bool {
        if self.expired.load(Ordering::Relaxed) {
            return false;
        }

        let out_of_time = self.deadline.map_or(false, |d| self.started.elapsed() >= d);
        let max = self.max_permutations;
        let counted = !out_of_time && self
            .evaluated
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| if max.map_or(true, |m| n < m) { Some(n + 1) } else { None })
            .is_ok();

        if !counted {
            self.expired.store(true, Ordering::Relaxed);
        }
        counted
    }

    fn evaluated(&self) -> u64 {
        self.evaluated.load(Ordering::Relaxed)
    }

    fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Relaxed)
    }
}
