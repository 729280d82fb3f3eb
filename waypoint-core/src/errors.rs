//! Path search errors.

use thiserror::Error;

/// Error type for all path search and circuit operations.
/// `T` is the node tag type.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum Error<T> {
    /// Referenced node is not a member of the graph.
    #[error("Unknown node {0:?}")]
    UnknownNode(T),

    /// Graph has a negative (or `NaN`) weight on the edge `from -> to`.
    #[error("Negative weight on edge {from:?} -> {to:?}")]
    NegativeWeight { from: T, to: T },

    /// Every path to the target overflows the weight type.
    /// `from -> to` is the link, or the circuit segment, at which the sum overflowed.
    #[error("Path weight overflows at {from:?} -> {to:?}")]
    WeightOverflow { from: T, to: T },

    /// Target is unreachable from the source.
    #[error("Path not found between {from:?} and {to:?}")]
    NoPathFound { from: T, to: T },

    /// No ordering of the mandatory stops yields a connected circuit.
    #[error("No ordering of mandatory stops yields a connected circuit")]
    Infeasible,

    /// Stop count is above the configured limit.
    #[error("Too many mandatory stops: {count} (limit is {limit})")]
    TooManyStops { count: usize, limit: usize },

    /// Search budget expired before any feasible circuit was found.
    #[error("Search truncated after {evaluated} orderings without a feasible circuit")]
    SearchTruncated { evaluated: u64 },
}

#[test]
fn test_error_messages() {
    assert_eq!(Error::UnknownNode("X").to_string(), r#"Unknown node "X""#);
    assert_eq!(
        Error::NegativeWeight { from: "A", to: "B" }.to_string(),
        r#"Negative weight on edge "A" -> "B""#
    );
    assert_eq!(
        Error::WeightOverflow { from: "B", to: "C" }.to_string(),
        r#"Path weight overflows at "B" -> "C""#
    );
    assert_eq!(
        Error::<&str>::TooManyStops { count: 12, limit: 8 }.to_string(),
        "Too many mandatory stops: 12 (limit is 8)"
    );
}
