//! Error types for tree construction and queries.

use thiserror::Error;

/// Errors raised while building a tree. A failed build never yields a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// No points were supplied.
    #[error("cannot build a tree from zero points")]
    Empty,

    /// The coordinate sequences do not pair up.
    #[error("coordinate length mismatch: {xs} x-values, {ys} y-values")]
    LengthMismatch {
        /// Number of x-values.
        xs: usize,
        /// Number of y-values.
        ys: usize,
    },

    /// An input item has a NaN or infinite coordinate.
    #[error("non-finite coordinate at index {index}")]
    NonFinite {
        /// Position of the offending item in the input.
        index: usize,
    },
}

/// Errors raised by nearest-neighbor queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The tree holds no items.
    #[error("nearest-neighbor query on an empty tree")]
    EmptyTree,
}
