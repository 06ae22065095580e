//! Errors reported by [`Deque`](crate::Deque) operations.
//!
//! Every error is raised before the deque is touched, so a failed call
//! leaves the structure exactly as it was.

use thiserror::Error;

/// Failures surfaced by the deque, its positions and its cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DequeError {
    /// `front`, `back` or a `pop_*` call on an empty deque.
    #[error("the deque is empty")]
    EmptyContainer,

    /// `at(index)` with `index >= len`.
    #[error("index {index} is out of bound for a deque of length {len}")]
    IndexOutOfBound {
        /// The requested index
        index: usize,
        /// The length of the deque at the time of the call
        len: usize,
    },

    /// Dereferencing the end position, moving a position across either end
    /// of the block chain, or using a position invalidated by a rebuild,
    /// a split or a clear.
    #[error("invalid iterator")]
    InvalidIterator,

    /// A position issued by another deque.
    #[error("the position belongs to another deque")]
    WrongOwner,

    /// Erasing at the end position.
    #[error("cannot erase the end position")]
    BadPosition,

    /// A [`Config`](crate::Config) that cannot drive the rebalancing heuristic.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Shorthand for results carrying a [`DequeError`].
pub type Result<T> = std::result::Result<T, DequeError>;
