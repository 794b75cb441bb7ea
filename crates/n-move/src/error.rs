//! Error types for the move engine.
//!
//! Two failures can reach the caller of a move:
//!
//! - [`MoveError::InvalidRange`] - the range locator produced a request that
//!   breaks the adjacency/bounds contract. This is a bug in the caller, caught
//!   before the buffer is touched.
//! - [`MoveError::Reformat`] - the formatter failed after the text exchange
//!   had already been committed. The buffer stays swapped.
//!
//! Configuration parsing has its own [`OptionError`].

use n_text::{LineRange, LineSpan};
use thiserror::Error;

/// Why a move request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeProblem {
    #[error("a range covers no lines")]
    Empty,

    #[error("a range reaches past the last line ({line_count} lines)")]
    OutOfBounds { line_count: usize },

    #[error("the ranges overlap")]
    Overlapping,

    #[error("the ranges are not adjacent")]
    NotAdjacent,
}

/// Errors surfaced by [`Mover::swap`](crate::mover::Mover::swap) and friends.
#[derive(Debug, Error)]
pub enum MoveError {
    /// The request broke the disjoint + adjacent + in-bounds contract.
    #[error("invalid move {primary:?} <-> {secondary:?}: {problem}")]
    InvalidRange {
        primary: LineRange,
        secondary: LineRange,
        problem: RangeProblem,
    },

    /// The formatter failed. The text exchange is already committed.
    #[error(transparent)]
    Reformat(#[from] ReformatError),
}

impl MoveError {
    /// The range problem, if this is an invalid-range error.
    #[must_use]
    pub const fn range_problem(&self) -> Option<RangeProblem> {
        match self {
            Self::InvalidRange { problem, .. } => Some(*problem),
            Self::Reformat(_) => None,
        }
    }
}

/// A formatter could not reindent a span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reindent of lines {span} failed: {message}")]
pub struct ReformatError {
    pub span: LineSpan,
    pub message: String,
}

impl ReformatError {
    /// Create a reformat error for `span`.
    #[must_use]
    pub fn new(span: LineSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A `:set` directive could not be applied to [`MoveOptions`](crate::options::MoveOptions).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("{0} is not a boolean option")]
    NotBoolean(String),
}
