//! Errors raised while building or editing a knot table.
//!
//! Evaluation never returns these; it signals a domain error with NaN instead.
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SplineError {
    #[error("x and y must have the same length (got {x} and {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("at least 2 knots are required (got {0})")]
    TooFewKnots(usize),

    /// The x value at `index` is smaller than the one before it.
    #[error("x values must be non-decreasing (violated at index {0})")]
    Unordered(usize),

    #[error("knot index {index} is out of bounds for a table of {size} knots")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("tolerances must be positive and finite")]
    InvalidTolerance,

    #[error("unrepresentable number")]
    Unrepresentable,
}
