//! Error handling for Millpath numerics
//!
//! Provides the hard-error taxonomy shared by every numeric crate:
//! - Shape errors (matrix/vector dimensions)
//! - Numerical breakdown (singular pivots)
//! - Input precondition violations (FFT lengths, degenerate point sets, NURBS nets)
//!
//! Non-convergence is deliberately absent here. Iterative solvers report it
//! through a `converged` flag on their result structs instead.

use thiserror::Error;

/// Numeric error type
///
/// Every variant is a precondition or programming error that aborts the
/// current call and surfaces to the immediate caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    /// Operands have incompatible shapes
    #[error("Dimension mismatch in {operation}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The operation that rejected its operands.
        operation: &'static str,
        /// The shape the operation required.
        expected: String,
        /// The shape it received.
        actual: String,
    },

    /// Elimination hit a pivot too small to divide by
    #[error("Singular matrix: pivot {pivot:e} in column {column} is below {epsilon:e}")]
    SingularMatrix {
        /// Column being eliminated when the pivot failed.
        column: usize,
        /// Absolute value of the best available pivot.
        pivot: f64,
        /// Threshold the pivot was compared against.
        epsilon: f64,
    },

    /// Sequence length violates an algorithm precondition
    #[error("Invalid input length {len}: {reason}")]
    InvalidInputLength {
        /// The rejected length.
        len: usize,
        /// Why the length is unusable.
        reason: String,
    },

    /// Geometry is too degenerate for the requested construction
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// NURBS curve or surface breaks the knot/weight invariants
    #[error("Invalid NURBS definition: {0}")]
    InvalidNurbs(String),

    /// A scalar parameter is non-finite or out of range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// The reason it was rejected.
        reason: String,
    },
}

impl NumericError {
    /// Build a [`NumericError::DimensionMismatch`] from displayable shapes.
    pub fn dimension(
        operation: &'static str,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::DimensionMismatch {
            operation,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Build a [`NumericError::InvalidParameter`].
    pub fn parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for numeric operations.
pub type Result<T> = std::result::Result<T, NumericError>;
