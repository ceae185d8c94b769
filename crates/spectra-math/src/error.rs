//! Error types for the banded solver.

use thiserror::Error;

/// A specialized Result type for solver operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur while building or solving a banded system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A buffer's dimensions violate a documented precondition.
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// The buffer dimension that was checked.
        what: &'static str,
        /// The dimension required by the operation.
        expected: usize,
        /// The dimension that was supplied.
        actual: usize,
    },

    /// Matrix dimensions are incompatible.
    #[error("Incompatible matrix dimensions: ({rows1}x{cols1}) and ({rows2}x{cols2})")]
    DimensionMismatch {
        /// Rows in first matrix.
        rows1: usize,
        /// Columns in first matrix.
        cols1: usize,
        /// Rows in second matrix.
        rows2: usize,
        /// Columns in second matrix.
        cols2: usize,
    },

    /// Elimination met a zero or non-finite pivot.
    #[error("Degenerate pivot at row {row}: {pivot:.2e}")]
    DegeneratePivot {
        /// Row whose diagonal entry was used as the pivot.
        row: usize,
        /// The pivot value.
        pivot: f64,
    },

    /// Block elimination left the coupling block non-zero.
    #[error("Coupling block not eliminated: |sum| = {residual:e}")]
    IncompleteElimination {
        /// Absolute sum of what remained.
        residual: f64,
    },

    /// Matrix is singular (not invertible).
    #[error("Singular matrix: cannot invert")]
    SingularMatrix,

    /// Iterative algorithm failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a shape mismatch error.
    #[must_use]
    pub fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Fails with [`MathError::ShapeMismatch`] unless `actual == expected`.
pub(crate) fn ensure_dim(what: &'static str, expected: usize, actual: usize) -> MathResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(MathError::shape(what, expected, actual))
    }
}
