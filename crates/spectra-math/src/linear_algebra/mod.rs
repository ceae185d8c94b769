//! Linear algebra for penalized spectrum smoothing.
//!
//! The centrepiece is a tridiagonal solver that can carry extra dense
//! columns and rows along with it:
//!
//! - [`fill_smooth`] / [`fill_penalty_rows`]: build the position-weighted
//!   smoothing penalty band
//! - [`reduce_tridiag`]: forward elimination without pivoting, applied to the
//!   band, an augmented block and a right-hand side together
//! - [`zero_lower`]: clears the coupling block of a 2×2 partitioned system,
//!   leaving the Schur complement for the bottom unknowns
//! - [`back_substitute`] / [`back_propagate`]: complete the solve
//! - [`PartitionedSystem`]: runs the whole sequence
//!
//! All routines work in place on caller-owned `ndarray` buffers. Shapes are
//! checked before any buffer is touched; pivots are not checked at all (see
//! [`PivotReport`]).
//!
//! # Example
//!
//! ```rust
//! use ndarray::{Array1, Array2};
//! use spectra_math::linear_algebra::{
//!     back_substitute, diagonal_ordered_to_rows, fill_smooth, reduce_tridiag,
//! };
//!
//! let signal = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
//! let mut band = Array2::zeros((3, signal.len()));
//! fill_smooth(band.view_mut(), 1.0).unwrap();
//!
//! let mut rows = diagonal_ordered_to_rows(band.view()).unwrap();
//! let mut rhs = Array1::from(signal.to_vec());
//! let mut none = Array2::zeros((signal.len(), 0));
//! reduce_tridiag(rows.view_mut(), none.view_mut(), rhs.view_mut()).unwrap();
//!
//! let smoothed = back_substitute(rows.view(), rhs.view()).unwrap();
//! assert!((smoothed[1] - 1.76047904).abs() < 1e-8);
//! ```

mod augmented;
mod band;
mod block;
mod elimination;
mod index;
mod nnls;
mod substitution;

pub use augmented::{AugmentedSolution, LowerSolve, PartitionedSystem, COUPLING_TOLERANCE};
pub use band::{
    diagonal_ordered_to_rows, fill_penalty_rows, fill_smooth, rows_to_dense, BAND_ROWS, DIAG,
    LOWER, UPPER,
};
pub use block::zero_lower;
pub use elimination::{reduce_tridiag, PivotReport};
pub use nnls::{nnls, NnlsConfig, DEFAULT_NNLS_TOLERANCE};
pub use substitution::{back_propagate, back_substitute};

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};
use ndarray::ArrayView2;

/// Solves a dense linear system Ax = b using LU decomposition with partial
/// pivoting.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(MathError::invalid_input("Matrix must be square"));
    }
    if n != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: n,
            rows2: b.len(),
            cols2: 1,
        });
    }

    a.clone().lu().solve(b).ok_or(MathError::SingularMatrix)
}

/// Copies an `ndarray` view into an `nalgebra` matrix.
pub(crate) fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |r, c| a[[r, c]])
}
