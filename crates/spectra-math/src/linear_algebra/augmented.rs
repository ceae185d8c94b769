//! Full solve of a tridiagonal system augmented with dense blocks.

use nalgebra::DVector;
use ndarray::{Array1, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2};

use super::band::BAND_ROWS;
use super::block::zero_lower;
use super::elimination::{reduce_tridiag, PivotReport};
use super::nnls::{nnls, NnlsConfig};
use super::substitution::{back_propagate, back_substitute};
use super::{solve_linear_system, to_dmatrix};
use crate::error::{ensure_dim, MathError, MathResult};

/// Largest `|Σ A21|` accepted as "eliminated".
pub const COUPLING_TOLERANCE: f64 = 1e-8;

/// How the reduced bottom system `A22 · C2 = B2` is solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LowerSolve {
    /// Dense LU solve; `A22` must be square and non-singular.
    Direct,
    /// Non-negative least squares, for unknowns that cannot be negative.
    NonNegative(NnlsConfig),
}

impl Default for LowerSolve {
    fn default() -> Self {
        Self::NonNegative(NnlsConfig::default())
    }
}

impl LowerSolve {
    fn solve(&self, a22: ArrayView2<'_, f64>, b2: ArrayView1<'_, f64>) -> MathResult<Array1<f64>> {
        if a22.ncols() == 0 {
            return Ok(Array1::zeros(0));
        }
        let a = to_dmatrix(a22);
        let b = DVector::from_iterator(b2.len(), b2.iter().copied());
        let x = match self {
            Self::Direct => solve_linear_system(&a, &b)?,
            Self::NonNegative(config) => nnls(&a, &b, config)?,
        };
        Ok(Array1::from_iter(x.iter().copied()))
    }
}

/// Solution of a partitioned system.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedSolution {
    /// Unknowns of the tridiagonal (top) partition.
    pub c1: Array1<f64>,
    /// Unknowns of the dense (bottom) partition.
    pub c2: Array1<f64>,
    /// Pivots seen while reducing `A11`.
    pub pivots: PivotReport,
    /// `|Σ A21|` left after block elimination; zero up to rounding for a
    /// regular system.
    pub coupling_residual: f64,
}

/// A 2×2 block system whose top-left block is tridiagonal.
///
/// ```text
/// | A11  A12 | | C1 |   | B1 |
/// | A21  A22 | | C2 | = | B2 |
/// ```
///
/// `A11` is a row-aligned 3×n band. All buffers belong to the caller and are
/// overwritten by [`solve`](Self::solve).
#[derive(Debug)]
pub struct PartitionedSystem<'a> {
    a11: ArrayViewMut2<'a, f64>,
    a12: ArrayViewMut2<'a, f64>,
    a21: ArrayViewMut2<'a, f64>,
    a22: ArrayViewMut2<'a, f64>,
    b1: ArrayViewMut1<'a, f64>,
    b2: ArrayViewMut1<'a, f64>,
}

impl<'a> PartitionedSystem<'a> {
    /// Validates the partition and wraps the buffers.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::ShapeMismatch`](crate::MathError::ShapeMismatch)
    /// if any block disagrees with the partition.
    pub fn new(
        a11: ArrayViewMut2<'a, f64>,
        a12: ArrayViewMut2<'a, f64>,
        a21: ArrayViewMut2<'a, f64>,
        a22: ArrayViewMut2<'a, f64>,
        b1: ArrayViewMut1<'a, f64>,
        b2: ArrayViewMut1<'a, f64>,
    ) -> MathResult<Self> {
        ensure_dim("tridiagonal band rows", BAND_ROWS, a11.nrows())?;
        let n = a11.ncols();
        ensure_dim("augmented block rows", n, a12.nrows())?;
        ensure_dim("coupling block columns", n, a21.ncols())?;
        ensure_dim("top right-hand side length", n, b1.len())?;
        let bottom = a21.nrows();
        ensure_dim("bottom-right block rows", bottom, a22.nrows())?;
        ensure_dim("bottom-right block columns", a12.ncols(), a22.ncols())?;
        ensure_dim("bottom right-hand side length", bottom, b2.len())?;

        Ok(Self {
            a11,
            a12,
            a21,
            a22,
            b1,
            b2,
        })
    }

    /// Number of unknowns in the tridiagonal partition.
    pub fn top_size(&self) -> usize {
        self.a11.ncols()
    }

    /// Number of unknowns in the dense partition.
    pub fn bottom_size(&self) -> usize {
        self.a12.ncols()
    }

    /// Eliminates, solves the bottom partition, then back-substitutes the top.
    ///
    /// # Errors
    ///
    /// Propagates errors from the lower solve: a singular `A22` for
    /// [`LowerSolve::Direct`], or non-convergence of NNLS.
    pub fn solve(mut self, lower: &LowerSolve) -> MathResult<AugmentedSolution> {
        let pivots = reduce_tridiag(self.a11.view_mut(), self.a12.view_mut(), self.b1.view_mut())?;
        zero_lower(
            self.a11.view(),
            self.a12.view(),
            self.a21.view_mut(),
            self.a22.view_mut(),
            self.b1.view(),
            self.b2.view_mut(),
        )?;

        let coupling_residual = self.a21.sum().abs();
        if !coupling_eliminated(coupling_residual) {
            log::warn!("lower-left block not eliminated: |sum| = {coupling_residual:e}");
        }

        let c2 = lower.solve(self.a22.view(), self.b2.view())?;
        back_propagate(self.a12.view(), c2.view(), self.b1.view_mut())?;
        let c1 = back_substitute(self.a11.view(), self.b1.view())?;

        log::debug!(
            "solved partitioned system: {} top, {} bottom unknowns",
            c1.len(),
            c2.len()
        );
        Ok(AugmentedSolution {
            c1,
            c2,
            pivots,
            coupling_residual,
        })
    }
}

fn coupling_eliminated(residual: f64) -> bool {
    residual <= COUPLING_TOLERANCE
}

impl AugmentedSolution {
    /// Returns true if block elimination cleared `A21` to within
    /// [`COUPLING_TOLERANCE`].
    pub fn is_coupling_eliminated(&self) -> bool {
        coupling_eliminated(self.coupling_residual)
    }

    /// Fails if elimination met a degenerate pivot or left `A21` uncleared.
    pub fn ensure_regular(self) -> MathResult<Self> {
        self.pivots.ensure_regular()?;
        if !self.is_coupling_eliminated() {
            return Err(MathError::IncompleteElimination {
                residual: self.coupling_residual,
            });
        }
        Ok(self)
    }
}
