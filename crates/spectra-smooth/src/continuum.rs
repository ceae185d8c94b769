//! Joint fit of a smooth continuum and peak intensities.
//!
//! With `S` the `n × p` matrix of unit-area peak shapes, `P` the smoothing
//! penalty and `y` the counts, the fit solves
//!
//! ```text
//! | I + P   S   | | baseline    |   | y    |
//! | Sᵀ      SᵀS | | intensities | = | Sᵀy  |
//! ```
//!
//! The top block is tridiagonal, so the system goes through
//! [`PartitionedSystem`] in `O(n·p + p³)`.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use spectra_math::linear_algebra::{
    fill_penalty_rows, LowerSolve, PartitionedSystem, PivotReport, BAND_ROWS,
};
use spectra_math::MathError;
use tracing::{debug, instrument, warn};

use crate::config::{ContinuumConfig, Validate};
use crate::error::SmoothResult;

/// Result of [`fit_continuum`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuumFit {
    /// Smooth continuum, one value per channel.
    pub baseline: Vec<f64>,
    /// Fitted intensity of each peak shape. A fit without shapes carries a
    /// single zero intensity.
    pub intensities: Vec<f64>,
    /// Modelled counts: `baseline + S · intensities`.
    pub fitted: Vec<f64>,
    /// Pivots seen while reducing the continuum band.
    pub pivots: PivotReport,
}

impl ContinuumFit {
    /// Counts minus the fitted model.
    pub fn residuals(&self, counts: &[f64]) -> Vec<f64> {
        counts.iter().zip(&self.fitted).map(|(y, m)| y - m).collect()
    }
}

/// Fits a smooth continuum and the intensities of `shapes` to `counts`.
///
/// `shapes` holds one column per peak, with a row per channel. An empty set
/// of shapes fits the continuum alone.
///
/// # Errors
///
/// - [`SmoothError::InvalidConfig`](crate::SmoothError::InvalidConfig) if
///   the config does not validate
/// - [`MathError::ShapeMismatch`] if `shapes` does not have a row per channel
/// - Lower-solve failures: a singular `SᵀS` with
///   [`LowerSolveKind::Direct`](crate::config::LowerSolveKind::Direct), or
///   NNLS running out of iterations
#[instrument(level = "debug", skip(counts, shapes), fields(channels = counts.len(), peaks = shapes.ncols()))]
pub fn fit_continuum(
    counts: &[f64],
    shapes: ArrayView2<'_, f64>,
    config: &ContinuumConfig,
) -> SmoothResult<ContinuumFit> {
    config.validate()?;
    let n = counts.len();
    if shapes.nrows() != n {
        return Err(MathError::shape("peak shape rows", n, shapes.nrows()).into());
    }

    // A zero column stands in for a missing peak set; only NNLS handles the
    // resulting zero block.
    let (s, lower) = if shapes.ncols() == 0 {
        (Array2::zeros((n, 1)), LowerSolve::default())
    } else {
        (shapes.to_owned(), config.lower_solve())
    };
    let y = ArrayView1::from(counts);

    let mut a11 = Array2::zeros((BAND_ROWS, n));
    fill_penalty_rows(a11.view_mut(), config.mu, config.lld)?;
    let mut a12 = s.clone();
    let mut a21 = s.t().to_owned();
    let mut a22 = s.t().dot(&s);
    let mut b1 = y.to_owned();
    let mut b2 = s.t().dot(&y);

    let solution = PartitionedSystem::new(
        a11.view_mut(),
        a12.view_mut(),
        a21.view_mut(),
        a22.view_mut(),
        b1.view_mut(),
        b2.view_mut(),
    )?
    .solve(&lower)?;

    if !solution.pivots.is_regular() {
        warn!(pivots = ?solution.pivots, "continuum band met a degenerate pivot");
    }

    let fitted: Array1<f64> = &solution.c1 + &s.dot(&solution.c2);
    debug!(peaks = solution.c2.len(), "continuum fit complete");

    Ok(ContinuumFit {
        baseline: solution.c1.to_vec(),
        intensities: solution.c2.to_vec(),
        fitted: fitted.to_vec(),
        pivots: solution.pivots,
    })
}
