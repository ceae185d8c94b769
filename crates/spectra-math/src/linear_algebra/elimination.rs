//! Forward elimination of a tridiagonal block without pivoting.

use ndarray::{s, ArrayBase, ArrayViewMut1, ArrayViewMut2, DataMut, Ix1, Ix2};

use super::band::{BAND_ROWS, DIAG, LOWER, UPPER};
use super::index::{get1, get1_mut, get2, get2_mut};
use crate::error::{ensure_dim, MathError, MathResult};

/// Pivots observed during a forward sweep.
///
/// Elimination never stops on a bad pivot: a zero diagonal simply turns the
/// following rows into infinities and NaNs. The report lets callers who care
/// detect that after the fact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotReport {
    /// Smallest absolute pivot seen (`+inf` for an empty system).
    pub min_abs_pivot: f64,
    /// Row of the smallest absolute pivot.
    pub min_pivot_row: Option<usize>,
    /// First row whose pivot was zero or non-finite, with that pivot.
    pub degenerate: Option<(usize, f64)>,
}

impl Default for PivotReport {
    fn default() -> Self {
        Self {
            min_abs_pivot: f64::INFINITY,
            min_pivot_row: None,
            degenerate: None,
        }
    }
}

impl PivotReport {
    fn observe(&mut self, row: usize, pivot: f64) {
        if self.degenerate.is_none() && (pivot == 0.0 || !pivot.is_finite()) {
            self.degenerate = Some((row, pivot));
        }
        if pivot.abs() < self.min_abs_pivot {
            self.min_abs_pivot = pivot.abs();
            self.min_pivot_row = Some(row);
        }
    }

    /// Returns true if every pivot was finite and non-zero.
    pub fn is_regular(&self) -> bool {
        self.degenerate.is_none()
    }

    /// Converts a degenerate report into [`MathError::DegeneratePivot`].
    pub fn ensure_regular(self) -> MathResult<Self> {
        match self.degenerate {
            Some((row, pivot)) => Err(MathError::DegeneratePivot { row, pivot }),
            None => Ok(self),
        }
    }
}

/// Reduces a row-aligned tridiagonal block to normalized echelon form.
///
/// Every row operation applied to `a11` is applied to the augmented block
/// `a12` and the right-hand side `b1`. Afterwards the diagonal is all ones,
/// the lower band has been folded away (its slots are not zeroed), and the
/// upper band holds the normalized coupling of row `i` to row `i + 1` needed
/// by back-substitution.
///
/// No pivoting is done. The matrix must be diagonally dominant, which is the
/// case for anything built by [`fill_penalty_rows`](super::fill_penalty_rows)
/// with a non-negative strength.
///
/// # Errors
///
/// Returns [`MathError::ShapeMismatch`] before touching any buffer if `a11`
/// does not have 3 rows or if `a12` / `b1` do not have one row per column of
/// `a11`.
pub fn reduce_tridiag(
    mut a11: ArrayViewMut2<'_, f64>,
    mut a12: ArrayViewMut2<'_, f64>,
    mut b1: ArrayViewMut1<'_, f64>,
) -> MathResult<PivotReport> {
    ensure_dim("tridiagonal band rows", BAND_ROWS, a11.nrows())?;
    let n = a11.ncols();
    ensure_dim("augmented block rows", n, a12.nrows())?;
    ensure_dim("right-hand side length", n, b1.len())?;

    let mut report = PivotReport::default();
    if n == 0 {
        return Ok(report);
    }

    for i in 0..n - 1 {
        let pivot = get2(&a11, DIAG, i);
        report.observe(i, pivot);
        let f = get2(&a11, LOWER, i + 1) / pivot;

        {
            let (row, mut next) = a12.multi_slice_mut((s![i, ..], s![i + 1, ..]));
            next.scaled_add(-f, &row);
        }
        let delta = get1(&b1, i) * f;
        *get1_mut(&mut b1, i + 1) -= delta;

        let delta = get2(&a11, UPPER, i) * f;
        *get2_mut(&mut a11, DIAG, i + 1) -= delta;
        // Uses the pivot from before row i is normalized.
        *get2_mut(&mut a11, LOWER, i + 1) -= pivot * f;

        normalize_row(&mut a11, &mut a12, &mut b1, i);
    }

    let last = n - 1;
    report.observe(last, get2(&a11, DIAG, last));
    normalize_row(&mut a11, &mut a12, &mut b1, last);

    if let Some((row, pivot)) = report.degenerate {
        log::warn!("degenerate pivot {pivot:e} at row {row}; elimination produced non-finite values");
    }
    log::trace!(
        "reduced {n}x{n} tridiagonal block with {} augmented columns (min |pivot| {:e})",
        a12.ncols(),
        report.min_abs_pivot
    );
    Ok(report)
}

/// Scales row `i` so its diagonal becomes one. The upper band of the last
/// row is a sentinel and is left untouched.
fn normalize_row<S1, S2, S3>(
    a11: &mut ArrayBase<S1, Ix2>,
    a12: &mut ArrayBase<S2, Ix2>,
    b1: &mut ArrayBase<S3, Ix1>,
    i: usize,
) where
    S1: DataMut<Elem = f64>,
    S2: DataMut<Elem = f64>,
    S3: DataMut<Elem = f64>,
{
    let f = 1.0 / get2(a11, DIAG, i);
    let mut row = a12.row_mut(i);
    row *= f;
    *get1_mut(b1, i) *= f;
    if i + 1 < a11.ncols() {
        *get2_mut(a11, UPPER, i) *= f;
    }
    *get2_mut(a11, DIAG, i) *= f;
}
