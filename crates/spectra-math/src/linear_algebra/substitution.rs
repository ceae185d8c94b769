//! Back-substitution for the echelon form left by forward elimination.

use ndarray::{Array1, ArrayView1, ArrayView2, ArrayViewMut1};

use super::band::{BAND_ROWS, DIAG, UPPER};
use super::index::{get1, get1_mut, get2};
use crate::error::{ensure_dim, MathResult};

/// Solves the upper bidiagonal system left in `a11` by
/// [`reduce_tridiag`](super::reduce_tridiag).
///
/// The lower band is ignored. The diagonal is divided out rather than assumed
/// to be one, so any row-aligned upper bidiagonal band can be solved.
///
/// # Errors
///
/// Returns [`MathError::ShapeMismatch`](crate::MathError::ShapeMismatch) if
/// `a11` does not have 3 rows or `b1` does not match its size.
pub fn back_substitute(a11: ArrayView2<'_, f64>, b1: ArrayView1<'_, f64>) -> MathResult<Array1<f64>> {
    ensure_dim("tridiagonal band rows", BAND_ROWS, a11.nrows())?;
    let n = a11.ncols();
    ensure_dim("right-hand side length", n, b1.len())?;

    let mut x = Array1::zeros(n);
    if n == 0 {
        return Ok(x);
    }

    x[n - 1] = get1(&b1, n - 1) / get2(&a11, DIAG, n - 1);
    for i in (0..n - 1).rev() {
        let next = get1(&x, i + 1);
        *get1_mut(&mut x, i) = (get1(&b1, i) - get2(&a11, UPPER, i) * next) / get2(&a11, DIAG, i);
    }
    Ok(x)
}

/// Folds solved bottom unknowns into the top right-hand side:
/// `b1 -= a12 · c2`.
///
/// # Errors
///
/// Returns [`MathError::ShapeMismatch`](crate::MathError::ShapeMismatch) if
/// the shapes of `a12`, `c2` and `b1` are inconsistent.
pub fn back_propagate(
    a12: ArrayView2<'_, f64>,
    c2: ArrayView1<'_, f64>,
    mut b1: ArrayViewMut1<'_, f64>,
) -> MathResult<()> {
    ensure_dim("augmented block columns", a12.ncols(), c2.len())?;
    ensure_dim("top right-hand side length", a12.nrows(), b1.len())?;
    if !c2.is_empty() {
        b1.scaled_add(-1.0, &a12.dot(&c2));
    }
    Ok(())
}
