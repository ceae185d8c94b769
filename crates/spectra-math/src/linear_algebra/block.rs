//! Elimination of the coupling block of a 2×2 partitioned system.
//!
//! ```text
//! | A11  A12 | | C1 |   | B1 |
//! |          | |    | = |    |
//! | A21  A22 | | C2 |   | B2 |
//! ```
//!
//! Once `A11` is in echelon form, subtracting multiples of the top rows from
//! the bottom rows clears `A21` and leaves the Schur complement
//! `A22 - A21·A11⁻¹·A12` in place of `A22`.

use ndarray::{ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2};

use super::band::{BAND_ROWS, DIAG, UPPER};
use super::index::{get1, get1_mut, get2, get2_mut};
use crate::error::{ensure_dim, MathResult};

/// Eliminates `a21` against the echelon-form top block.
///
/// `a11` must already have been through
/// [`reduce_tridiag`](super::reduce_tridiag) together with `a12` and `b1`.
/// On return `a21` is zero up to rounding, and `(a22, b2)` is a reduced
/// system in the bottom unknowns alone.
///
/// The sweep runs column-major: clearing column `i` pushes a correction into
/// column `i + 1` through the upper band, so column `i + 1` cannot be
/// processed first. Rows within a column are independent.
///
/// # Errors
///
/// Returns [`MathError::ShapeMismatch`](crate::MathError::ShapeMismatch)
/// before any mutation if `a21` does not have one column per row of `a12`, or
/// if any other block disagrees with the partition.
pub fn zero_lower(
    a11: ArrayView2<'_, f64>,
    a12: ArrayView2<'_, f64>,
    mut a21: ArrayViewMut2<'_, f64>,
    mut a22: ArrayViewMut2<'_, f64>,
    b1: ArrayView1<'_, f64>,
    mut b2: ArrayViewMut1<'_, f64>,
) -> MathResult<()> {
    let n = a12.nrows();
    ensure_dim("coupling block columns", n, a21.ncols())?;
    ensure_dim("tridiagonal band rows", BAND_ROWS, a11.nrows())?;
    ensure_dim("tridiagonal size", n, a11.ncols())?;
    ensure_dim("top right-hand side length", n, b1.len())?;
    let bottom = a21.nrows();
    ensure_dim("bottom-right block rows", bottom, a22.nrows())?;
    ensure_dim("bottom-right block columns", a12.ncols(), a22.ncols())?;
    ensure_dim("bottom right-hand side length", bottom, b2.len())?;

    for i in 0..n {
        let upper = get2(&a11, UPPER, i);
        let diag = get2(&a11, DIAG, i);
        let top_row = a12.row(i);
        let b1_i = get1(&b1, i);

        for j in 0..bottom {
            let f = get2(&a21, j, i);
            a22.row_mut(j).scaled_add(-f, &top_row);
            *get1_mut(&mut b2, j) -= b1_i * f;
            if i + 1 < n {
                *get2_mut(&mut a21, j, i + 1) -= upper * f;
            }
            *get2_mut(&mut a21, j, i) -= diag * f;
        }
    }

    log::trace!("eliminated {bottom}x{n} coupling block");
    Ok(())
}
