//! Tridiagonal band storage and the smoothing-penalty builders.
//!
//! A tridiagonal n×n matrix is stored in a 3×n buffer. Two layouts are in use:
//!
//! ```text
//! diagonal-ordered (LAPACK band storage)    row-aligned
//! row 0: [  *   A01  A12  ...  A(n-2,n-1)]  [A01  A12  ...  A(n-2,n-1)   * ]
//! row 1: [ A00  A11  A22  ...  A(n-1,n-1)]  [A00  A11  ...              A(n-1,n-1)]
//! row 2: [ A10  A21  ...  A(n-1,n-2)  *  ]  [ *   A10  ...  A(n-1,n-2)]
//! ```
//!
//! [`fill_smooth`] writes the diagonal-ordered layout; the elimination routines
//! read the row-aligned one, where column `i` of the buffer is row `i` of the
//! matrix. Sentinel slots (`*`) are kept at zero.

use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use nalgebra::DMatrix;

use super::index::{get2, get2_mut};
use crate::error::{ensure_dim, MathResult};

/// Buffer row holding the upper band.
pub const UPPER: usize = 0;
/// Buffer row holding the main diagonal.
pub const DIAG: usize = 1;
/// Buffer row holding the lower band.
pub const LOWER: usize = 2;

/// Number of rows in a tridiagonal band buffer.
pub const BAND_ROWS: usize = 3;

/// Fills `buffer` with the position-weighted smoothing penalty matrix, in
/// diagonal-ordered layout.
///
/// The penalty coefficient at position `i` is `c = i * f`, so the smoothing
/// widens linearly with channel index, following the growth of peak widths
/// across a gamma-ray spectrum. Each row sums to one, and `f = 0` yields the
/// identity.
///
/// # Errors
///
/// Returns [`MathError::ShapeMismatch`](crate::MathError::ShapeMismatch) if
/// `buffer` does not have exactly 3 rows. Nothing is written in that case.
///
/// # Example
///
/// ```rust
/// use ndarray::Array2;
/// use spectra_math::linear_algebra::{fill_smooth, DIAG};
///
/// let mut band = Array2::zeros((3, 4));
/// fill_smooth(band.view_mut(), 1.0).unwrap();
/// assert_eq!(band.row(DIAG).to_vec(), vec![1.0, 2.0, 4.0, 3.0]);
/// ```
pub fn fill_smooth(mut buffer: ArrayViewMut2<'_, f64>, f: f64) -> MathResult<()> {
    ensure_dim("band rows", BAND_ROWS, buffer.nrows())?;
    let n = buffer.ncols();
    if n == 0 {
        return Ok(());
    }

    let mut c_prev = 0.0;
    for i in 0..n - 1 {
        let c = i as f64 * f;
        *get2_mut(&mut buffer, DIAG, i) = 1.0 + c + c_prev;
        *get2_mut(&mut buffer, UPPER, i + 1) = -c;
        *get2_mut(&mut buffer, LOWER, i) = -c;
        c_prev = c;
    }

    *get2_mut(&mut buffer, UPPER, 0) = 0.0;
    *get2_mut(&mut buffer, DIAG, n - 1) = 1.0 + c_prev;
    *get2_mut(&mut buffer, LOWER, n - 1) = 0.0;

    log::trace!("filled {n}-point smoothing band with strength {f}");
    Ok(())
}

/// Fills `buffer` with the smoothing penalty matrix in row-aligned layout,
/// leaving every position up to and including `lld` unsmoothed.
///
/// Above the lower-level discriminator the coefficients match
/// [`fill_smooth`], so with `lld = 0` the two builders describe the same
/// matrix.
///
/// # Errors
///
/// Returns [`MathError::ShapeMismatch`](crate::MathError::ShapeMismatch) if
/// `buffer` does not have exactly 3 rows.
pub fn fill_penalty_rows(mut buffer: ArrayViewMut2<'_, f64>, mu: f64, lld: usize) -> MathResult<()> {
    ensure_dim("band rows", BAND_ROWS, buffer.nrows())?;
    let n = buffer.ncols();
    if n == 0 {
        return Ok(());
    }

    let mut c_prev = 0.0;
    for i in 0..n - 1 {
        let c = if i <= lld { 0.0 } else { i as f64 * mu };
        *get2_mut(&mut buffer, DIAG, i) = 1.0 + c + c_prev;
        *get2_mut(&mut buffer, UPPER, i) = -c;
        *get2_mut(&mut buffer, LOWER, i + 1) = -c;
        c_prev = c;
    }

    *get2_mut(&mut buffer, LOWER, 0) = 0.0;
    *get2_mut(&mut buffer, DIAG, n - 1) = 1.0 + c_prev;
    *get2_mut(&mut buffer, UPPER, n - 1) = 0.0;
    Ok(())
}

/// Converts a diagonal-ordered band into the row-aligned layout.
///
/// # Errors
///
/// Returns [`MathError::ShapeMismatch`](crate::MathError::ShapeMismatch) if
/// `band` does not have exactly 3 rows.
pub fn diagonal_ordered_to_rows(band: ArrayView2<'_, f64>) -> MathResult<Array2<f64>> {
    ensure_dim("band rows", BAND_ROWS, band.nrows())?;
    let n = band.ncols();
    let mut rows = Array2::zeros((BAND_ROWS, n));
    for i in 0..n {
        rows[[DIAG, i]] = band[[DIAG, i]];
        if i + 1 < n {
            rows[[UPPER, i]] = band[[UPPER, i + 1]];
        }
        if i > 0 {
            rows[[LOWER, i]] = band[[LOWER, i - 1]];
        }
    }
    Ok(rows)
}

/// Expands a row-aligned band into a dense matrix.
///
/// Sentinel slots are ignored.
///
/// # Errors
///
/// Returns [`MathError::ShapeMismatch`](crate::MathError::ShapeMismatch) if
/// `band` does not have exactly 3 rows.
pub fn rows_to_dense(band: ArrayView2<'_, f64>) -> MathResult<DMatrix<f64>> {
    ensure_dim("band rows", BAND_ROWS, band.nrows())?;
    let n = band.ncols();
    Ok(DMatrix::from_fn(n, n, |r, c| {
        if r == c {
            get2(&band, DIAG, r)
        } else if c == r + 1 {
            get2(&band, UPPER, r)
        } else if r == c + 1 {
            get2(&band, LOWER, r)
        } else {
            0.0
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_fill_smooth_four_points() {
        let mut band = Array2::zeros((3, 4));
        fill_smooth(band.view_mut(), 1.0).unwrap();

        assert_eq!(band.row(DIAG).to_vec(), vec![1.0, 2.0, 4.0, 3.0]);
        assert_eq!(band.row(UPPER).to_vec(), vec![0.0, 0.0, -1.0, -2.0]);
        assert_eq!(band.row(LOWER).to_vec(), vec![0.0, -1.0, -2.0, 0.0]);
    }

    #[test]
    fn test_fill_smooth_zero_strength_is_identity() {
        let mut band = Array2::from_elem((3, 6), 9.0);
        fill_smooth(band.view_mut(), 0.0).unwrap();

        assert!(band.row(DIAG).iter().all(|&d| d == 1.0));
        assert!(band.row(UPPER).iter().all(|&u| u == 0.0));
        assert!(band.row(LOWER).iter().all(|&l| l == 0.0));
    }

    #[test]
    fn test_fill_smooth_degenerate_sizes() {
        let mut empty = Array2::<f64>::zeros((3, 0));
        fill_smooth(empty.view_mut(), 2.0).unwrap();

        let mut single = Array2::zeros((3, 1));
        fill_smooth(single.view_mut(), 2.0).unwrap();
        assert_eq!(single.column(0).to_vec(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_fill_smooth_rejects_wrong_rows() {
        let mut band = Array2::from_elem((2, 5), 7.0);
        let err = fill_smooth(band.view_mut(), 1.0).unwrap_err();

        assert_eq!(err, MathError::shape("band rows", 3, 2));
        assert!(band.iter().all(|&v| v == 7.0));
    }

    #[test]
    fn test_rows_sum_to_one() {
        let mut band = Array2::zeros((3, 8));
        fill_smooth(band.view_mut(), 0.7).unwrap();
        let dense = rows_to_dense(diagonal_ordered_to_rows(band.view()).unwrap().view()).unwrap();

        for r in 0..8 {
            assert_relative_eq!(dense.row(r).sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_penalty_rows_matches_converted_smooth_band() {
        let mut band = Array2::zeros((3, 7));
        fill_smooth(band.view_mut(), 0.3).unwrap();
        let converted = diagonal_ordered_to_rows(band.view()).unwrap();

        let mut rows = Array2::zeros((3, 7));
        fill_penalty_rows(rows.view_mut(), 0.3, 0).unwrap();

        for (a, b) in converted.iter().zip(rows.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_penalty_rows_respects_lld() {
        let mut rows = Array2::zeros((3, 6));
        fill_penalty_rows(rows.view_mut(), 1.0, 2).unwrap();

        assert_eq!(rows.row(DIAG).to_vec(), vec![1.0, 1.0, 1.0, 4.0, 8.0, 5.0]);
        assert_eq!(rows.row(UPPER).to_vec(), vec![0.0, 0.0, 0.0, -3.0, -4.0, 0.0]);
        assert_eq!(rows.row(LOWER).to_vec(), vec![0.0, 0.0, 0.0, 0.0, -3.0, -4.0]);
    }

    #[test]
    fn test_rows_to_dense() {
        let band = array![[5.0, 6.0, 0.0], [1.0, 2.0, 3.0], [0.0, 7.0, 8.0]];
        let dense = rows_to_dense(band.view()).unwrap();

        let expected = DMatrix::from_row_slice(3, 3, &[1.0, 5.0, 0.0, 7.0, 2.0, 6.0, 0.0, 8.0, 3.0]);
        assert_eq!(dense, expected);
    }
}
