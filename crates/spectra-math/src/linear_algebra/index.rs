//! Element access for the elimination sweeps.
//!
//! Debug builds and builds with the `checked-indexing` feature go through
//! ndarray's bounds-checked indexing. Release builds use `uget`, which is only
//! sound because every public entry point validates buffer shapes before the
//! first access.

use ndarray::{ArrayBase, Data, DataMut, Ix1, Ix2};

#[cfg(any(debug_assertions, feature = "checked-indexing"))]
#[inline]
pub(crate) fn get2<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix2>, row: usize, col: usize) -> f64 {
    a[[row, col]]
}

#[cfg(not(any(debug_assertions, feature = "checked-indexing")))]
#[inline]
pub(crate) fn get2<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix2>, row: usize, col: usize) -> f64 {
    // SAFETY: shapes are validated by the caller before sweeping.
    unsafe { *a.uget([row, col]) }
}

#[cfg(any(debug_assertions, feature = "checked-indexing"))]
#[inline]
pub(crate) fn get2_mut<S: DataMut<Elem = f64>>(
    a: &mut ArrayBase<S, Ix2>,
    row: usize,
    col: usize,
) -> &mut f64 {
    &mut a[[row, col]]
}

#[cfg(not(any(debug_assertions, feature = "checked-indexing")))]
#[inline]
pub(crate) fn get2_mut<S: DataMut<Elem = f64>>(
    a: &mut ArrayBase<S, Ix2>,
    row: usize,
    col: usize,
) -> &mut f64 {
    // SAFETY: shapes are validated by the caller before sweeping.
    unsafe { a.uget_mut([row, col]) }
}

#[cfg(any(debug_assertions, feature = "checked-indexing"))]
#[inline]
pub(crate) fn get1<S: Data<Elem = f64>>(v: &ArrayBase<S, Ix1>, i: usize) -> f64 {
    v[i]
}

#[cfg(not(any(debug_assertions, feature = "checked-indexing")))]
#[inline]
pub(crate) fn get1<S: Data<Elem = f64>>(v: &ArrayBase<S, Ix1>, i: usize) -> f64 {
    // SAFETY: shapes are validated by the caller before sweeping.
    unsafe { *v.uget(i) }
}

#[cfg(any(debug_assertions, feature = "checked-indexing"))]
#[inline]
pub(crate) fn get1_mut<S: DataMut<Elem = f64>>(v: &mut ArrayBase<S, Ix1>, i: usize) -> &mut f64 {
    &mut v[i]
}

#[cfg(not(any(debug_assertions, feature = "checked-indexing")))]
#[inline]
pub(crate) fn get1_mut<S: DataMut<Elem = f64>>(v: &mut ArrayBase<S, Ix1>, i: usize) -> &mut f64 {
    // SAFETY: shapes are validated by the caller before sweeping.
    unsafe { v.uget_mut(i) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_read_write_2d() {
        let mut a = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(get2(&a, 1, 0), 3.0);
        *get2_mut(&mut a, 0, 1) = 7.0;
        assert_eq!(a[[0, 1]], 7.0);
    }

    #[test]
    fn test_read_write_1d() {
        let mut v = Array1::from(vec![1.0, 2.0, 3.0]);
        *get1_mut(&mut v, 2) -= 1.0;
        assert_eq!(get1(&v, 2), 2.0);
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "checked-indexing"))]
    #[should_panic]
    fn test_out_of_bounds_is_caught_in_checked_builds() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let _ = get2(&a, 2, 0);
    }
}
