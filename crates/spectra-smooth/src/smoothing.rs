//! Position-weighted smoothing.
//!
//! Solves `(I + D) · s = y`, where `D` is the tridiagonal penalty whose
//! coupling grows linearly with the channel index. Peak widths in a gamma-ray
//! spectrum grow with energy, so the smoothing widens with them.

use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use spectra_math::linear_algebra::{
    back_substitute, diagonal_ordered_to_rows, fill_smooth, reduce_tridiag, BAND_ROWS,
};
use tracing::{debug, instrument};

use crate::config::{SmoothingConfig, Validate};
use crate::error::SmoothResult;

/// Smooths `signal` with the given strength.
///
/// A strength of zero returns the signal unchanged. The output has the same
/// length as the input.
///
/// # Errors
///
/// Returns [`SmoothError::InvalidConfig`](crate::SmoothError::InvalidConfig)
/// if `strength` is negative or not finite.
///
/// # Example
///
/// ```rust
/// use spectra_smooth::smoothing::smooth;
///
/// let smoothed = smooth(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 1.0).unwrap();
/// assert!((smoothed[1] - 1.76047904).abs() < 1e-8);
/// ```
#[instrument(level = "debug", skip(signal), fields(channels = signal.len()))]
pub fn smooth(signal: &[f64], strength: f64) -> SmoothResult<Vec<f64>> {
    Ok(smooth_view(ArrayView1::from(signal), strength)?.to_vec())
}

/// Smooths each signal independently, in parallel.
///
/// Results are returned in input order. The first failure is returned if
/// any signal fails.
pub fn smooth_many<S>(signals: &[S], strength: f64) -> SmoothResult<Vec<Vec<f64>>>
where
    S: AsRef<[f64]> + Sync,
{
    SmoothingConfig::new(strength).validate()?;
    debug!(signals = signals.len(), strength, "smoothing batch");
    signals
        .par_iter()
        .map(|signal| smooth(signal.as_ref(), strength))
        .collect()
}

pub(crate) fn smooth_view(signal: ArrayView1<'_, f64>, strength: f64) -> SmoothResult<Array1<f64>> {
    SmoothingConfig::new(strength).validate()?;
    let n = signal.len();

    let mut band = Array2::zeros((BAND_ROWS, n));
    fill_smooth(band.view_mut(), strength)?;
    let mut rows = diagonal_ordered_to_rows(band.view())?;
    let mut rhs = signal.to_owned();
    let mut none = Array2::zeros((n, 0));
    reduce_tridiag(rows.view_mut(), none.view_mut(), rhs.view_mut())?;

    Ok(back_substitute(rows.view(), rhs.view())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmoothError;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_values() {
        let smoothed = smooth(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 1.0).unwrap();
        let expected = [0.0, 1.76047904, 2.52095808, 3.16167665, 3.64271457, 3.91417166];

        for (got, want) in smoothed.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_zero_strength_is_identity() {
        let signal = [3.0, -1.0, 4.0, 1.0, -5.0];
        assert_eq!(smooth(&signal, 0.0).unwrap(), signal.to_vec());
    }

    #[test]
    fn test_short_signals() {
        assert!(smooth(&[], 1.0).unwrap().is_empty());
        assert_eq!(smooth(&[7.0], 2.0).unwrap(), vec![7.0]);
    }

    #[test]
    fn test_constant_signal_is_preserved() {
        let smoothed = smooth(&[4.0; 32], 3.0).unwrap();
        for v in smoothed {
            assert_relative_eq!(v, 4.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_invalid_strength() {
        assert!(matches!(
            smooth(&[1.0, 2.0], -0.5),
            Err(SmoothError::InvalidConfig { .. })
        ));
        assert!(matches!(
            smooth(&[1.0, 2.0], f64::NAN),
            Err(SmoothError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_smooth_many_matches_serial() {
        let signals: Vec<Vec<f64>> = (0..8)
            .map(|k| (0..50).map(|i| ((i * (k + 1)) % 7) as f64).collect())
            .collect();

        let batch = smooth_many(&signals, 0.5).unwrap();

        assert_eq!(batch.len(), signals.len());
        for (signal, got) in signals.iter().zip(&batch) {
            assert_eq!(got, &smooth(signal, 0.5).unwrap());
        }
    }
}
