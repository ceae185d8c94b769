//! Baseline estimation for peak searches.
//!
//! The baseline is a heavily smoothed lower envelope of the spectrum. Each
//! refinement pass pulls the estimate down wherever it sits above the lightly
//! smoothed data, then relaxes the smoothing by half.

use ndarray::{Array1, ArrayView1, Zip};
use tracing::{debug, instrument};

use crate::config::{BaselineConfig, Validate};
use crate::error::SmoothResult;
use crate::smoothing::smooth_view;

/// Result of [`compute_baseline`].
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    /// Non-negative baseline estimate.
    pub baseline: Vec<f64>,
    /// The spectrum after the initial light smoothing.
    pub smoothed: Vec<f64>,
}

impl Baseline {
    /// Net counts above the baseline, taken from the lightly smoothed
    /// spectrum.
    pub fn net(&self) -> Vec<f64> {
        self.smoothed
            .iter()
            .zip(&self.baseline)
            .map(|(s, b)| s - b)
            .collect()
    }
}

/// Estimates the baseline of spectrum `y`.
///
/// # Errors
///
/// Returns [`SmoothError::InvalidConfig`](crate::SmoothError::InvalidConfig)
/// if the config does not validate.
#[instrument(level = "debug", skip(y), fields(channels = y.len()))]
pub fn compute_baseline(y: &[f64], config: &BaselineConfig) -> SmoothResult<Baseline> {
    config.validate()?;

    let mut mu = config.mu;
    let u = smooth_view(ArrayView1::from(y), mu * config.fine_ratio)?;
    let mut x = smooth_view(u.view(), mu)?;

    for pass in 0..config.iterations {
        mu /= 2.0;
        x.mapv_inplace(|v| v.max(0.0));
        let excess: Array1<f64> = Zip::from(&u).and(&x).map_collect(|&s, &b| (s - b).min(0.0));
        x += &smooth_view(excess.view(), mu)?;
        debug!(pass, mu, "refined baseline");
    }
    x.mapv_inplace(|v| v.max(0.0));

    Ok(Baseline {
        baseline: x.to_vec(),
        smoothed: u.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmoothError;
    use approx::assert_relative_eq;
    use spectra_math::distributions::gauss_pdf;

    fn peak_on_slope(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let x = i as f64;
                200.0 - 0.5 * x + 400.0 * gauss_pdf(x, n as f64 / 2.0, 3.0)
            })
            .collect()
    }

    #[test]
    fn test_baseline_is_non_negative() {
        let y: Vec<f64> = (0..64).map(|i| if i % 9 == 0 { -20.0 } else { 3.0 }).collect();
        let result = compute_baseline(&y, &BaselineConfig::default()).unwrap();

        assert_eq!(result.baseline.len(), y.len());
        assert_eq!(result.smoothed.len(), y.len());
        assert!(result.baseline.iter().all(|&b| b >= 0.0));
    }

    #[test]
    fn test_constant_spectrum() {
        let result = compute_baseline(&[25.0; 40], &BaselineConfig::default()).unwrap();
        for (&b, &s) in result.baseline.iter().zip(&result.smoothed) {
            assert_relative_eq!(b, 25.0, epsilon = 1e-9);
            assert_relative_eq!(s, 25.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_baseline_stays_below_peak() {
        let n = 128;
        let y = peak_on_slope(n);
        let result = compute_baseline(&y, &BaselineConfig::default().with_mu(5.0)).unwrap();

        let centre = n / 2;
        assert!(result.baseline[centre] < result.smoothed[centre]);
        let net = result.net();
        assert!(net[centre] > 10.0);
        assert!(net[centre] > 5.0 * net[10].abs());
    }

    #[test]
    fn test_zero_iterations() {
        let y = peak_on_slope(32);
        let config = BaselineConfig::default().with_iterations(0);
        let result = compute_baseline(&y, &config).unwrap();

        let u = smooth_view(ArrayView1::from(&y[..]), config.mu * config.fine_ratio).unwrap();
        let x = smooth_view(u.view(), config.mu).unwrap();
        for (got, want) in result.baseline.iter().zip(x.iter()) {
            assert_relative_eq!(*got, want.max(0.0));
        }
    }

    #[test]
    fn test_invalid_config() {
        let config = BaselineConfig::default().with_mu(-1.0);
        assert!(matches!(
            compute_baseline(&[1.0, 2.0], &config),
            Err(SmoothError::InvalidConfig { .. })
        ));
    }
}
