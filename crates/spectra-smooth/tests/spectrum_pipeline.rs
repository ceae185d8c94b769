//! End-to-end tests over synthetic spectra.

use approx::assert_relative_eq;
use ndarray::Array2;
use proptest::prelude::*;
use spectra_math::distributions::gauss_pdf;
use spectra_smooth::prelude::*;

// =============================================================================
// HELPERS
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Unit-area peaks whose width grows with channel, as in a detector response.
fn detector_shapes(n: usize, centres: &[f64]) -> Array2<f64> {
    Array2::from_shape_fn((n, centres.len()), |(ch, p)| {
        let centre = centres[p];
        gauss_pdf(ch as f64, centre, 1.5 + centre / 100.0)
    })
}

fn continuum(n: usize) -> Vec<f64> {
    (0..n)
        .map(|ch| 40.0 + 300.0 * (-(ch as f64) / 80.0).exp())
        .collect()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_smoothing_reference_values() {
    init_tracing();
    let smoothed = smooth(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 1.0).unwrap();
    let expected = [0.0, 1.76047904, 2.52095808, 3.16167665, 3.64271457, 3.91417166];

    assert_relative_eq!(smoothed.iter().sum::<f64>(), 15.0, epsilon = 1e-9);
    for (got, want) in smoothed.iter().zip(expected) {
        assert_relative_eq!(*got, want, epsilon = 1e-8);
    }
}

#[test]
fn test_fit_recovers_known_peak() {
    init_tracing();
    let n = 100;
    let shapes = detector_shapes(n, &[50.0]);
    let counts: Vec<f64> = (0..n)
        .map(|ch| 10.0 + 50.0 * gauss_pdf(ch as f64, 50.0, 1.5 + 0.5))
        .collect();

    let fit = fit_continuum(&counts, shapes.view(), &ContinuumConfig::default()).unwrap();

    assert_relative_eq!(fit.intensities[0], 50.0, epsilon = 1e-6);
    for b in &fit.baseline {
        assert_relative_eq!(*b, 10.0, epsilon = 1e-6);
    }
}

#[test]
fn test_fit_clamps_absent_peak_to_zero() {
    let n = 200;
    let shapes = detector_shapes(n, &[60.0, 140.0]);
    let mut counts = continuum(n);
    for (ch, c) in counts.iter_mut().enumerate() {
        *c += 500.0 * shapes[[ch, 0]];
    }

    let fit = fit_continuum(&counts, shapes.view(), &ContinuumConfig::default()).unwrap();

    assert!(fit.intensities.iter().all(|&i| i >= 0.0));
    assert!(fit.intensities[0] > fit.intensities[1]);
    assert_eq!(fit.intensities[1], 0.0);

    // The unconstrained optimum pushes the absent peak negative.
    let direct = ContinuumConfig::default().with_lower_solve(LowerSolveKind::Direct);
    let fit = fit_continuum(&counts, shapes.view(), &direct).unwrap();
    assert!(fit.intensities[1] < 0.0);
}

#[test]
fn test_config_driven_pipeline() {
    init_tracing();
    let config = SpectraConfig::from_toml_str(
        r#"
        [smoothing]
        strength = 0.2

        [baseline]
        mu = 2.0
        iterations = 3

        [continuum]
        mu = 1.0
        lower_solve = "direct"
        "#,
    )
    .unwrap();

    let n = 150;
    let shapes = detector_shapes(n, &[75.0]);
    let counts: Vec<f64> = continuum(n)
        .iter()
        .enumerate()
        .map(|(ch, c)| c + 800.0 * shapes[[ch, 0]])
        .collect();

    let smoothed = smooth(&counts, config.smoothing.strength).unwrap();
    let baseline = compute_baseline(&smoothed, &config.baseline).unwrap();
    let fit = fit_continuum(&counts, shapes.view(), &config.continuum).unwrap();

    assert_eq!(smoothed.len(), n);
    assert!(baseline.baseline.iter().all(|&b| b >= 0.0));
    assert!(baseline.net()[75] > 0.0);
    assert!(fit.intensities[0] > 0.0);
    assert!(fit.pivots.is_regular());
}

#[test]
fn test_batch_smoothing() {
    let spectra: Vec<Vec<f64>> = (1..=6)
        .map(|k| continuum(64).iter().map(|c| c * k as f64).collect())
        .collect();

    let batch = smooth_many(&spectra, 0.5).unwrap();

    for (k, smoothed) in batch.iter().enumerate() {
        let single = smooth(&spectra[k], 0.5).unwrap();
        assert_eq!(smoothed, &single);
    }
    assert!(matches!(
        smooth_many(&spectra, -1.0),
        Err(SmoothError::InvalidConfig { .. })
    ));
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_smoothing_preserves_total(
        signal in prop::collection::vec(-100.0f64..100.0, 1..80),
        strength in 0.0f64..5.0,
    ) {
        let smoothed = smooth(&signal, strength).unwrap();
        let before: f64 = signal.iter().sum();
        let after: f64 = smoothed.iter().sum();
        prop_assert!((before - after).abs() < 1e-8 * (1.0 + before.abs()));
    }

    #[test]
    fn prop_smoothing_stays_within_range(
        signal in prop::collection::vec(-100.0f64..100.0, 1..80),
        strength in 0.0f64..5.0,
    ) {
        let smoothed = smooth(&signal, strength).unwrap();
        let lo = signal.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for v in smoothed {
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }

    #[test]
    fn prop_baseline_is_non_negative(
        signal in prop::collection::vec(-50.0f64..500.0, 2..100),
        mu in 0.1f64..10.0,
    ) {
        let result = compute_baseline(&signal, &BaselineConfig::default().with_mu(mu)).unwrap();
        prop_assert_eq!(result.baseline.len(), signal.len());
        prop_assert!(result.baseline.iter().all(|&b| b >= 0.0));
    }
}
