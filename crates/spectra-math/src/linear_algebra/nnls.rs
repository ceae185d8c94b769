//! Non-negative least squares (Lawson–Hanson active set).

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Default tolerance for the NNLS optimality test.
pub const DEFAULT_NNLS_TOLERANCE: f64 = 1e-10;

/// Configuration for [`nnls`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NnlsConfig {
    /// Gradient threshold below which a constrained variable stays at zero.
    pub tolerance: f64,
    /// Maximum number of least-squares subproblems. `None` uses three times
    /// the number of unknowns.
    pub max_iterations: Option<u32>,
}

impl Default for NnlsConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_NNLS_TOLERANCE,
            max_iterations: None,
        }
    }
}

impl NnlsConfig {
    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}

/// Solves `min ‖A·x − b‖₂` subject to `x ≥ 0`.
///
/// # Errors
///
/// - [`MathError::DimensionMismatch`] if `b` does not have one entry per row
///   of `a`.
/// - [`MathError::ConvergenceFailed`] if the active set does not settle
///   within the iteration limit.
///
/// # Example
///
/// ```rust
/// use nalgebra::{DMatrix, DVector};
/// use spectra_math::linear_algebra::{nnls, NnlsConfig};
///
/// let a = DMatrix::identity(2, 2);
/// let b = DVector::from_vec(vec![3.0, -1.0]);
/// let x = nnls(&a, &b, &NnlsConfig::default()).unwrap();
/// assert!((x[0] - 3.0).abs() < 1e-12);
/// assert_eq!(x[1], 0.0);
/// ```
pub fn nnls(a: &DMatrix<f64>, b: &DVector<f64>, config: &NnlsConfig) -> MathResult<DVector<f64>> {
    let (m, n) = a.shape();
    if b.len() != m {
        return Err(MathError::DimensionMismatch {
            rows1: m,
            cols1: n,
            rows2: b.len(),
            cols2: 1,
        });
    }

    let max_iterations = config.max_iterations.unwrap_or(3 * n as u32).max(1);
    let mut x = DVector::zeros(n);
    let mut passive = vec![false; n];
    // Entering variable that was dropped straight away; barred from the next pick.
    let mut rejected = None;
    let mut iterations = 0u32;

    loop {
        let gradient = a.tr_mul(&(b - a * &x));
        let candidate = (0..n)
            .filter(|&j| !passive[j] && Some(j) != rejected)
            .filter(|&j| gradient[j] > config.tolerance)
            .max_by(|&p, &q| gradient[p].total_cmp(&gradient[q]));
        let Some(entering) = candidate else { break };
        passive[entering] = true;

        loop {
            iterations += 1;
            if iterations > max_iterations {
                let residual = (b - a * &x).norm();
                return Err(MathError::convergence_failed(max_iterations, residual));
            }

            let z = solve_passive(a, b, &passive)?;
            let infeasible: Vec<usize> = (0..n).filter(|&j| passive[j] && z[j] <= 0.0).collect();
            if infeasible.is_empty() {
                x = z;
                break;
            }

            // Step towards z until the first passive variable hits zero.
            let (blocking, alpha) = infeasible
                .iter()
                .map(|&j| {
                    let gap = x[j] - z[j];
                    (j, if gap > 0.0 { x[j] / gap } else { 0.0 })
                })
                .fold((infeasible[0], f64::INFINITY), |best, cur| {
                    if cur.1 < best.1 {
                        cur
                    } else {
                        best
                    }
                });
            let step = (&z - &x) * alpha;
            x += step;
            for j in 0..n {
                if passive[j] && (j == blocking || x[j] <= config.tolerance) {
                    passive[j] = false;
                    x[j] = 0.0;
                }
            }
            if !passive.contains(&true) {
                break;
            }
        }

        rejected = (!passive[entering]).then_some(entering);
    }

    log::debug!("nnls converged in {iterations} subproblems ({m}x{n})");
    Ok(x)
}

/// Unconstrained least squares over the passive columns; the rest are zero.
fn solve_passive(a: &DMatrix<f64>, b: &DVector<f64>, passive: &[bool]) -> MathResult<DVector<f64>> {
    let columns: Vec<usize> = (0..passive.len()).filter(|&j| passive[j]).collect();
    let sub = DMatrix::from_fn(a.nrows(), columns.len(), |r, c| a[(r, columns[c])]);
    let solution = sub
        .svd(true, true)
        .solve(b, f64::EPSILON)
        .map_err(MathError::invalid_input)?;

    let mut z = DVector::zeros(passive.len());
    for (k, &j) in columns.iter().enumerate() {
        z[j] = solution[k];
    }
    Ok(z)
}
