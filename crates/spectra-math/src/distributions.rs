//! Peak-shape density functions.

use std::f64::consts::PI;

/// Gaussian probability density at `x` for mean `mu` and standard
/// deviation `std`.
pub fn gauss_pdf(x: f64, mu: f64, std: f64) -> f64 {
    let z = (x - mu) / std;
    (-0.5 * z * z).exp() / (std * (2.0 * PI).sqrt())
}
