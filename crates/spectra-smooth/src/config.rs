//! Configuration for smoothing, baseline estimation and continuum fitting.
//!
//! Every config type deserializes with defaults for missing fields, so a
//! partial TOML or JSON document is enough:
//!
//! ```rust
//! use spectra_smooth::config::{ConfigFormat, ContinuumConfig, LowerSolveKind};
//!
//! let config = ContinuumConfig::from_toml_str("mu = 2.5\nlld = 45").unwrap();
//! assert_eq!(config.mu, 2.5);
//! assert_eq!(config.lld, 45);
//! assert_eq!(config.lower_solve, LowerSolveKind::NonNegative);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spectra_math::linear_algebra::{LowerSolve, NnlsConfig, DEFAULT_NNLS_TOLERANCE};

use crate::error::{SmoothError, SmoothResult};

// =============================================================================
// TRAITS
// =============================================================================

/// Range checks for a configuration.
pub trait Validate {
    /// Returns the first out-of-range setting as an error.
    fn validate(&self) -> SmoothResult<()>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Parsing from configuration text. Parsed values are validated.
pub trait ConfigFormat: DeserializeOwned + Validate {
    /// Parses and validates a TOML document.
    fn from_toml_str(text: &str) -> SmoothResult<Self> {
        let config: Self = toml::from_str(text).map_err(SmoothError::parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    fn from_json_str(text: &str) -> SmoothResult<Self> {
        let config: Self = serde_json::from_str(text).map_err(SmoothError::parse)?;
        config.validate()?;
        Ok(config)
    }
}

impl<T: DeserializeOwned + Validate> ConfigFormat for T {}

fn ensure_strength(field: &str, value: f64) -> SmoothResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SmoothError::invalid_config(format!(
            "{field} must be finite and non-negative, got {value}"
        )))
    }
}

// =============================================================================
// SMOOTHING
// =============================================================================

/// Settings for plain smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Smoothing strength; the coupling of channel `i` is `i * strength`.
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_strength() -> f64 {
    1.0
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            strength: default_strength(),
        }
    }
}

impl SmoothingConfig {
    /// Creates a config with the given strength.
    pub fn new(strength: f64) -> Self {
        Self { strength }
    }

    /// Sets the smoothing strength.
    #[must_use]
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }
}

impl Validate for SmoothingConfig {
    fn validate(&self) -> SmoothResult<()> {
        ensure_strength("strength", self.strength)
    }
}

// =============================================================================
// BASELINE
// =============================================================================

/// Settings for [`compute_baseline`](crate::baseline::compute_baseline).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Strength of the envelope smoothing.
    #[serde(default = "default_mu")]
    pub mu: f64,

    /// Fraction of `mu` used for the initial light smoothing.
    #[serde(default = "default_fine_ratio")]
    pub fine_ratio: f64,

    /// Refinement passes; each halves the strength.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_mu() -> f64 {
    1.0
}

fn default_fine_ratio() -> f64 {
    0.05
}

fn default_iterations() -> u32 {
    2
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            mu: default_mu(),
            fine_ratio: default_fine_ratio(),
            iterations: default_iterations(),
        }
    }
}

impl BaselineConfig {
    /// Sets the envelope smoothing strength.
    #[must_use]
    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    /// Sets the initial smoothing fraction.
    #[must_use]
    pub fn with_fine_ratio(mut self, fine_ratio: f64) -> Self {
        self.fine_ratio = fine_ratio;
        self
    }

    /// Sets the number of refinement passes.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }
}

impl Validate for BaselineConfig {
    fn validate(&self) -> SmoothResult<()> {
        ensure_strength("mu", self.mu)?;
        ensure_strength("fine_ratio", self.fine_ratio)
    }
}

// =============================================================================
// CONTINUUM
// =============================================================================

/// Solver used for the peak intensities of a continuum fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowerSolveKind {
    /// Dense LU; intensities may come out negative.
    Direct,
    /// Non-negative least squares.
    #[default]
    NonNegative,
}

/// Settings for [`fit_continuum`](crate::continuum::fit_continuum).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuumConfig {
    /// Continuum smoothing strength.
    #[serde(default = "default_mu")]
    pub mu: f64,

    /// Lower-level discriminator: channels up to and including this one are
    /// left unsmoothed.
    #[serde(default)]
    pub lld: usize,

    /// Solver for the peak intensities.
    #[serde(default)]
    pub lower_solve: LowerSolveKind,

    /// NNLS optimality tolerance.
    #[serde(default = "default_nnls_tolerance")]
    pub nnls_tolerance: f64,

    /// NNLS subproblem cap; `None` uses three times the number of peaks.
    #[serde(default)]
    pub nnls_max_iterations: Option<u32>,
}

fn default_nnls_tolerance() -> f64 {
    DEFAULT_NNLS_TOLERANCE
}

impl Default for ContinuumConfig {
    fn default() -> Self {
        Self {
            mu: default_mu(),
            lld: 0,
            lower_solve: LowerSolveKind::default(),
            nnls_tolerance: default_nnls_tolerance(),
            nnls_max_iterations: None,
        }
    }
}

impl ContinuumConfig {
    /// Sets the continuum smoothing strength.
    #[must_use]
    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    /// Sets the lower-level discriminator channel.
    #[must_use]
    pub fn with_lld(mut self, lld: usize) -> Self {
        self.lld = lld;
        self
    }

    /// Sets the intensity solver.
    #[must_use]
    pub fn with_lower_solve(mut self, lower_solve: LowerSolveKind) -> Self {
        self.lower_solve = lower_solve;
        self
    }

    /// Sets the NNLS tolerance.
    #[must_use]
    pub fn with_nnls_tolerance(mut self, tolerance: f64) -> Self {
        self.nnls_tolerance = tolerance;
        self
    }

    /// Caps the number of NNLS subproblems.
    #[must_use]
    pub fn with_nnls_max_iterations(mut self, max_iterations: u32) -> Self {
        self.nnls_max_iterations = Some(max_iterations);
        self
    }

    /// The solver settings handed to the numerical core.
    pub fn lower_solve(&self) -> LowerSolve {
        match self.lower_solve {
            LowerSolveKind::Direct => LowerSolve::Direct,
            LowerSolveKind::NonNegative => {
                let mut nnls = NnlsConfig::default().with_tolerance(self.nnls_tolerance);
                if let Some(max_iterations) = self.nnls_max_iterations {
                    nnls = nnls.with_max_iterations(max_iterations);
                }
                LowerSolve::NonNegative(nnls)
            }
        }
    }
}

impl Validate for ContinuumConfig {
    fn validate(&self) -> SmoothResult<()> {
        ensure_strength("mu", self.mu)?;
        if !(self.nnls_tolerance.is_finite() && self.nnls_tolerance > 0.0) {
            return Err(SmoothError::invalid_config(format!(
                "nnls_tolerance must be finite and positive, got {}",
                self.nnls_tolerance
            )));
        }
        if self.nnls_max_iterations == Some(0) {
            return Err(SmoothError::invalid_config(
                "nnls_max_iterations must be at least 1",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// COMBINED
// =============================================================================

/// All settings in one document, one table per operation.
///
/// ```toml
/// [smoothing]
/// strength = 0.5
///
/// [baseline]
/// mu = 3.0
///
/// [continuum]
/// lld = 45
/// lower_solve = "direct"
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectraConfig {
    /// Plain smoothing.
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    /// Baseline estimation.
    #[serde(default)]
    pub baseline: BaselineConfig,
    /// Continuum fitting.
    #[serde(default)]
    pub continuum: ContinuumConfig,
}

impl Validate for SpectraConfig {
    fn validate(&self) -> SmoothResult<()> {
        self.smoothing.validate()?;
        self.baseline.validate()?;
        self.continuum.validate()
    }
}
