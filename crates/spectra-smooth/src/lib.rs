//! # Spectra Smooth
//!
//! Spectrum-level operations built on the banded solver in `spectra-math`.
//!
//! This crate provides:
//!
//! - **Smoothing**: Position-weighted smoothing of a single spectrum or a
//!   batch of spectra in parallel
//! - **Baseline estimation**: Iterative lower envelope of a spectrum
//! - **Continuum fitting**: Joint fit of a smooth continuum and the
//!   intensities of known peak shapes
//! - **Configuration**: Serde-backed settings readable from TOML or JSON
//!
//! ## Example
//!
//! ```rust
//! use spectra_smooth::prelude::*;
//!
//! let smoothed = smooth(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 1.0).unwrap();
//! assert!((smoothed[5] - 3.91417166).abs() < 1e-8);
//!
//! let baseline = compute_baseline(&smoothed, &BaselineConfig::default()).unwrap();
//! assert!(baseline.baseline.iter().all(|&b| b >= 0.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unreadable_literal)]

pub mod baseline;
pub mod config;
pub mod continuum;
pub mod error;
pub mod smoothing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::baseline::{compute_baseline, Baseline};
    pub use crate::config::{
        BaselineConfig, ConfigFormat, ContinuumConfig, LowerSolveKind, SmoothingConfig,
        SpectraConfig, Validate,
    };
    pub use crate::continuum::{fit_continuum, ContinuumFit};
    pub use crate::error::{SmoothError, SmoothResult};
    pub use crate::smoothing::{smooth, smooth_many};
}

pub use error::{SmoothError, SmoothResult};
