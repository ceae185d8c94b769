//! Error types for spectrum-level operations.

use spectra_math::MathError;
use thiserror::Error;

/// Result type for spectrum-level operations.
pub type SmoothResult<T> = Result<T, SmoothError>;

/// Errors from smoothing, baseline estimation and continuum fitting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmoothError {
    /// Error raised by the numerical core.
    #[error(transparent)]
    Math(#[from] MathError),

    /// A setting is out of range.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the setting.
        reason: String,
    },

    /// Configuration text could not be parsed.
    #[error("Parse error: {reason}")]
    Parse {
        /// Parser message.
        reason: String,
    },
}

impl SmoothError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            reason: reason.to_string(),
        }
    }
}
