//! # Spectra Math
//!
//! Numerical core for smoothing gamma-ray spectra.
//!
//! This crate provides:
//!
//! - **Band construction**: The position-weighted smoothing penalty matrix
//! - **Forward elimination**: Tridiagonal reduction without pivoting, carrying
//!   augmented columns and a right-hand side along
//! - **Block elimination**: Schur-complement merge of a partitioned system
//! - **Lower solve**: Dense direct solve or non-negative least squares
//! - **Distributions**: Peak-shape densities
//!
//! ## Design Philosophy
//!
//! - **In place**: Every routine mutates caller-owned buffers; nothing is
//!   allocated in the sweeps
//! - **Eager shape checks**: Bad shapes fail before any buffer is touched
//! - **No pivot checks**: Diagonal dominance is a documented precondition,
//!   reported after the fact rather than enforced

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]

pub mod distributions;
pub mod error;
pub mod linear_algebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::distributions::gauss_pdf;
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{
        back_propagate, back_substitute, diagonal_ordered_to_rows, fill_penalty_rows,
        fill_smooth, nnls, reduce_tridiag, zero_lower, AugmentedSolution, LowerSolve,
        NnlsConfig, PartitionedSystem, PivotReport,
    };
}

pub use error::{MathError, MathResult};
