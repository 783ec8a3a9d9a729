//! estimation — regression, envelopes and characteristic refits.
//!
//! Purpose
//! -------
//! Host the statistical core shared by every strength model: the
//! least-squares fit with its sampling moments, the Student-t confidence
//! envelope with locality pooling, and the two-stage characteristic refit.
//!
//! Key behaviors
//! -------------
//! - [`regression`]: [`RegressionFit`] (unconstrained and fixed-intercept).
//! - [`critical`]: the two supported [`ConfidenceLevel`] conventions.
//! - [`envelope`]: [`ConfidenceCurve`] and [`MeanBounds`].
//! - [`characteristic`]: [`CharacteristicFit`] and [`characteristic_fit`].
//! - [`errors`] / [`validation`]: the crate-wide error type and input guards.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are plain `ndarray` views; nothing in this module knows about
//!   sample tables or physical quantities.
//! - Every function is pure and deterministic.
//!
//! Downstream usage
//! ----------------
//! - `analysis` drives these stages from a `Dataset` and `Settings`.
//! - `parameters` consumes the resulting lines.

pub mod characteristic;
pub mod critical;
pub mod envelope;
pub mod errors;
pub mod regression;
pub mod validation;

// ---- Re-exports ----
pub use self::characteristic::{
    CharacteristicBasis, CharacteristicFit, CharacteristicSource, characteristic_fit,
    constrained_envelope,
};
pub use self::critical::ConfidenceLevel;
pub use self::envelope::{ConfidenceCurve, CurvePoint, MeanBounds, resample_grid};
pub use self::errors::{ErrorKind, EstimationError, EstimationResult};
pub use self::regression::RegressionFit;

pub mod prelude {
    pub use super::{
        CharacteristicFit, CharacteristicSource, ConfidenceCurve, ConfidenceLevel, ErrorKind,
        EstimationError, EstimationResult, MeanBounds, RegressionFit,
    };
}
