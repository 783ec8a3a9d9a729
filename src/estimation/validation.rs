//! estimation::validation — shared input guards for the estimation stages.
//!
//! Purpose
//! -------
//! Centralize the checks every numeric stage performs before doing any work:
//! paired lengths, minimum counts, finiteness, and the numeric settings
//! (locality weight, material factors, manual overrides).
//!
//! Conventions
//! -----------
//! - Pure functions returning `EstimationResult<()>` (or the validated
//!   value); no allocation beyond error construction.
//! - `context` strings name the calling stage and end up in
//!   `EstimationError::InsufficientData`.

use ndarray::ArrayView1;

use crate::estimation::errors::{EstimationError, EstimationResult};

/// Validate paired regression inputs.
///
/// Parameters
/// ----------
/// - `x`, `y`: `ArrayView1<f64>`
///   Paired observations; must have equal length and finite entries.
/// - `min_len`: `usize`
///   Minimum number of pairs the caller needs.
/// - `context`: `&'static str`
///   Stage name reported on `InsufficientData`.
///
/// Errors
/// ------
/// - `EstimationError::LengthMismatch`
/// - `EstimationError::InsufficientData` when `x.len() < min_len`.
/// - `EstimationError::NonFiniteData` with the first offending index
///   (x checked before y at each index).
pub fn validate_pairs(
    x: ArrayView1<f64>, y: ArrayView1<f64>, min_len: usize, context: &'static str,
) -> EstimationResult<()> {
    if x.len() != y.len() {
        return Err(EstimationError::LengthMismatch { x_len: x.len(), y_len: y.len() });
    }
    if x.len() < min_len {
        return Err(EstimationError::InsufficientData { required: min_len, actual: x.len(), context });
    }
    for (index, (&xi, &yi)) in x.iter().zip(y.iter()).enumerate() {
        if !xi.is_finite() {
            return Err(EstimationError::NonFiniteData { index, value: xi });
        }
        if !yi.is_finite() {
            return Err(EstimationError::NonFiniteData { index, value: yi });
        }
    }
    Ok(())
}

/// Validate a locality weight: finite and in (0, 1].
pub fn validate_alpha(alpha: f64) -> EstimationResult<f64> {
    if alpha.is_finite() && alpha > 0.0 && alpha <= 1.0 {
        Ok(alpha)
    } else {
        Err(EstimationError::ConfigurationError {
            parameter: "locality weight alpha",
            value: alpha,
            reason: "Must lie in (0, 1].",
        })
    }
}

/// Validate a partial material factor: finite and strictly positive.
pub fn validate_material_factor(parameter: &'static str, value: f64) -> EstimationResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EstimationError::ConfigurationError {
            parameter,
            value,
            reason: "Must be finite and strictly positive.",
        })
    }
}

/// Validate a manual override value: finite.
pub fn validate_override(parameter: &'static str, value: f64) -> EstimationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EstimationError::ConfigurationError {
            parameter,
            value,
            reason: "Manual values must be finite.",
        })
    }
}

/// Turn a non-finite computed value into `NonFiniteResult`.
pub(crate) fn finite(quantity: &'static str, value: f64) -> EstimationResult<f64> {
    if value.is_finite() { Ok(value) } else { Err(EstimationError::NonFiniteResult { quantity }) }
}
