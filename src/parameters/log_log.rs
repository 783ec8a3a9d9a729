//! parameters::log_log — SHANSEP strength ratio S, exponent m and POP.
//!
//! Purpose
//! -------
//! Transform fits of ln(Su/σ'v,c) against ln OCR into the normally
//! consolidated strength ratio S = exp(intercept) and exponent m = slope,
//! derive the pre-overburden pressure POP from a linear Su–σ'v,c fit, and
//! evaluate the SHANSEP strength law
//!
//! Su(σ'v) = S · σ'v · ((POP + σ'v) / σ'v)^m.
//!
//! Conventions
//! -----------
//! - Stresses and POP in kPa.
//! - Table stresses are 0.1, 1, 5, 10, 20 and 30 kPa followed by the largest
//!   observed stress.

use crate::estimation::{
    errors::{EstimationError, EstimationResult},
    validation::finite,
};

/// Fixed stresses of a SHANSEP strength table, before the observed maximum.
pub const TABLE_STRESSES: [f64; 6] = [0.1, 1.0, 5.0, 10.0, 20.0, 30.0];

/// S = exp(intercept).
pub fn strength_ratio(intercept: f64) -> f64 {
    intercept.exp()
}

/// m = slope.
pub fn exponent(slope: f64) -> f64 {
    slope
}

/// POP = intercept / S / m from the linear Su–σ'v,c intercept (kPa).
///
/// Errors
/// ------
/// - `InvalidPhysicalValue` when S · m is zero.
/// - `NonFiniteResult` on overflow.
pub fn pre_overburden_pressure(
    linear_intercept: f64, strength_ratio: f64, exponent: f64,
) -> EstimationResult<f64> {
    let denom = strength_ratio * exponent;
    if denom == 0.0 {
        return Err(EstimationError::InvalidPhysicalValue {
            quantity: "strength ratio × exponent",
            value: denom,
        });
    }
    finite("pre-overburden pressure", linear_intercept / denom)
}

/// POP of one sample: σ'v,0 · OCR − σ'v,0.
pub fn sample_pop(in_situ_stress: f64, ocr: f64) -> f64 {
    in_situ_stress * ocr - in_situ_stress
}

/// Su(σ'v) = S · σ'v · ((POP + σ'v) / σ'v)^m.
pub fn shansep_strength(strength_ratio: f64, exponent: f64, pop: f64, stress: f64) -> f64 {
    strength_ratio * stress * ((pop + stress) / stress).powf(exponent)
}

/// (σ'v, Su) rows at [`TABLE_STRESSES`] and `max_stress`.
///
/// Errors
/// ------
/// - `NonFiniteResult` when a strength is not finite (e.g. POP + σ'v < 0
///   with a fractional exponent).
pub fn strength_table(
    strength_ratio: f64, exponent: f64, pop: f64, max_stress: f64,
) -> EstimationResult<Vec<(f64, f64)>> {
    TABLE_STRESSES
        .iter()
        .copied()
        .chain(std::iter::once(max_stress))
        .map(|stress| {
            let su = shansep_strength(strength_ratio, exponent, pop, stress);
            Ok((stress, finite("SHANSEP strength", su)?))
        })
        .collect()
}
