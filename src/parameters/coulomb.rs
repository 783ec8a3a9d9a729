//! parameters::coulomb — Coulomb friction angle and cohesion.
//!
//! Purpose
//! -------
//! Convert s'–t (triaxial) or σ'n–τ (direct simple shear) lines into tan φ
//! and cohesion, and provide the stress-ratio alternative that estimates
//! tan φ from the log-mean of τ/σ' without a cohesion intercept.
//!
//! Conventions
//! -----------
//! - Triaxial lines have slope sin φ, so |slope| < 1 is required.
//! - Angles are reported in degrees; all arithmetic stays in tan φ.

use ndarray::{Array1, ArrayView1};

use crate::{
    estimation::{
        critical::ConfidenceLevel,
        envelope::MeanBounds,
        errors::{EstimationError, EstimationResult},
        validation::validate_pairs,
    },
    samples::schema::TestType,
};

/// tan φ of a line with `slope`.
///
/// Errors
/// ------
/// - `InvalidPhysicalValue` for a triaxial slope outside (−1, 1).
pub fn tan_phi(test_type: TestType, slope: f64) -> EstimationResult<f64> {
    match test_type {
        TestType::Triaxial => Ok(slope / triaxial_cos(slope)?),
        TestType::DirectSimpleShear => Ok(slope),
    }
}

/// Cohesion of a line with `slope` and `intercept`.
///
/// Errors
/// ------
/// - `InvalidPhysicalValue` for a triaxial slope outside (−1, 1).
pub fn cohesion(test_type: TestType, slope: f64, intercept: f64) -> EstimationResult<f64> {
    match test_type {
        TestType::Triaxial => Ok(intercept / triaxial_cos(slope)?),
        TestType::DirectSimpleShear => Ok(intercept),
    }
}

/// Angle in degrees of a tangent.
pub fn degrees(tan: f64) -> f64 {
    tan.atan().to_degrees()
}

/// Log-mean bounds of the stress ratio ln(τ/σ').
///
/// Parameters
/// ----------
/// - `effective`, `shear`: `ArrayView1<f64>`
///   Effective (mean or normal) stress and shear stress per sample.
/// - `alpha`: `f64`
///   Locality weight in (0, 1].
///
/// Returns
/// -------
/// `EstimationResult<MeanBounds>`
///   Bounds in the log domain with the one-sided 5% / n − 1 convention.
///   `exp(lower)` is the characteristic ratio.
///
/// Errors
/// ------
/// - `InvalidPhysicalValue` when a ratio τ/σ' is not strictly positive.
/// - Errors of [`MeanBounds::new`].
pub fn stress_ratio_bounds(
    effective: ArrayView1<f64>, shear: ArrayView1<f64>, alpha: f64,
) -> EstimationResult<MeanBounds> {
    validate_pairs(effective, shear, 2, "stress ratio")?;
    let ln_ratio = effective
        .iter()
        .zip(shear.iter())
        .map(|(&s, &t)| {
            let ratio = t / s;
            if ratio > 0.0 && ratio.is_finite() {
                Ok(ratio.ln())
            } else {
                Err(EstimationError::InvalidPhysicalValue { quantity: "stress ratio", value: ratio })
            }
        })
        .collect::<EstimationResult<Array1<f64>>>()?;
    MeanBounds::new(ln_ratio.view(), alpha, ConfidenceLevel::OneSided5)
}

fn triaxial_cos(slope: f64) -> EstimationResult<f64> {
    let cos_sq = 1.0 - slope * slope;
    if cos_sq > 0.0 {
        Ok(cos_sq.sqrt())
    } else {
        Err(EstimationError::InvalidPhysicalValue { quantity: "triaxial slope sin φ", value: slope })
    }
}
