//! parameters::dispersion — DispersionEstimator.
//!
//! Purpose
//! -------
//! Back-solve the standard deviation implied by a (mean, design) pair under a
//! log-normal model in which the design value is the one-sided 5% quantile:
//!
//! std = mean · sqrt(exp(((2z + sqrt((2z)² + 8(ln mean − ln design))) / 2)²) − 1),
//! z = Φ⁻¹(0.05).
//!
//! Key behaviors
//! -------------
//! - [`implied_std_dev`] is the raw solve; it rejects non-positive inputs
//!   with `InvalidPhysicalValue`.
//! - [`estimate`] wraps the solve with a per-quantity [`NonPositivePolicy`]
//!   and reports any recovery as a [`DispersionNote`].
//!
//! Invariants & assumptions
//! ------------------------
//! - std = 0 exactly when mean = design.
//! - std grows strictly with |ln mean − ln design| while the discriminant
//!   stays non-negative; beyond that no log-normal fits and the solve fails.
//!
//! Conventions
//! -----------
//! - Policies in use: friction angles reject, cohesion substitutes
//!   [`EPSILON_SUBSTITUTE`], ratios, exponents and POP report unavailable.

use statrs::distribution::{ContinuousCDF, Normal};
use tracing::warn;

use crate::{
    estimation::errors::{EstimationError, EstimationResult},
    parameters::variant::Quantity,
};

/// One-sided lower-tail probability of the design value.
pub const DESIGN_QUANTILE: f64 = 0.05;

/// Value substituted for non-positive inputs under
/// [`NonPositivePolicy::SubstituteEpsilon`].
pub const EPSILON_SUBSTITUTE: f64 = 0.01;

/// Implied standard deviation of a log-normal quantity.
///
/// Parameters
/// ----------
/// - `mean`: `f64`
///   Mean value, > 0.
/// - `design`: `f64`
///   Design value, > 0.
///
/// Errors
/// ------
/// - `InvalidPhysicalValue` when either input is not strictly positive.
/// - `NonFiniteResult` when no log-normal reproduces the pair (negative
///   discriminant) or the result overflows.
///
/// Examples
/// --------
/// ```rust
/// # use soil_strength::parameters::dispersion::implied_std_dev;
/// assert!(implied_std_dev(25.0, 25.0).unwrap() < 1e-12);
/// assert!(implied_std_dev(25.0, 20.0).unwrap() > 0.0);
/// ```
pub fn implied_std_dev(mean: f64, design: f64) -> EstimationResult<f64> {
    for (quantity, value) in [("mean value", mean), ("design value", design)] {
        if value.is_nan() || value <= 0.0 {
            return Err(EstimationError::InvalidPhysicalValue { quantity, value });
        }
    }
    if mean == design {
        return Ok(0.0);
    }
    let z = Normal::new(0.0, 1.0)
        .map_err(|e| EstimationError::Distribution { reason: e.to_string() })?
        .inverse_cdf(DESIGN_QUANTILE);
    let two_z = 2.0 * z;
    let discriminant = two_z * two_z + 8.0 * (mean.ln() - design.ln());
    if discriminant < 0.0 {
        return Err(EstimationError::NonFiniteResult { quantity: "implied standard deviation" });
    }
    let root = (two_z + discriminant.sqrt()) / 2.0;
    let std = mean * (root * root).exp_m1().sqrt();
    if std.is_finite() {
        Ok(std)
    } else {
        Err(EstimationError::NonFiniteResult { quantity: "implied standard deviation" })
    }
}

/// How [`estimate`] treats a non-positive mean or design value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NonPositivePolicy {
    /// Propagate `InvalidPhysicalValue`.
    Reject,
    /// Replace each non-positive input by [`EPSILON_SUBSTITUTE`] and continue.
    SubstituteEpsilon,
    /// Report the standard deviation as unavailable.
    Unavailable,
}

impl NonPositivePolicy {
    /// Policy applied to `quantity` by the engineering result.
    pub fn for_quantity(quantity: Quantity) -> Self {
        match quantity {
            Quantity::FrictionAngle => NonPositivePolicy::Reject,
            Quantity::Cohesion => NonPositivePolicy::SubstituteEpsilon,
            Quantity::StrengthRatio
            | Quantity::StrengthIntercept
            | Quantity::Exponent
            | Quantity::PreOverburdenPressure => NonPositivePolicy::Unavailable,
        }
    }
}

/// Recovery applied by [`estimate`].
#[derive(Debug, Clone, PartialEq)]
pub enum DispersionNote {
    Substituted { mean: f64, design: f64, epsilon: f64 },
    Unavailable { reason: String },
}

/// Standard deviation plus any recovery note.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionOutcome {
    pub std_dev: Option<f64>,
    pub note: Option<DispersionNote>,
}

/// Implied standard deviation of `quantity` under `policy`.
///
/// Solve failures other than non-positive inputs (negative discriminant,
/// overflow) are reported as unavailable for every policy.
///
/// Errors
/// ------
/// - `InvalidPhysicalValue` only under [`NonPositivePolicy::Reject`].
pub fn estimate(
    quantity: &'static str, mean: f64, design: f64, policy: NonPositivePolicy,
) -> EstimationResult<DispersionOutcome> {
    let non_positive = |v: f64| v.is_nan() || v <= 0.0;
    if non_positive(mean) || non_positive(design) {
        match policy {
            NonPositivePolicy::Reject => {
                let value = if non_positive(mean) { mean } else { design };
                return Err(EstimationError::InvalidPhysicalValue { quantity, value });
            }
            NonPositivePolicy::SubstituteEpsilon => {
                warn!(
                    quantity,
                    mean,
                    design,
                    epsilon = EPSILON_SUBSTITUTE,
                    "non-positive value in dispersion solve; substituting epsilon"
                );
                let m = if non_positive(mean) { EPSILON_SUBSTITUTE } else { mean };
                let d = if non_positive(design) { EPSILON_SUBSTITUTE } else { design };
                let note = DispersionNote::Substituted { mean, design, epsilon: EPSILON_SUBSTITUTE };
                return Ok(match implied_std_dev(m, d) {
                    Ok(std) => DispersionOutcome { std_dev: Some(std), note: Some(note) },
                    Err(err) => unavailable(quantity, err.to_string()),
                });
            }
            NonPositivePolicy::Unavailable => {
                return Ok(unavailable(
                    quantity,
                    format!("mean {mean} and design {design} must both be positive"),
                ));
            }
        }
    }
    Ok(match implied_std_dev(mean, design) {
        Ok(std) => DispersionOutcome { std_dev: Some(std), note: None },
        Err(err) => unavailable(quantity, err.to_string()),
    })
}

fn unavailable(quantity: &'static str, reason: String) -> DispersionOutcome {
    warn!(quantity, %reason, "standard deviation unavailable");
    DispersionOutcome { std_dev: None, note: Some(DispersionNote::Unavailable { reason }) }
}
