//! parameters::power_law — Su = S · σ'v^(1 − m) on overconsolidated samples.
//!
//! Purpose
//! -------
//! Transform log-log fits of ln Su against ln σ'v,c into the reference
//! strength S (strength at σ'v = 1 kPa) and exponent m, evaluate strength
//! tables, and derive a characteristic strength under a constant coefficient
//! of variation.
//!
//! Conventions
//! -----------
//! - Stresses in kPa.
//! - Table stresses are 1, 5, 10, 20, 30 and 40 kPa followed by the largest
//!   observed stress.

use statrs::distribution::{ContinuousCDF, LogNormal};

use crate::estimation::{
    errors::{EstimationError, EstimationResult},
    validation::finite,
};

/// Fixed stresses of a strength table, before the observed maximum.
pub const TABLE_STRESSES: [f64; 6] = [1.0, 5.0, 10.0, 20.0, 30.0, 40.0];

/// Lower-tail probability of the constant-CoV characteristic strength.
const CHARACTERISTIC_QUANTILE: f64 = 0.05;

/// S = exp(intercept) of a ln σ'v – ln Su line.
pub fn reference_strength(intercept: f64) -> f64 {
    intercept.exp()
}

/// m = 1 − slope of a ln σ'v – ln Su line.
pub fn exponent(slope: f64) -> f64 {
    1.0 - slope
}

/// Su = S · σ'v^(1 − m).
pub fn strength_at(reference_strength: f64, exponent: f64, stress: f64) -> f64 {
    reference_strength * stress.powf(1.0 - exponent)
}

/// One row of a strength table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthPoint {
    pub stress: f64,
    pub strength: f64,
    /// Constant-CoV characteristic strength, when a CoV was supplied.
    pub characteristic: Option<f64>,
}

/// Strength table at [`TABLE_STRESSES`] and `max_stress`.
///
/// Parameters
/// ----------
/// - `reference_strength`, `exponent`: S and m of the mean line.
/// - `max_stress`: largest observed σ'v,c, appended as the last row.
/// - `coefficient_of_variation`: optional CoV of Su; adds the constant-CoV
///   characteristic strength per row.
///
/// Errors
/// ------
/// - Errors of [`constant_cov_characteristic`].
/// - `NonFiniteResult` when a strength overflows.
pub fn strength_table(
    reference_strength: f64, exponent: f64, max_stress: f64,
    coefficient_of_variation: Option<f64>,
) -> EstimationResult<Vec<StrengthPoint>> {
    TABLE_STRESSES
        .iter()
        .copied()
        .chain(std::iter::once(max_stress))
        .map(|stress| {
            let strength =
                finite("undrained strength", strength_at(reference_strength, exponent, stress))?;
            let characteristic = coefficient_of_variation
                .map(|vc| constant_cov_characteristic(strength, vc))
                .transpose()?;
            Ok(StrengthPoint { stress, strength, characteristic })
        })
        .collect()
}

/// 5% quantile of a log-normal strength with mean `mean` and CoV `vc`.
///
/// σ_ln = sqrt(ln(1 + vc²)), μ_ln = ln(mean) − σ_ln²/2.
///
/// Errors
/// ------
/// - `ConfigurationError` when `vc` is not finite and strictly positive.
/// - `InvalidPhysicalValue` when `mean` is not strictly positive.
/// - `Distribution` if statrs rejects the parameters.
pub fn constant_cov_characteristic(mean: f64, vc: f64) -> EstimationResult<f64> {
    if !(vc.is_finite() && vc > 0.0) {
        return Err(EstimationError::ConfigurationError {
            parameter: "coefficient of variation",
            value: vc,
            reason: "Must be finite and strictly positive.",
        });
    }
    if mean.is_nan() || mean <= 0.0 {
        return Err(EstimationError::InvalidPhysicalValue {
            quantity: "undrained strength",
            value: mean,
        });
    }
    let sigma = (1.0 + vc * vc).ln().sqrt();
    let dist = LogNormal::new(mean.ln() - 0.5 * sigma * sigma, sigma)
        .map_err(|e| EstimationError::Distribution { reason: e.to_string() })?;
    Ok(dist.inverse_cdf(CHARACTERISTIC_QUANTILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // The strength law reduces to S at σ'v = 1 and to a linear law at m = 0.
    //
    // Given
    // -----
    // - S = 0.3, m ∈ {0.2, 0}.
    //
    // Expect
    // ------
    // - Su(1) = 0.3; Su(50) with m = 0 is 15.
    fn strength_at_reference_and_linear_cases() {
        assert_relative_eq!(strength_at(0.3, 0.2, 1.0), 0.3, epsilon = 1e-12);
        assert_relative_eq!(strength_at(0.3, 0.0, 50.0), 15.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The table lists the fixed stresses followed by the observed maximum.
    //
    // Given
    // -----
    // - max stress 75 kPa, no CoV.
    //
    // Expect
    // ------
    // - 7 rows, the last at 75 kPa, no characteristic column.
    fn strength_table_appends_max_stress() {
        let table = strength_table(0.3, 0.2, 75.0, None).unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(table[6].stress, 75.0);
        assert!(table.iter().all(|p| p.characteristic.is_none()));
    }

    #[test]
    // Purpose
    // -------
    // The constant-CoV characteristic value sits below the mean and matches
    // exp(μ + z₀.₀₅σ).
    //
    // Given
    // -----
    // - mean 20 kPa, vc = 0.25.
    //
    // Expect
    // ------
    // - exp(ln 20 − σ²/2 − 1.644854σ) with σ = sqrt(ln 1.0625).
    fn constant_cov_characteristic_matches_lognormal_quantile() {
        // Arrange
        let sigma = 1.0625_f64.ln().sqrt();
        let expected = (20.0_f64.ln() - 0.5 * sigma * sigma - 1.6448536 * sigma).exp();

        // Act
        let kar = constant_cov_characteristic(20.0, 0.25).unwrap();

        // Assert
        assert_relative_eq!(kar, expected, max_relative = 1e-5);
        assert!(kar < 20.0);
    }

    #[test]
    // Purpose
    // -------
    // Invalid CoV values are configuration errors.
    //
    // Given
    // -----
    // - vc = 0.
    //
    // Expect
    // ------
    // - `ConfigurationError`.
    fn constant_cov_rejects_zero_cov() {
        assert!(matches!(
            constant_cov_characteristic(20.0, 0.0),
            Err(EstimationError::ConfigurationError { .. })
        ));
    }
}
