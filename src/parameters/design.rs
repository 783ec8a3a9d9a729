//! parameters::design — DesignValueCalculator.
//!
//! design = characteristic / material factor, per physical quantity. Friction
//! angles are divided in tan φ, not in degrees. No clamping is applied.

use serde::{Deserialize, Serialize};

use crate::estimation::{
    errors::EstimationResult,
    validation::{finite, validate_material_factor},
};

/// MaterialFactors — partial factors for the primary and secondary quantity.
///
/// Invariants
/// ----------
/// - Both factors are finite and strictly positive (checked by
///   [`MaterialFactors::new`]).
///
/// Notes
/// -----
/// - The factor of a friction angle applies to tan φ.
/// - Factors above 1 are accepted; codes quote partial factors either as
///   divisors ≥ 1 or as their reciprocals in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFactors")]
pub struct MaterialFactors {
    primary: f64,
    secondary: f64,
}

#[derive(Deserialize)]
struct RawFactors {
    primary: f64,
    secondary: f64,
}

impl TryFrom<RawFactors> for MaterialFactors {
    type Error = crate::estimation::errors::EstimationError;

    fn try_from(raw: RawFactors) -> Result<Self, Self::Error> {
        MaterialFactors::new(raw.primary, raw.secondary)
    }
}

impl MaterialFactors {
    /// Errors
    /// ------
    /// - `ConfigurationError` for a zero, negative or non-finite factor.
    pub fn new(primary: f64, secondary: f64) -> EstimationResult<Self> {
        Ok(MaterialFactors {
            primary: validate_material_factor("primary material factor", primary)?,
            secondary: validate_material_factor("secondary material factor", secondary)?,
        })
    }

    pub fn primary(&self) -> f64 {
        self.primary
    }

    pub fn secondary(&self) -> f64 {
        self.secondary
    }
}

impl Default for MaterialFactors {
    fn default() -> Self {
        MaterialFactors { primary: 1.0, secondary: 1.0 }
    }
}

/// characteristic / factor.
///
/// Errors
/// ------
/// - `ConfigurationError` when `factor` is zero, negative or non-finite.
/// - `NonFiniteResult` when the quotient overflows.
pub fn design_value(characteristic: f64, factor: f64) -> EstimationResult<f64> {
    let factor = validate_material_factor("material factor", factor)?;
    finite("design value", characteristic / factor)
}
