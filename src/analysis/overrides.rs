//! analysis::overrides — manual values that replace computed ones.
//!
//! A [`ManualOverride`] holds up to three user-supplied numbers: the mean
//! intercept, the characteristic slope and the characteristic intercept.
//! Each value replaces its computed counterpart everywhere downstream and
//! is never blended with it. `engineering_result` resolves every overridable
//! value once into a [`Resolved`] and works only with that afterwards.

use serde::Serialize;

use crate::estimation::{errors::EstimationResult, validation::validate_override};

/// Optional manual values for one analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ManualOverride {
    mean_intercept: Option<f64>,
    characteristic_slope: Option<f64>,
    characteristic_intercept: Option<f64>,
}

impl ManualOverride {
    pub fn new() -> Self {
        ManualOverride::default()
    }

    pub fn mean_intercept(&self) -> Option<f64> {
        self.mean_intercept
    }

    pub fn characteristic_slope(&self) -> Option<f64> {
        self.characteristic_slope
    }

    pub fn characteristic_intercept(&self) -> Option<f64> {
        self.characteristic_intercept
    }

    /// Fix the intercept of the mean line; `None` clears it.
    ///
    /// Errors
    /// ------
    /// - `ConfigurationError` for a non-finite value; `self` is unchanged.
    pub fn set_mean_intercept(&mut self, value: Option<f64>) -> EstimationResult<()> {
        self.mean_intercept =
            value.map(|v| validate_override("manual mean intercept", v)).transpose()?;
        Ok(())
    }

    /// Errors
    /// ------
    /// - `ConfigurationError` for a non-finite value; `self` is unchanged.
    pub fn set_characteristic_slope(&mut self, value: Option<f64>) -> EstimationResult<()> {
        self.characteristic_slope =
            value.map(|v| validate_override("manual characteristic slope", v)).transpose()?;
        Ok(())
    }

    /// Errors
    /// ------
    /// - `ConfigurationError` for a non-finite value; `self` is unchanged.
    pub fn set_characteristic_intercept(&mut self, value: Option<f64>) -> EstimationResult<()> {
        self.characteristic_intercept =
            value.map(|v| validate_override("manual characteristic intercept", v)).transpose()?;
        Ok(())
    }

    /// Builder form of [`ManualOverride::set_mean_intercept`].
    pub fn with_mean_intercept(mut self, value: f64) -> EstimationResult<Self> {
        self.set_mean_intercept(Some(value))?;
        Ok(self)
    }

    pub fn with_characteristic_slope(mut self, value: f64) -> EstimationResult<Self> {
        self.set_characteristic_slope(Some(value))?;
        Ok(self)
    }

    pub fn with_characteristic_intercept(mut self, value: f64) -> EstimationResult<Self> {
        self.set_characteristic_intercept(Some(value))?;
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.mean_intercept.is_none()
            && self.characteristic_slope.is_none()
            && self.characteristic_intercept.is_none()
    }
}

/// A value that was either computed by the pipeline or supplied by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "lowercase")]
pub enum Resolved<T> {
    Computed(T),
    Manual(T),
}

impl<T: Copy> Resolved<T> {
    /// `Manual(m)` when an override is present, else `Computed(computed)`.
    pub fn resolve(computed: T, manual: Option<T>) -> Self {
        match manual {
            Some(value) => Resolved::Manual(value),
            None => Resolved::Computed(computed),
        }
    }

    pub fn value(self) -> T {
        match self {
            Resolved::Computed(v) | Resolved::Manual(v) => v,
        }
    }

    pub fn is_manual(self) -> bool {
        matches!(self, Resolved::Manual(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Manual values win over computed ones without blending.
    //
    // Given
    // -----
    // - computed 2.0 with and without a manual 5.0.
    //
    // Expect
    // ------
    // - `Manual(5.0)` and `Computed(2.0)` respectively.
    fn resolve_prefers_manual_value() {
        let manual = Resolved::resolve(2.0, Some(5.0));
        let computed = Resolved::resolve(2.0, None);
        assert_eq!(manual, Resolved::Manual(5.0));
        assert!(manual.is_manual());
        assert_eq!(computed.value(), 2.0);
        assert!(!computed.is_manual());
    }

    #[test]
    // Purpose
    // -------
    // Non-finite overrides are rejected and leave the previous value.
    //
    // Given
    // -----
    // - characteristic slope 0.4, then an attempt to set NaN.
    //
    // Expect
    // ------
    // - Error; slope still 0.4. Clearing with `None` succeeds.
    fn setters_reject_non_finite_values() {
        // Arrange
        let mut ov = ManualOverride::new().with_characteristic_slope(0.4).unwrap();

        // Act
        let err = ov.set_characteristic_slope(Some(f64::NAN));

        // Assert
        assert!(err.is_err());
        assert_eq!(ov.characteristic_slope(), Some(0.4));
        ov.set_characteristic_slope(None).unwrap();
        assert!(ov.is_empty());
        assert!(ManualOverride::new().with_mean_intercept(f64::INFINITY).is_err());
    }
}
