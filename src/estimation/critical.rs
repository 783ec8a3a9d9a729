//! estimation::critical — the two Student-t conventions of the envelope.
//!
//! Purpose
//! -------
//! Fix the only two confidence conventions the engine supports and compute
//! their critical values:
//!
//! - [`ConfidenceLevel::TwoSided10`]: two-sided 10% significance with n − 2
//!   degrees of freedom, used for regression envelopes.
//! - [`ConfidenceLevel::OneSided5`]: one-sided 5% significance with n − 1
//!   degrees of freedom, used for log-domain means.
//!
//! Conventions
//! -----------
//! - Critical values are returned as positive magnitudes (the 95% quantile in
//!   both cases); envelopes subtract and add them explicitly.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::estimation::errors::{EstimationError, EstimationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceLevel {
    TwoSided10,
    OneSided5,
}

impl ConfidenceLevel {
    pub fn significance(self) -> f64 {
        match self {
            ConfidenceLevel::TwoSided10 => 0.10,
            ConfidenceLevel::OneSided5 => 0.05,
        }
    }

    /// Number of estimated parameters removed from n.
    pub fn fitted_parameters(self) -> usize {
        match self {
            ConfidenceLevel::TwoSided10 => 2,
            ConfidenceLevel::OneSided5 => 1,
        }
    }

    /// Upper-tail probability whose quantile is the critical value.
    pub fn quantile(self) -> f64 {
        match self {
            ConfidenceLevel::TwoSided10 => 1.0 - self.significance() / 2.0,
            ConfidenceLevel::OneSided5 => 1.0 - self.significance(),
        }
    }

    /// Degrees of freedom for `n` observations.
    ///
    /// Errors
    /// ------
    /// - `EstimationError::InsufficientData` when no degree of freedom is
    ///   left.
    pub fn degrees_of_freedom(self, n: usize) -> EstimationResult<usize> {
        let k = self.fitted_parameters();
        if n <= k {
            return Err(EstimationError::InsufficientData {
                required: k + 1,
                actual: n,
                context: "Student-t critical value",
            });
        }
        Ok(n - k)
    }

    /// Positive Student-t critical value for `n` observations.
    ///
    /// Errors
    /// ------
    /// - `InsufficientData` via [`ConfidenceLevel::degrees_of_freedom`].
    /// - `EstimationError::Distribution` if statrs rejects the parameters.
    pub fn critical_value(self, n: usize) -> EstimationResult<f64> {
        let dof = self.degrees_of_freedom(n)? as f64;
        let dist = StudentsT::new(0.0, 1.0, dof)
            .map_err(|e| EstimationError::Distribution { reason: e.to_string() })?;
        Ok(dist.inverse_cdf(self.quantile()))
    }
}
