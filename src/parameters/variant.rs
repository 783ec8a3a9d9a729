//! parameters::variant — strength models and their regression-to-physics table.
//!
//! Purpose
//! -------
//! Name the strength models the engine supports and map a regression line
//! (slope, intercept) onto the physical quantities of each model.
//!
//! | Variant | primary | secondary |
//! |---|---|---|
//! | Coulomb (triaxial) | tan φ = b / sqrt(1 − b²) | c = a / sqrt(1 − b²) |
//! | Coulomb (direct simple shear) | tan φ = b | c = a |
//! | Coulomb stress ratio | tan φ from ratio r as above | none |
//! | Power law, linear | S = b | intercept a (kPa) |
//! | Power law, log-log | S = exp(a) | m = 1 − b |
//! | Log-log ratio | S = exp(a) | m = b |
//!
//! with a = intercept and b = slope.
//!
//! Invariants & assumptions
//! ------------------------
//! - The same transform is applied to the mean, characteristic and design
//!   lines; results are checked finite.

use serde::Serialize;

use crate::{
    estimation::{
        critical::ConfidenceLevel, errors::EstimationResult, validation::finite,
    },
    parameters::{coulomb, log_log, power_law},
    samples::schema::TestType,
};

/// Regression domain of the power-law model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PowerLawForm {
    /// Su = a + S·σ'v,c on overconsolidated samples.
    Linear,
    /// ln Su = ln S + (1 − m)·ln σ'v,c on overconsolidated samples.
    LogLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Variant {
    Coulomb,
    CoulombStressRatio,
    PowerLaw(PowerLawForm),
    LogLog,
}

/// Physical quantity reported by a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quantity {
    FrictionAngle,
    Cohesion,
    StrengthRatio,
    StrengthIntercept,
    Exponent,
    /// SHANSEP pre-overburden pressure; reported by the combined report only.
    PreOverburdenPressure,
}

impl Quantity {
    pub fn label(self) -> &'static str {
        match self {
            Quantity::FrictionAngle => "friction angle",
            Quantity::Cohesion => "cohesion",
            Quantity::StrengthRatio => "strength ratio S",
            Quantity::StrengthIntercept => "strength intercept",
            Quantity::Exponent => "strength exponent m",
            Quantity::PreOverburdenPressure => "POP",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Quantity::FrictionAngle => "deg",
            Quantity::Cohesion | Quantity::StrengthIntercept | Quantity::PreOverburdenPressure => {
                "kPa"
            }
            Quantity::StrengthRatio | Quantity::Exponent => "-",
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A straight line in regression space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Line { slope, intercept }
    }
}

/// Physical values of one line.
///
/// For [`Quantity::FrictionAngle`] the primary value is tan φ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalPair {
    pub primary: f64,
    pub secondary: Option<f64>,
}

impl Variant {
    /// Convention of the envelope (or log-mean bounds) of this variant.
    pub fn confidence_level(self) -> ConfidenceLevel {
        match self {
            Variant::CoulombStressRatio => ConfidenceLevel::OneSided5,
            _ => ConfidenceLevel::TwoSided10,
        }
    }

    pub fn primary(self) -> Quantity {
        match self {
            Variant::Coulomb | Variant::CoulombStressRatio => Quantity::FrictionAngle,
            Variant::PowerLaw(_) | Variant::LogLog => Quantity::StrengthRatio,
        }
    }

    pub fn secondary(self) -> Option<Quantity> {
        match self {
            Variant::Coulomb => Some(Quantity::Cohesion),
            Variant::CoulombStressRatio => None,
            Variant::PowerLaw(PowerLawForm::Linear) => Some(Quantity::StrengthIntercept),
            Variant::PowerLaw(PowerLawForm::LogLog) | Variant::LogLog => Some(Quantity::Exponent),
        }
    }

    /// Map a regression line onto physical values.
    ///
    /// Errors
    /// ------
    /// - `InvalidPhysicalValue` for a triaxial slope with |b| ≥ 1.
    /// - `NonFiniteResult` when an exponential overflows.
    pub fn transform(self, test_type: TestType, line: Line) -> EstimationResult<PhysicalPair> {
        let pair = match self {
            Variant::Coulomb => PhysicalPair {
                primary: coulomb::tan_phi(test_type, line.slope)?,
                secondary: Some(coulomb::cohesion(test_type, line.slope, line.intercept)?),
            },
            Variant::CoulombStressRatio => PhysicalPair {
                primary: coulomb::tan_phi(test_type, line.slope)?,
                secondary: None,
            },
            Variant::PowerLaw(PowerLawForm::Linear) => {
                PhysicalPair { primary: line.slope, secondary: Some(line.intercept) }
            }
            Variant::PowerLaw(PowerLawForm::LogLog) => PhysicalPair {
                primary: finite("strength ratio", power_law::reference_strength(line.intercept))?,
                secondary: Some(power_law::exponent(line.slope)),
            },
            Variant::LogLog => PhysicalPair {
                primary: finite("strength ratio", log_log::strength_ratio(line.intercept))?,
                secondary: Some(log_log::exponent(line.slope)),
            },
        };
        Ok(pair)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Coulomb => write!(f, "Coulomb"),
            Variant::CoulombStressRatio => write!(f, "Coulomb (stress ratio)"),
            Variant::PowerLaw(PowerLawForm::Linear) => write!(f, "power law (linear)"),
            Variant::PowerLaw(PowerLawForm::LogLog) => write!(f, "power law (log-log)"),
            Variant::LogLog => write!(f, "log-log ratio"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every row of the transform table once, plus the
    // confidence convention per variant.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Triaxial Coulomb divides by sqrt(1 − b²); direct shear uses the line
    // as is.
    //
    // Given
    // -----
    // - Line b = 0.5, a = 10.
    //
    // Expect
    // ------
    // - Triaxial: tan φ = 0.5/sqrt(0.75), c = 10/sqrt(0.75).
    // - Direct shear: tan φ = 0.5, c = 10.
    fn coulomb_transform_per_test_type() {
        // Arrange
        let line = Line::new(0.5, 10.0);

        // Act
        let txt = Variant::Coulomb.transform(TestType::Triaxial, line).unwrap();
        let dss = Variant::Coulomb.transform(TestType::DirectSimpleShear, line).unwrap();

        // Assert
        assert_relative_eq!(txt.primary, 0.5 / 0.75_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(txt.secondary.unwrap(), 10.0 / 0.75_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(dss, PhysicalPair { primary: 0.5, secondary: Some(10.0) });
    }

    #[test]
    // Purpose
    // -------
    // Ratio variants map intercepts through exp and slopes onto exponents.
    //
    // Given
    // -----
    // - Line b = 0.8, a = ln 0.3.
    //
    // Expect
    // ------
    // - Power law log-log: S = 0.3, m = 0.2.
    // - Log-log ratio: S = 0.3, m = 0.8.
    // - Power law linear: S = 0.8, intercept = ln 0.3.
    fn ratio_transforms_follow_table() {
        // Arrange
        let line = Line::new(0.8, 0.3_f64.ln());

        // Act
        let pl_log = Variant::PowerLaw(PowerLawForm::LogLog)
            .transform(TestType::DirectSimpleShear, line)
            .unwrap();
        let ll = Variant::LogLog.transform(TestType::DirectSimpleShear, line).unwrap();
        let pl_lin = Variant::PowerLaw(PowerLawForm::Linear)
            .transform(TestType::DirectSimpleShear, line)
            .unwrap();

        // Assert
        assert_relative_eq!(pl_log.primary, 0.3, epsilon = 1e-12);
        assert_relative_eq!(pl_log.secondary.unwrap(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(ll.primary, 0.3, epsilon = 1e-12);
        assert_relative_eq!(ll.secondary.unwrap(), 0.8, epsilon = 1e-12);
        assert_eq!(pl_lin.primary, 0.8);
        assert_eq!(pl_lin.secondary, Some(0.3_f64.ln()));
    }

    #[test]
    // Purpose
    // -------
    // Only the stress-ratio method uses the one-sided convention.
    //
    // Given
    // -----
    // - All variants.
    //
    // Expect
    // ------
    // - OneSided5 for `CoulombStressRatio`, TwoSided10 otherwise.
    fn confidence_level_per_variant() {
        assert_eq!(Variant::CoulombStressRatio.confidence_level(), ConfidenceLevel::OneSided5);
        for v in [
            Variant::Coulomb,
            Variant::PowerLaw(PowerLawForm::Linear),
            Variant::PowerLaw(PowerLawForm::LogLog),
            Variant::LogLog,
        ] {
            assert_eq!(v.confidence_level(), ConfidenceLevel::TwoSided10);
        }
    }
}
