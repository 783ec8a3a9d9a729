//! estimation::characteristic — CharacteristicFitRefiner.
//!
//! Purpose
//! -------
//! Turn a confidence envelope into the characteristic line used by the design
//! code: a second least-squares fit through the lower-bound curve itself, not
//! a quantile of the raw data.
//!
//! Key behaviors
//! -------------
//! - [`CharacteristicSource::Envelope`] refits the lower curve of an existing
//!   [`ConfidenceCurve`].
//! - [`CharacteristicSource::FixedIntercept`] first refits the data with the
//!   intercept held at a manual mean value, rebuilds the envelope around that
//!   constrained midline, then refits its lower curve.
//! - [`CharacteristicFit::upper_from_curve`] refits the upper curve for
//!   reporting.
//!
//! Invariants & assumptions
//! ------------------------
//! - Grid points with a non-finite bound are dropped before the refit; at
//!   least two must remain.
//! - If the fixed intercept equals the unconstrained OLS intercept, the
//!   constrained path reproduces the unconstrained characteristic line.

use ndarray::{Array1, ArrayView1};
use tracing::{debug, warn};

use crate::estimation::{
    critical::ConfidenceLevel,
    envelope::ConfidenceCurve,
    errors::{EstimationError, EstimationResult},
    regression::{RegressionFit, least_squares_line},
};

/// Where the characteristic line came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicBasis {
    LowerEnvelope,
    UpperEnvelope,
    FixedIntercept { intercept: f64 },
}

/// Input of [`characteristic_fit`].
#[derive(Debug, Clone, Copy)]
pub enum CharacteristicSource<'a> {
    Envelope(&'a ConfidenceCurve),
    FixedIntercept {
        x: ArrayView1<'a, f64>,
        y: ArrayView1<'a, f64>,
        intercept: f64,
        alpha: f64,
        level: ConfidenceLevel,
    },
}

/// CharacteristicFit — slope and intercept of a refitted envelope curve.
///
/// Fields
/// ------
/// - `slope`, `intercept`: refit coefficients.
/// - `points`: grid points that entered the refit.
/// - `dropped`: grid points skipped for a non-finite bound.
/// - `basis`: which curve (and constraint) was refitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacteristicFit {
    pub slope: f64,
    pub intercept: f64,
    pub points: usize,
    pub dropped: usize,
    pub basis: CharacteristicBasis,
}

impl CharacteristicFit {
    /// Refit the lower curve of `curve`.
    pub fn from_curve(curve: &ConfidenceCurve) -> EstimationResult<Self> {
        refit(curve.x.view(), curve.lower.view(), CharacteristicBasis::LowerEnvelope)
    }

    /// Refit the upper curve of `curve`.
    pub fn upper_from_curve(curve: &ConfidenceCurve) -> EstimationResult<Self> {
        refit(curve.x.view(), curve.upper.view(), CharacteristicBasis::UpperEnvelope)
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Constrained midline fit and its envelope for a fixed mean intercept.
///
/// Returns
/// -------
/// `(RegressionFit, ConfidenceCurve)`
///   The fit with `fixed_intercept = true` and the envelope around it over
///   the observed x range.
pub fn constrained_envelope(
    x: ArrayView1<f64>, y: ArrayView1<f64>, intercept: f64, alpha: f64, level: ConfidenceLevel,
) -> EstimationResult<(RegressionFit, ConfidenceCurve)> {
    let fit = RegressionFit::through_intercept(x, y, intercept)?;
    let range = x.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let curve = ConfidenceCurve::new(&fit, range, alpha, level)?;
    Ok((fit, curve))
}

/// Characteristic line from an envelope or a fixed-intercept request.
///
/// Errors
/// ------
/// - `InsufficientData` when fewer than 2 finite grid points remain.
/// - `DegenerateRegression` when the remaining grid points share one x.
/// - Any error of [`constrained_envelope`] on the fixed-intercept path.
pub fn characteristic_fit(source: CharacteristicSource<'_>) -> EstimationResult<CharacteristicFit> {
    match source {
        CharacteristicSource::Envelope(curve) => CharacteristicFit::from_curve(curve),
        CharacteristicSource::FixedIntercept { x, y, intercept, alpha, level } => {
            let (_, curve) = constrained_envelope(x, y, intercept, alpha, level)?;
            let fit = CharacteristicFit::from_curve(&curve)?;
            Ok(CharacteristicFit { basis: CharacteristicBasis::FixedIntercept { intercept }, ..fit })
        }
    }
}

// ---------- Private helpers (compact docs) ----------

fn refit(
    grid: ArrayView1<f64>, bound: ArrayView1<f64>, basis: CharacteristicBasis,
) -> EstimationResult<CharacteristicFit> {
    let (x, y): (Vec<f64>, Vec<f64>) = grid
        .iter()
        .zip(bound.iter())
        .filter(|(gx, by)| gx.is_finite() && by.is_finite())
        .map(|(&gx, &by)| (gx, by))
        .unzip();
    let dropped = grid.len() - x.len();
    if dropped > 0 {
        warn!(dropped, "skipping non-finite envelope points in characteristic refit");
    }
    if x.len() < 2 {
        return Err(EstimationError::InsufficientData {
            required: 2,
            actual: x.len(),
            context: "characteristic refit",
        });
    }
    let (x, y) = (Array1::from(x), Array1::from(y));
    let (slope, intercept) = least_squares_line(x.view(), y.view(), "characteristic refit")?;
    debug!(slope, intercept, points = x.len(), ?basis, "characteristic refit");
    Ok(CharacteristicFit { slope, intercept, points: x.len(), dropped, basis })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The lower-curve refit on the reference dataset.
    // - Non-finite point filtering and the two-point minimum.
    // - The fixed-intercept path and its no-op property.
    // -------------------------------------------------------------------------

    fn reference() -> (Array1<f64>, Array1<f64>) {
        (array![10.0, 20.0, 30.0, 40.0, 50.0], array![12.0, 18.0, 25.0, 30.0, 38.0])
    }

    fn curve(alpha: f64) -> ConfidenceCurve {
        let (x, y) = reference();
        let fit = RegressionFit::ols(x.view(), y.view()).unwrap();
        ConfidenceCurve::new(&fit, (10.0, 50.0), alpha, ConfidenceLevel::TwoSided10).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The characteristic line is the OLS fit of the lower curve.
    //
    // Given
    // -----
    // - The reference envelope at alpha = 0.75.
    //
    // Expect
    // ------
    // - Coefficients equal an OLS fit of (grid, lower) and lie below the
    //   mean line at the centre of the range.
    fn lower_curve_refit_matches_direct_ols() {
        // Arrange
        let c = curve(0.75);

        // Act
        let kar = characteristic_fit(CharacteristicSource::Envelope(&c)).unwrap();

        // Assert
        let direct = RegressionFit::ols(c.x.view(), c.lower.view()).unwrap();
        assert_relative_eq!(kar.slope, direct.slope, max_relative = 1e-12);
        assert_relative_eq!(kar.intercept, direct.intercept, max_relative = 1e-12);
        assert!(kar.predict(30.0) < 5.4 + 0.64 * 30.0);
        assert_eq!(kar.points, 5);
        assert_eq!(kar.basis, CharacteristicBasis::LowerEnvelope);
    }

    #[test]
    // Purpose
    // -------
    // Non-finite grid points are dropped; fewer than two remaining points
    // is `InsufficientData`.
    //
    // Given
    // -----
    // - A curve whose lower bound is NaN at all but one point.
    //
    // Expect
    // ------
    // - `InsufficientData { required: 2, actual: 1 }`.
    fn refit_needs_two_finite_points() {
        // Arrange
        let mut c = curve(1.0);
        for i in 1..c.len() {
            c.lower[i] = f64::NAN;
        }

        // Act
        let err = CharacteristicFit::from_curve(&c).unwrap_err();

        // Assert
        assert!(matches!(err, EstimationError::InsufficientData { required: 2, actual: 1, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Fixing the intercept at the OLS intercept reproduces the
    // unconstrained characteristic line.
    //
    // Given
    // -----
    // - The reference dataset, b = 5.4, alpha = 0.75.
    //
    // Expect
    // ------
    // - Slope and intercept equal the envelope path within rounding.
    fn fixed_intercept_at_ols_intercept_matches_envelope_path() {
        // Arrange
        let (x, y) = reference();
        let ols = RegressionFit::ols(x.view(), y.view()).unwrap();
        let c = curve(0.75);

        // Act
        let free = characteristic_fit(CharacteristicSource::Envelope(&c)).unwrap();
        let fixed = characteristic_fit(CharacteristicSource::FixedIntercept {
            x: x.view(),
            y: y.view(),
            intercept: ols.intercept,
            alpha: 0.75,
            level: ConfidenceLevel::TwoSided10,
        })
        .unwrap();

        // Assert
        assert_relative_eq!(fixed.slope, free.slope, max_relative = 1e-8);
        assert_relative_eq!(fixed.intercept, free.intercept, max_relative = 1e-8);
        assert!(matches!(fixed.basis, CharacteristicBasis::FixedIntercept { .. }));
    }

    #[test]
    // Purpose
    // -------
    // The upper refit mirrors the lower one around the mean line.
    //
    // Given
    // -----
    // - The reference envelope at alpha = 1.
    //
    // Expect
    // ------
    // - lower + upper coefficients average to the mean line (0.64, 5.4).
    fn upper_and_lower_refits_average_to_mean_line() {
        let c = curve(1.0);
        let lo = CharacteristicFit::from_curve(&c).unwrap();
        let hi = CharacteristicFit::upper_from_curve(&c).unwrap();
        assert_relative_eq!((lo.slope + hi.slope) / 2.0, 0.64, epsilon = 1e-10);
        assert_relative_eq!((lo.intercept + hi.intercept) / 2.0, 5.4, epsilon = 1e-9);
    }
}
