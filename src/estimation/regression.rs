//! estimation::regression — ordinary least-squares line with sampling moments.
//!
//! Purpose
//! -------
//! Fit y = intercept + slope · x to paired observations and keep the sums
//! needed to derive the sampling variances of both coefficients and their
//! covariance, which the confidence envelope consumes.
//!
//! Key behaviors
//! -------------
//! - [`RegressionFit::ols`] fits both coefficients (n ≥ 3).
//! - [`RegressionFit::through_intercept`] fixes the intercept at a caller
//!   value `b` and fits the slope of y − b through the origin.
//! - Variances, covariance and correlation follow the classical formulas
//!   with residual variance chi2 / (n − 2).
//!
//! Invariants & assumptions
//! ------------------------
//! - Sxx = Σ(xᵢ − x̄)² > 0; otherwise `DegenerateRegression`.
//! - For the unconstrained fit, residuals satisfy the normal equations
//!   Σrᵢ = 0 and Σ(xᵢ − x̄)rᵢ = 0 up to rounding.
//! - The constrained fit reuses Sxx and Σx of the same x values, so its
//!   variances differ from the unconstrained ones only through chi2.
//!
//! Conventions
//! -----------
//! - slope = Sxy / Sxx with Sxy = Σ(xᵢ − x̄)·yᵢ.
//! - intercept = (Σy − Σx · slope) / n.
//!
//! Testing notes
//! -------------
//! - Unit tests check a reference dataset against hand-computed values, the
//!   degenerate and short-input errors, and the normal equations via
//!   proptest.

use ndarray::{Array1, ArrayView1};

use crate::estimation::{
    errors::{EstimationError, EstimationResult},
    validation::validate_pairs,
};

/// Minimum observation count for a fit with residual degrees of freedom.
pub const MIN_OBSERVATIONS: usize = 3;

/// RegressionFit — fitted line plus the sums behind its sampling moments.
///
/// Fields
/// ------
/// - `slope`, `intercept`: fitted coefficients.
/// - `n`: number of observations.
/// - `sum_x`: Σxᵢ.
/// - `mean_x`: x̄.
/// - `sum_sq_x_dev`: Sxx = Σ(xᵢ − x̄)².
/// - `sum_sq_residual`: chi2 = Σ(yᵢ − intercept − slope·xᵢ)².
/// - `fixed_intercept`: `true` when the intercept was supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionFit {
    pub slope: f64,
    pub intercept: f64,
    pub n: usize,
    pub sum_x: f64,
    pub mean_x: f64,
    pub sum_sq_x_dev: f64,
    pub sum_sq_residual: f64,
    pub fixed_intercept: bool,
}

impl RegressionFit {
    /// Ordinary least-squares fit of `y` on `x`.
    ///
    /// Parameters
    /// ----------
    /// - `x`, `y`: `ArrayView1<f64>`
    ///   Paired finite observations, n ≥ 3.
    ///
    /// Returns
    /// -------
    /// `EstimationResult<RegressionFit>`
    ///
    /// Errors
    /// ------
    /// - `EstimationError::InsufficientData` when n < 3.
    /// - `EstimationError::DegenerateRegression` when all x are equal.
    /// - `EstimationError::LengthMismatch` / `NonFiniteData` from input
    ///   validation.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use soil_strength::estimation::regression::RegressionFit;
    /// let x = array![10.0, 20.0, 30.0, 40.0, 50.0];
    /// let y = array![12.0, 18.0, 25.0, 30.0, 38.0];
    /// let fit = RegressionFit::ols(x.view(), y.view()).unwrap();
    /// assert!((fit.slope - 0.64).abs() < 1e-12);
    /// assert!((fit.intercept - 5.4).abs() < 1e-12);
    /// ```
    pub fn ols(x: ArrayView1<f64>, y: ArrayView1<f64>) -> EstimationResult<Self> {
        let moments = XMoments::new(x, y, MIN_OBSERVATIONS, "regression")?;
        let (slope, intercept) = moments.line(x, y);
        Ok(moments.into_fit(x, y, slope, intercept, false))
    }

    /// Least-squares slope with the intercept fixed at `intercept`.
    ///
    /// slope = Σxᵢ(yᵢ − b) / Σxᵢ²
    ///
    /// Errors
    /// ------
    /// - Same as [`RegressionFit::ols`]; additionally `DegenerateRegression`
    ///   when Σxᵢ² = 0.
    /// - `EstimationError::ConfigurationError` when `intercept` is not finite.
    pub fn through_intercept(
        x: ArrayView1<f64>, y: ArrayView1<f64>, intercept: f64,
    ) -> EstimationResult<Self> {
        if !intercept.is_finite() {
            return Err(EstimationError::ConfigurationError {
                parameter: "fixed intercept",
                value: intercept,
                reason: "Manual values must be finite.",
            });
        }
        let moments = XMoments::new(x, y, MIN_OBSERVATIONS, "constrained regression")?;
        let sum_sq_x: f64 = x.iter().map(|v| v * v).sum();
        if sum_sq_x == 0.0 {
            return Err(EstimationError::DegenerateRegression { sum_sq_x_dev: sum_sq_x });
        }
        let sxy: f64 = x.iter().zip(y.iter()).map(|(&xi, &yi)| xi * (yi - intercept)).sum();
        let slope = sxy / sum_sq_x;
        Ok(moments.into_fit(x, y, slope, intercept, true))
    }

    /// Fitted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Residuals yᵢ − fitted(xᵢ).
    pub fn residuals(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        x.iter().zip(y.iter()).map(|(&xi, &yi)| yi - self.predict(xi)).collect()
    }

    /// Residual variance chi2 / (n − 2).
    pub fn residual_variance(&self) -> f64 {
        self.sum_sq_residual / (self.n - 2) as f64
    }

    /// Standard error of estimate sqrt(chi2 / (n − 2)).
    pub fn standard_error(&self) -> f64 {
        self.residual_variance().sqrt()
    }

    pub fn var_slope(&self) -> f64 {
        self.residual_variance() / self.sum_sq_x_dev
    }

    pub fn var_intercept(&self) -> f64 {
        let n = self.n as f64;
        (1.0 + self.sum_x * self.sum_x / (n * self.sum_sq_x_dev)) * self.residual_variance() / n
    }

    pub fn covariance(&self) -> f64 {
        -self.sum_x / (self.n as f64 * self.sum_sq_x_dev) * self.residual_variance()
    }

    /// ρ = cov / sqrt(var_slope · var_intercept).
    ///
    /// `None` for a perfect fit (chi2 = 0), where ρ is 0/0.
    pub fn correlation(&self) -> Option<f64> {
        let denom = (self.var_slope() * self.var_intercept()).sqrt();
        (denom > 0.0).then(|| self.covariance() / denom)
    }

    /// Variance of the fitted line at `x`:
    /// var_intercept + x²·var_slope + 2x·cov.
    ///
    /// Uses the covariance directly, which equals 2x·ρ·σ_a·σ_b and stays
    /// defined when chi2 = 0.
    pub fn line_variance(&self, x: f64) -> f64 {
        self.var_intercept() + x * x * self.var_slope() + 2.0 * x * self.covariance()
    }
}

// ---------- Private helpers (compact docs) ----------

/// Sums over x shared by every fitting path.
struct XMoments {
    n: usize,
    sum_x: f64,
    mean_x: f64,
    sum_sq_x_dev: f64,
}

impl XMoments {
    fn new(
        x: ArrayView1<f64>, y: ArrayView1<f64>, min_len: usize, context: &'static str,
    ) -> EstimationResult<Self> {
        validate_pairs(x, y, min_len, context)?;
        let n = x.len();
        let sum_x = x.sum();
        let mean_x = sum_x / n as f64;
        let sum_sq_x_dev: f64 = x.iter().map(|v| (v - mean_x).powi(2)).sum();
        if sum_sq_x_dev <= 0.0 {
            return Err(EstimationError::DegenerateRegression { sum_sq_x_dev });
        }
        Ok(XMoments { n, sum_x, mean_x, sum_sq_x_dev })
    }

    /// (slope, intercept) = (Sxy / Sxx, (Σy − Σx · slope) / n).
    fn line(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> (f64, f64) {
        let sxy: f64 = x.iter().zip(y.iter()).map(|(&xi, &yi)| (xi - self.mean_x) * yi).sum();
        let slope = sxy / self.sum_sq_x_dev;
        (slope, (y.sum() - self.sum_x * slope) / self.n as f64)
    }

    fn into_fit(
        self, x: ArrayView1<f64>, y: ArrayView1<f64>, slope: f64, intercept: f64,
        fixed_intercept: bool,
    ) -> RegressionFit {
        let sum_sq_residual: f64 = x
            .iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| (yi - intercept - slope * xi).powi(2))
            .sum();
        RegressionFit {
            slope,
            intercept,
            n: self.n,
            sum_x: self.sum_x,
            mean_x: self.mean_x,
            sum_sq_x_dev: self.sum_sq_x_dev,
            sum_sq_residual,
            fixed_intercept,
        }
    }
}

/// Two-point-capable least squares used by the characteristic refit.
///
/// Returns (slope, intercept) with the same formulas as
/// [`RegressionFit::ols`] but only requires n ≥ 2.
pub(crate) fn least_squares_line(
    x: ArrayView1<f64>, y: ArrayView1<f64>, context: &'static str,
) -> EstimationResult<(f64, f64)> {
    let moments = XMoments::new(x, y, 2, context)?;
    Ok(moments.line(x, y))
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
    // - Coefficients and sampling moments on a reference dataset.
    // - Error branches: short input, degenerate x, non-finite fixed
    //   intercept.
    // - The constrained fit and its no-op property.
    // - Normal equations (property-based).
    // -------------------------------------------------------------------------

    fn reference() -> (Array1<f64>, Array1<f64>) {
        (array![10.0, 20.0, 30.0, 40.0, 50.0], array![12.0, 18.0, 25.0, 30.0, 38.0])
    }

    /// Independent OLS via the textbook covariance form.
    fn textbook_ols(x: &[f64], y: &[f64]) -> (f64, f64) {
        let n = x.len() as f64;
        let mx = x.iter().sum::<f64>() / n;
        let my = y.iter().sum::<f64>() / n;
        let sxy: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
        let sxx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
        let slope = sxy / sxx;
        (slope, my - slope * mx)
    }

    #[test]
    // Purpose
    // -------
    // Coefficients and moments match an independent computation.
    //
    // Given
    // -----
    // - x = [10..50], y = [12, 18, 25, 30, 38].
    //
    // Expect
    // ------
    // - slope 0.64, intercept 5.4, chi2 = 1.6, Sxx = 1000, and the
    //   variance formulas evaluated by hand.
    fn ols_matches_independent_reference() {
        // Arrange
        let (x, y) = reference();
        let (slope_ref, intercept_ref) =
            textbook_ols(x.as_slice().unwrap(), y.as_slice().unwrap());

        // Act
        let fit = RegressionFit::ols(x.view(), y.view()).unwrap();

        // Assert
        assert_relative_eq!(fit.slope, slope_ref, max_relative = 1e-6);
        assert_relative_eq!(fit.intercept, intercept_ref, max_relative = 1e-6);
        assert_relative_eq!(fit.slope, 0.64, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 5.4, epsilon = 1e-12);
        assert_relative_eq!(fit.sum_sq_x_dev, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(fit.sum_sq_residual, 1.6, epsilon = 1e-9);
        // s² = 1.6 / 3
        let s2 = 1.6 / 3.0;
        assert_relative_eq!(fit.var_slope(), s2 / 1000.0, epsilon = 1e-12);
        assert_relative_eq!(
            fit.var_intercept(),
            (1.0 + 150.0 * 150.0 / (5.0 * 1000.0)) * s2 / 5.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(fit.covariance(), -150.0 / 5000.0 * s2, epsilon = 1e-12);
        assert!(!fit.fixed_intercept);
    }

    #[test]
    // Purpose
    // -------
    // ρ matches cov / sqrt(var_a · var_b) and the line variance identity
    // 2x·cov = 2x·ρ·σ_a·σ_b holds.
    //
    // Given
    // -----
    // - The reference dataset.
    //
    // Expect
    // ------
    // - Both forms of the line variance agree at x = 37.
    fn correlation_and_line_variance_agree() {
        // Arrange
        let (x, y) = reference();
        let fit = RegressionFit::ols(x.view(), y.view()).unwrap();

        // Act
        let rho = fit.correlation().unwrap();
        let via_rho = fit.var_intercept()
            + 37.0 * 37.0 * fit.var_slope()
            + 2.0 * 37.0 * rho * (fit.var_intercept() * fit.var_slope()).sqrt();

        // Assert
        assert!(rho < 0.0 && rho > -1.0);
        assert_relative_eq!(fit.line_variance(37.0), via_rho, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Short and degenerate inputs are rejected.
    //
    // Given
    // -----
    // - Two observations; five observations with identical x.
    //
    // Expect
    // ------
    // - `InsufficientData` and `DegenerateRegression` respectively.
    fn ols_rejects_short_and_degenerate_input() {
        // Arrange
        let short = array![1.0, 2.0];
        let flat = array![3.0, 3.0, 3.0, 3.0, 3.0];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];

        // Act / Assert
        assert!(matches!(
            RegressionFit::ols(short.view(), short.view()),
            Err(EstimationError::InsufficientData { required: 3, actual: 2, .. })
        ));
        assert!(matches!(
            RegressionFit::ols(flat.view(), y.view()),
            Err(EstimationError::DegenerateRegression { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Fixing the intercept at the OLS intercept reproduces the OLS slope.
    //
    // Given
    // -----
    // - The reference dataset and b = 5.4.
    //
    // Expect
    // ------
    // - Constrained slope ≈ 0.64 and identical chi2.
    fn through_intercept_at_ols_intercept_is_noop() {
        // Arrange
        let (x, y) = reference();
        let ols = RegressionFit::ols(x.view(), y.view()).unwrap();

        // Act
        let fixed = RegressionFit::through_intercept(x.view(), y.view(), ols.intercept).unwrap();

        // Assert
        assert_relative_eq!(fixed.slope, ols.slope, max_relative = 1e-10);
        assert_relative_eq!(fixed.sum_sq_residual, ols.sum_sq_residual, max_relative = 1e-8);
        assert!(fixed.fixed_intercept);
    }

    #[test]
    // Purpose
    // -------
    // The constrained slope follows Σx(y − b) / Σx².
    //
    // Given
    // -----
    // - x = [1, 2, 3], y = [3, 5, 7], b = 0.
    //
    // Expect
    // ------
    // - slope = (3 + 10 + 21) / 14.
    fn through_intercept_uses_origin_shifted_least_squares() {
        // Arrange
        let x = array![1.0, 2.0, 3.0];
        let y = array![3.0, 5.0, 7.0];

        // Act
        let fit = RegressionFit::through_intercept(x.view(), y.view(), 0.0).unwrap();

        // Assert
        assert_relative_eq!(fit.slope, 34.0 / 14.0, epsilon = 1e-12);
        assert_eq!(fit.intercept, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The refit helper returns the OLS line and accepts two points.
    //
    // Given
    // -----
    // - The reference dataset; the two points (1, 1) and (3, 5); two equal x.
    //
    // Expect
    // ------
    // - Same (slope, intercept) as `ols` on the reference data.
    // - slope 2, intercept −1 through the two points.
    // - `DegenerateRegression` for equal x.
    fn least_squares_line_matches_ols() {
        // Arrange
        let (x, y) = reference();
        let ols = RegressionFit::ols(x.view(), y.view()).unwrap();
        let x2 = array![1.0, 3.0];
        let y2 = array![1.0, 5.0];
        let flat = array![2.0, 2.0];

        // Act
        let (slope, intercept) = least_squares_line(x.view(), y.view(), "refit").unwrap();
        let (slope2, intercept2) = least_squares_line(x2.view(), y2.view(), "refit").unwrap();
        let degenerate = least_squares_line(flat.view(), y2.view(), "refit");

        // Assert
        assert_eq!((slope, intercept), (ols.slope, ols.intercept));
        assert_relative_eq!(slope2, 2.0, epsilon = 1e-12);
        assert_relative_eq!(intercept2, -1.0, epsilon = 1e-12);
        assert!(matches!(degenerate, Err(EstimationError::DegenerateRegression { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A perfect fit has no correlation but a finite, zero line variance.
    //
    // Given
    // -----
    // - y = 2 + 3x exactly.
    //
    // Expect
    // ------
    // - `correlation()` is None and `line_variance` is 0.
    fn perfect_fit_has_zero_line_variance() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        let y = x.mapv(|v| 2.0 + 3.0 * v);
        let fit = RegressionFit::ols(x.view(), y.view()).unwrap();
        assert_eq!(fit.correlation(), None);
        assert_relative_eq!(fit.line_variance(2.5), 0.0, epsilon = 1e-20);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn dataset() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
            (3usize..40).prop_flat_map(|n| {
                (
                    prop::collection::vec(-500.0f64..500.0, n),
                    prop::collection::vec(-500.0f64..500.0, n),
                )
            })
        }

        proptest! {
            #[test]
            fn residuals_satisfy_normal_equations((x, y) in dataset()) {
                let xa = Array1::from(x.clone());
                let ya = Array1::from(y);
                let fit = match RegressionFit::ols(xa.view(), ya.view()) {
                    Ok(fit) => fit,
                    Err(_) => return Ok(()),
                };
                prop_assume!(fit.sum_sq_x_dev > 1e-6);
                let r = fit.residuals(xa.view(), ya.view());
                let scale = 1.0 + ya.iter().map(|v| v.abs()).sum::<f64>();
                let sum_r: f64 = r.sum();
                let sum_xr: f64 = x.iter().zip(r.iter()).map(|(xi, ri)| (xi - fit.mean_x) * ri).sum();
                prop_assert!(sum_r.abs() <= 1e-8 * scale, "Σr = {sum_r}");
                prop_assert!(sum_xr.abs() <= 1e-6 * scale * (1.0 + fit.sum_sq_x_dev.sqrt()), "Σ(x−x̄)r = {sum_xr}");
            }
        }
    }
}
