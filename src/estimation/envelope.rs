//! estimation::envelope — ConfidenceBoundCalculator.
//!
//! Purpose
//! -------
//! Build the symmetric lower/upper envelope around a fitted line on an evenly
//! spaced grid over the observed x range, and the analogous bounds around a
//! sample mean (log-transformed ratios, field POP values).
//!
//! Key behaviors
//! -------------
//! - [`ConfidenceCurve::new`] evaluates
//!   `half_width(x) = t · sqrt(var_a + x²·var_b + 2x·cov + (1 − α)·chi2/(n − 2))`
//!   on `n` grid points from min(x) to max(x) inclusive.
//! - [`MeanBounds::new`] evaluates
//!   `mean ± t · s · sqrt((1 − α) + 1/n)` for plain or log-transformed samples.
//! - Lowering α (regional pooling) adds residual variance and widens both
//!   bounds monotonically.
//!
//! Invariants & assumptions
//! ------------------------
//! - The grid has exactly as many points as the fit has observations; the
//!   first point is min(x) and the last is max(x) exactly.
//! - `upper − fitted = fitted − lower` at every grid point.
//! - The variance under the square root is clamped at zero so rounding on
//!   near-perfect fits cannot produce NaN.
//!
//! Conventions
//! -----------
//! - 2x·cov is used in place of 2x·ρ·σ_a·σ_b; the two are identical and the
//!   covariance form stays defined for a perfect fit.

use ndarray::{Array1, ArrayView1};

use crate::estimation::{
    critical::ConfidenceLevel,
    errors::{EstimationError, EstimationResult},
    regression::RegressionFit,
    validation::validate_alpha,
};

/// Evenly spaced grid of `n` points from `min` to `max` inclusive.
///
/// The last point is set to `max` exactly so rounding in the step cannot
/// shift the end of the range.
pub fn resample_grid(min: f64, max: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, min),
        _ => {
            let step = (max - min) / (n - 1) as f64;
            Array1::from_shape_fn(n, |i| if i == n - 1 { max } else { min + i as f64 * step })
        }
    }
}

/// One point of a [`ConfidenceCurve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub lower: f64,
    pub fitted: f64,
    pub upper: f64,
}

/// ConfidenceCurve — lower/upper bounds around a fitted line on a grid.
///
/// Fields
/// ------
/// - `x`: grid abscissae.
/// - `fitted`: line values at the grid.
/// - `lower`, `upper`: envelope values at the grid.
/// - `critical_value`: the positive Student-t multiplier used.
/// - `alpha`: locality weight used.
/// - `level`: confidence convention used.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceCurve {
    pub x: Array1<f64>,
    pub fitted: Array1<f64>,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
    pub critical_value: f64,
    pub alpha: f64,
    pub level: ConfidenceLevel,
}

impl ConfidenceCurve {
    /// Envelope of `fit` over `x_range`.
    ///
    /// Parameters
    /// ----------
    /// - `fit`: [`RegressionFit`]
    ///   Line and sampling moments; its `n` sets the grid size.
    /// - `x_range`: `(f64, f64)`
    ///   (min, max) of the observed x.
    /// - `alpha`: `f64`
    ///   Locality weight in (0, 1].
    /// - `level`: [`ConfidenceLevel`]
    ///
    /// Errors
    /// ------
    /// - `ConfigurationError` for alpha outside (0, 1].
    /// - `InsufficientData` / `Distribution` from the critical value.
    /// - `NonFiniteResult` if a bound overflows.
    pub fn new(
        fit: &RegressionFit, x_range: (f64, f64), alpha: f64, level: ConfidenceLevel,
    ) -> EstimationResult<Self> {
        let alpha = validate_alpha(alpha)?;
        let t = level.critical_value(fit.n)?;
        let pooled = (1.0 - alpha) * fit.residual_variance();

        let x = resample_grid(x_range.0, x_range.1, fit.n);
        let fitted = x.mapv(|xi| fit.predict(xi));
        let half = x.mapv(|xi| t * (fit.line_variance(xi) + pooled).max(0.0).sqrt());
        if half.iter().any(|h| !h.is_finite()) {
            return Err(EstimationError::NonFiniteResult { quantity: "envelope half width" });
        }
        let lower = &fitted - &half;
        let upper = &fitted + &half;
        Ok(ConfidenceCurve { x, fitted, lower, upper, critical_value: t, alpha, level })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn half_widths(&self) -> Array1<f64> {
        &self.upper - &self.fitted
    }

    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + '_ {
        (0..self.len()).map(move |i| CurvePoint {
            x: self.x[i],
            lower: self.lower[i],
            fitted: self.fitted[i],
            upper: self.upper[i],
        })
    }
}

/// MeanBounds — bounds on a sample mean with locality pooling.
///
/// Fields
/// ------
/// - `n`: sample count.
/// - `mean`, `std_dev`: sample mean and standard deviation (n − 1).
/// - `lower`, `upper`: `mean ∓ t · s · sqrt((1 − α) + 1/n_ref)`.
/// - `reference_n`: sample size behind `t` and the 1/n_ref term; equals `n`
///   unless built with [`MeanBounds::with_reference`].
///
/// Notes
/// -----
/// - For log-transformed samples [`MeanBounds::exp`] maps the bounds back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanBounds {
    pub n: usize,
    pub reference_n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub lower: f64,
    pub upper: f64,
    pub critical_value: f64,
}

impl MeanBounds {
    /// Errors
    /// ------
    /// - `InsufficientData` for fewer than 2 values.
    /// - `NonFiniteData` for NaN/±∞ entries.
    /// - `ConfigurationError` for alpha outside (0, 1].
    pub fn new(
        values: ArrayView1<f64>, alpha: f64, level: ConfidenceLevel,
    ) -> EstimationResult<Self> {
        MeanBounds::with_reference(values, alpha, level, values.len())
    }

    /// Bounds whose critical value and 1/n term come from another sample of
    /// size `reference_n`, e.g. the NC strength ratio bounded with the
    /// overconsolidated regression's t(n_oc − 2) and 1/n_oc.
    ///
    /// Errors
    /// ------
    /// - As [`MeanBounds::new`].
    /// - `InsufficientData` when `reference_n` is too small for `level`.
    pub fn with_reference(
        values: ArrayView1<f64>, alpha: f64, level: ConfidenceLevel, reference_n: usize,
    ) -> EstimationResult<Self> {
        let alpha = validate_alpha(alpha)?;
        if values.len() < 2 {
            return Err(EstimationError::InsufficientData {
                required: 2,
                actual: values.len(),
                context: "mean bounds",
            });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EstimationError::NonFiniteData { index, value });
        }
        let n = values.len();
        let mean = values.sum() / n as f64;
        let std_dev = values.std(1.0);
        let t = level.critical_value(reference_n)?;
        let half = t * std_dev * ((1.0 - alpha) + 1.0 / reference_n as f64).sqrt();
        Ok(MeanBounds {
            n,
            reference_n,
            mean,
            std_dev,
            lower: mean - half,
            upper: mean + half,
            critical_value: t,
        })
    }

    /// (exp mean, exp lower, exp upper).
    pub fn exp(&self) -> (f64, f64, f64) {
        (self.mean.exp(), self.lower.exp(), self.upper.exp())
    }
}
