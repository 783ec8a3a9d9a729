//! soil_strength — characteristic and design values of soil strength
//! parameters, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the characteristic-value engine to Python via the
//! `_soil_strength` extension module. From laboratory shear-test data the
//! engine fits a strength model, builds a Student-t confidence envelope,
//! refits a characteristic line to it and reports mean, characteristic and
//! design values of the physical parameters.
//!
//! Key behaviors
//! -------------
//! - [`samples`]: typed sample tables and selection into (x, y) datasets.
//! - [`estimation`]: least squares, confidence envelopes and characteristic
//!   refits.
//! - [`parameters`]: physical transforms per strength model, material
//!   factors and implied dispersions.
//! - [`analysis`]: the staged pipeline, settings, manual overrides and the
//!   combined SHANSEP / SUTABEL reports.
//! - With `python-bindings`, a `CharacteristicValues` class runs the
//!   pipeline on two arrays.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input parsing and error mapping.
//! - Every computation is a pure function of its inputs; there is no global
//!   state.
//!
//! Conventions
//! -----------
//! - Stresses are in kPa, angles are reported in degrees.
//! - Errors are [`estimation::errors::EstimationError`] internally and become
//!   `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Rust callers import [`prelude`] and drive [`analysis::Analysis`].
//! - The Python packaging layer imports `_soil_strength`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; table-driven end-to-end runs are
//!   in `tests/integration_*.rs`.

pub mod analysis;
pub mod estimation;
pub mod parameters;
pub mod samples;
pub mod utils;

pub mod prelude {
    pub use crate::analysis::prelude::*;
    pub use crate::estimation::prelude::*;
    pub use crate::parameters::prelude::*;
    pub use crate::samples::prelude::*;
}

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    analysis::{
        overrides::ManualOverride,
        pipeline::{AnalysisReport, analyse},
        result::QuantityResult,
    },
    samples::selection::Dataset,
    utils::{build_settings, extract_f64_vec, parse_test_type, parse_variant},
};

/// CharacteristicValues — Python-facing wrapper around one pipeline run.
///
/// Purpose
/// -------
/// Run select-free analysis on pre-laid-out (x, y) arrays and expose the
/// resulting tiers to Python.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `CharacteristicValues(x, y, variant="coulomb", test_type="triaxial", ...)`:
/// - `x`, `y`: array-likes of equal length, already in the layout of the
///   variant (e.g. ln σ'v,c / ln Su for `power_law_loglog`).
/// - `alpha` / `locality`: envelope pooling; mutually exclusive.
/// - `material_factors`: `(primary, secondary)`, default `(1, 1)`.
/// - `mean_intercept`, `characteristic_slope`, `characteristic_intercept`:
///   optional manual line coefficients.
///
/// Notes
/// -----
/// - Native Rust code should call [`analysis::pipeline::analyse`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "soil_strength")]
pub struct CharacteristicValues {
    inner: AnalysisReport,
}

#[cfg(feature = "python-bindings")]
fn tiers(result: &QuantityResult) -> (f64, f64, f64) {
    (result.values.mean, result.values.characteristic, result.values.design)
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl CharacteristicValues {
    #[new]
    #[pyo3(
        text_signature = "(x, y, /, variant='coulomb', test_type='triaxial', alpha=None, \
                          locality=None, material_factors=None, mean_intercept=None, \
                          characteristic_slope=None, characteristic_intercept=None)",
        signature = (
            x, y, variant = "coulomb", test_type = "triaxial", alpha = None, locality = None,
            material_factors = None, mean_intercept = None, characteristic_slope = None,
            characteristic_intercept = None
        )
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>, variant: &str,
        test_type: &str, alpha: Option<f64>, locality: Option<&str>,
        material_factors: Option<(f64, f64)>, mean_intercept: Option<f64>,
        characteristic_slope: Option<f64>, characteristic_intercept: Option<f64>,
    ) -> PyResult<CharacteristicValues> {
        let variant = parse_variant(variant)?;
        let test_type = parse_test_type(test_type)?;
        let settings = build_settings(alpha, locality, material_factors)?;

        let mut overrides = ManualOverride::new();
        overrides.set_mean_intercept(mean_intercept)?;
        overrides.set_characteristic_slope(characteristic_slope)?;
        overrides.set_characteristic_intercept(characteristic_intercept)?;

        let x = extract_f64_vec(py, x)?;
        let y = extract_f64_vec(py, y)?;
        if x.len() != y.len() {
            return Err(PyValueError::new_err("x and y must have the same length"));
        }
        let dataset = Dataset::from_pairs(&x, &y)?;
        let inner = analyse(variant, test_type, dataset, &settings, &overrides)?;
        Ok(CharacteristicValues { inner })
    }

    /// (mean, characteristic, design) of the primary quantity.
    #[getter]
    pub fn primary(&self) -> (f64, f64, f64) {
        tiers(&self.inner.result.primary)
    }

    /// (mean, characteristic, design) of the secondary quantity, if any.
    #[getter]
    pub fn secondary(&self) -> Option<(f64, f64, f64)> {
        self.inner.result.secondary.as_ref().map(tiers)
    }

    #[getter]
    pub fn primary_label(&self) -> &'static str {
        self.inner.result.primary.quantity.label()
    }

    #[getter]
    pub fn secondary_label(&self) -> Option<&'static str> {
        self.inner.result.secondary.as_ref().map(|q| q.quantity.label())
    }

    /// Implied standard deviations (primary, secondary).
    #[getter]
    pub fn std_devs(&self) -> (Option<f64>, Option<f64>) {
        let result = &self.inner.result;
        (result.primary.std_dev, result.secondary.as_ref().and_then(|q| q.std_dev))
    }

    /// Mean line (slope, intercept) in regression space.
    #[getter]
    pub fn mean_line(&self) -> (f64, f64) {
        let line = self.inner.result.mean_line;
        (line.slope, line.intercept)
    }

    /// Characteristic line (slope, intercept) in regression space.
    #[getter]
    pub fn characteristic_line(&self) -> (f64, f64) {
        let line = self.inner.result.characteristic_line;
        (line.slope, line.intercept)
    }

    #[getter]
    pub fn warnings(&self) -> Vec<String> {
        self.inner.result.warnings.iter().map(ToString::to_string).collect()
    }
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _soil_strength<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<CharacteristicValues>()?;
    Ok(())
}
