//! utils — conversion helpers for the Python bindings.
//!
//! Only compiled with the `python-bindings` feature. Parses the string
//! selectors accepted by the Python API and copies array-likes into
//! contiguous `f64` buffers.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::{
    analysis::settings::{Locality, Settings},
    parameters::{
        design::MaterialFactors,
        variant::{PowerLawForm, Variant},
    },
    samples::schema::TestType,
};

/// Borrow a 1-D float64 array, converting pandas objects and sequences.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy an array-like into an owned vector.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(py: Python<'py>, raw_data: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| PyValueError::new_err("array must be contiguous"))?;
    Ok(slice.to_vec())
}

#[cfg(feature = "python-bindings")]
pub fn parse_variant(name: &str) -> PyResult<Variant> {
    match name.to_ascii_lowercase().as_str() {
        "coulomb" => Ok(Variant::Coulomb),
        "stress_ratio" | "coulomb_stress_ratio" => Ok(Variant::CoulombStressRatio),
        "power_law" | "power_law_linear" => Ok(Variant::PowerLaw(PowerLawForm::Linear)),
        "power_law_loglog" | "sutabel" => Ok(Variant::PowerLaw(PowerLawForm::LogLog)),
        "loglog" | "log_log" | "shansep" => Ok(Variant::LogLog),
        _ => Err(PyValueError::new_err(format!(
            "unknown variant '{name}'; expected coulomb, stress_ratio, power_law, \
             power_law_loglog or loglog"
        ))),
    }
}

#[cfg(feature = "python-bindings")]
pub fn parse_test_type(name: &str) -> PyResult<TestType> {
    match name.to_ascii_lowercase().as_str() {
        "triaxial" | "tx" => Ok(TestType::Triaxial),
        "dss" | "direct_simple_shear" => Ok(TestType::DirectSimpleShear),
        _ => Err(PyValueError::new_err(format!(
            "unknown test type '{name}'; expected triaxial or dss"
        ))),
    }
}

/// Build [`Settings`] from the keyword arguments of the Python API.
///
/// `locality` and `alpha` are mutually exclusive; with neither the default
/// alpha applies.
#[cfg(feature = "python-bindings")]
pub fn build_settings(
    alpha: Option<f64>, locality: Option<&str>, material_factors: Option<(f64, f64)>,
) -> PyResult<Settings> {
    let factors = match material_factors {
        Some((primary, secondary)) => MaterialFactors::new(primary, secondary)?,
        None => MaterialFactors::default(),
    };
    match (alpha, locality) {
        (Some(_), Some(_)) => {
            Err(PyValueError::new_err("pass either alpha or locality, not both"))
        }
        (Some(alpha), None) => Ok(Settings::new(alpha, factors)?),
        (None, Some(name)) => {
            let locality = match name.to_ascii_lowercase().as_str() {
                "local" => Locality::Local,
                "regional" => Locality::Regional,
                _ => {
                    return Err(PyValueError::new_err(format!(
                        "unknown locality '{name}'; expected local or regional"
                    )));
                }
            };
            Ok(Settings::for_locality(locality, factors))
        }
        (None, None) => {
            let mut settings = Settings::default();
            settings.set_material_factors(factors);
            Ok(settings)
        }
    }
}
