//! estimation::errors — error taxonomy for the characteristic-value engine.
//!
//! Purpose
//! -------
//! Provide the single error enum and result alias shared by every stage of
//! the estimation pipeline: sample selection, regression, confidence
//! envelopes, characteristic refits, parameter transforms, design values and
//! dispersion back-solves.
//!
//! Key behaviors
//! -------------
//! - Define [`EstimationResult`] and [`EstimationError`] as the canonical
//!   result and error types of the crate.
//! - Attach the offending values to each variant so that callers can log or
//!   report failures without re-deriving context.
//! - Collapse the detailed variants onto a coarse [`ErrorKind`] taxonomy
//!   (insufficient data, degenerate regression, invalid physical value,
//!   configuration error, numerical failure) for orchestration code that only
//!   needs to decide whether to abort or report a partial result.
//!
//! Invariants & assumptions
//! ------------------------
//! - Engine functions never return NaN in place of an error; every failure
//!   surfaces as an [`EstimationError`].
//! - Error values are small and cheap to clone.
//!
//! Conventions
//! -----------
//! - Messages are phrased in domain terms ("need at least 3 observations",
//!   "material factor must be positive") rather than in terms of internals.
//! - Under the `python-bindings` feature every variant maps to `ValueError`.
//!
//! Testing notes
//! -------------
//! - Unit tests check that payloads appear in `Display` output and that each
//!   variant lands on the intended [`ErrorKind`].

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{
    parameters::variant::Variant,
    samples::schema::{StressCriterion, TestType},
};

pub type EstimationResult<T> = Result<T, EstimationError>;

/// ErrorKind — coarse failure categories of the estimation engine.
///
/// Variants
/// --------
/// - `InsufficientData`
///   Fewer samples or grid points than the requested fit needs.
/// - `DegenerateRegression`
///   Zero variance in the independent variable.
/// - `InvalidPhysicalValue`
///   A physical quantity is outside the domain of a formula (non-positive
///   value under a logarithm, slope outside the triaxial range).
/// - `ConfigurationError`
///   Invalid settings, criteria, material factors or overrides.
/// - `NumericalFailure`
///   A distribution could not be constructed or a result is not finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InsufficientData,
    DegenerateRegression,
    InvalidPhysicalValue,
    ConfigurationError,
    NumericalFailure,
}

/// EstimationError — failure conditions of the characteristic-value engine.
///
/// Variants
/// --------
/// - `InsufficientData { required, actual, context }`
///   `actual` usable observations (or grid points) where `required` are
///   needed; `context` names the stage that failed.
/// - `LengthMismatch { x_len, y_len }`
///   Paired inputs of different length.
/// - `NonFiniteData { index, value }`
///   An input observation is NaN or ±∞.
/// - `DegenerateRegression { sum_sq_x_dev }`
///   All x values are equal, so the slope is undefined.
/// - `InvalidPhysicalValue { quantity, value }`
///   A value outside the physical domain of the formula that consumes it.
/// - `ConfigurationError { parameter, value, reason }`
///   A numeric setting, material factor or manual override is invalid.
/// - `UnsupportedCriterion { test_type, criterion }`
///   The stress criterion is not recorded for the requested test type.
/// - `UnsupportedVariant { variant, operation }`
///   The strength model has no line-based form for `operation`.
/// - `InvalidSettingsFile { reason }`
///   A TOML settings document could not be parsed.
/// - `Distribution { reason }`
///   A reference distribution (Student-t, normal, log-normal) rejected its
///   parameters.
/// - `NonFiniteResult { quantity }`
///   A computed quantity overflowed or otherwise became non-finite.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    //------ Data sufficiency ------
    InsufficientData { required: usize, actual: usize, context: &'static str },
    LengthMismatch { x_len: usize, y_len: usize },
    NonFiniteData { index: usize, value: f64 },
    DegenerateRegression { sum_sq_x_dev: f64 },

    //------ Physical domain ------
    InvalidPhysicalValue { quantity: &'static str, value: f64 },

    //------ Configuration ------
    ConfigurationError { parameter: &'static str, value: f64, reason: &'static str },
    UnsupportedCriterion { test_type: TestType, criterion: StressCriterion },
    UnsupportedVariant { variant: Variant, operation: &'static str },
    InvalidSettingsFile { reason: String },

    //------ Numerical ------
    Distribution { reason: String },
    NonFiniteResult { quantity: &'static str },
}

impl EstimationError {
    /// Map this error onto the coarse [`ErrorKind`] taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EstimationError::InsufficientData { .. } => ErrorKind::InsufficientData,
            EstimationError::DegenerateRegression { .. } => ErrorKind::DegenerateRegression,
            EstimationError::LengthMismatch { .. } | EstimationError::NonFiniteData { .. } => {
                ErrorKind::InsufficientData
            }
            EstimationError::InvalidPhysicalValue { .. } => ErrorKind::InvalidPhysicalValue,
            EstimationError::ConfigurationError { .. }
            | EstimationError::UnsupportedCriterion { .. }
            | EstimationError::UnsupportedVariant { .. }
            | EstimationError::InvalidSettingsFile { .. } => ErrorKind::ConfigurationError,
            EstimationError::Distribution { .. } | EstimationError::NonFiniteResult { .. } => {
                ErrorKind::NumericalFailure
            }
        }
    }
}

impl std::error::Error for EstimationError {}

impl std::fmt::Display for EstimationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimationError::InsufficientData { required, actual, context } => {
                write!(f, "{context}: need at least {required} observations, got {actual}.")
            }
            EstimationError::LengthMismatch { x_len, y_len } => {
                write!(f, "Paired inputs differ in length: x has {x_len}, y has {y_len}.")
            }
            EstimationError::NonFiniteData { index, value } => {
                write!(f, "Observation {index} is not finite: {value}.")
            }
            EstimationError::DegenerateRegression { sum_sq_x_dev } => {
                write!(
                    f,
                    "Degenerate regression: x has zero spread (sum of squared deviations \
                     {sum_sq_x_dev})."
                )
            }
            EstimationError::InvalidPhysicalValue { quantity, value } => {
                write!(f, "Invalid value for {quantity}: {value}.")
            }
            EstimationError::ConfigurationError { parameter, value, reason } => {
                write!(f, "Invalid {parameter}: {value}. {reason}")
            }
            EstimationError::UnsupportedCriterion { test_type, criterion } => {
                write!(f, "Stress criterion {criterion} is not recorded for {test_type} tests.")
            }
            EstimationError::UnsupportedVariant { variant, operation } => {
                write!(f, "{operation} is not available for the {variant} model.")
            }
            EstimationError::InvalidSettingsFile { reason } => {
                write!(f, "Could not read settings: {reason}")
            }
            EstimationError::Distribution { reason } => {
                write!(f, "Reference distribution rejected its parameters: {reason}")
            }
            EstimationError::NonFiniteResult { quantity } => {
                write!(f, "Computed {quantity} is not finite.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<EstimationError> for PyErr {
    fn from(err: EstimationError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
