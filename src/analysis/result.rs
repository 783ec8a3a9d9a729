//! analysis::result — three-tier engineering results and caller warnings.
//!
//! Purpose
//! -------
//! Carry the output of `engineering_result`: the resolved mean and
//! characteristic lines, the mean / characteristic / design value of each
//! physical quantity, the implied standard deviations, and every warning the
//! pipeline raised on the way.
//!
//! Key behaviors
//! -------------
//! - [`QuantityResult`] reports angles in degrees and additionally keeps the
//!   tangents the design values were computed from.
//! - [`ResultWarning`] mirrors each `warn!` emitted while building the result,
//!   so nothing a caller needs to see lives only in the log.
//! - Every type derives `Serialize` for export collaborators.
//!
//! Invariants & assumptions
//! ------------------------
//! - All reported values are finite; non-finite intermediates are errors.

use serde::Serialize;

use crate::{
    analysis::overrides::Resolved,
    parameters::variant::{Line, Quantity, Variant},
    samples::schema::TestType,
};

/// Mean, characteristic and design value of one quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierValues {
    pub mean: f64,
    pub characteristic: f64,
    pub design: f64,
}

impl TierValues {
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        TierValues {
            mean: f(self.mean),
            characteristic: f(self.characteristic),
            design: f(self.design),
        }
    }
}

/// QuantityResult — one physical quantity across the three tiers.
///
/// Fields
/// ------
/// - `quantity`: which quantity, with its reporting unit.
/// - `values`: tiers in reporting units (degrees for angles).
/// - `tangent`: tiers as tan φ for angles, `None` otherwise.
/// - `std_dev`: implied log-normal standard deviation in reporting units,
///   `None` when it could not be derived (see the warnings).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantityResult {
    pub quantity: Quantity,
    pub values: TierValues,
    pub tangent: Option<TierValues>,
    pub std_dev: Option<f64>,
}

/// Non-fatal conditions raised while building a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResultWarning {
    /// A non-positive mean or design value was replaced by `epsilon` in the
    /// dispersion solve.
    DispersionSubstituted { quantity: Quantity, mean: f64, design: f64, epsilon: f64 },
    /// No standard deviation could be derived.
    DispersionUnavailable { quantity: Quantity, reason: String },
    /// An exponent m above 1 (mean or characteristic tier).
    ExponentAboveOne { value: f64 },
    /// Envelope grid points with a non-finite bound were left out of the
    /// characteristic refit.
    DroppedEnvelopePoints { count: usize },
    /// An optional part of a combined report could not be computed.
    PartialReport { stage: &'static str, reason: String },
}

impl std::fmt::Display for ResultWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultWarning::DispersionSubstituted { quantity, mean, design, epsilon } => write!(
                f,
                "{quantity}: mean {mean} / design {design} not positive, standard deviation \
                 computed with {epsilon}"
            ),
            ResultWarning::DispersionUnavailable { quantity, reason } => {
                write!(f, "{quantity}: standard deviation unavailable ({reason})")
            }
            ResultWarning::ExponentAboveOne { value } => {
                write!(f, "strength exponent m = {value} is greater than 1")
            }
            ResultWarning::DroppedEnvelopePoints { count } => {
                write!(f, "{count} envelope points skipped in the characteristic refit")
            }
            ResultWarning::PartialReport { stage, reason } => {
                write!(f, "{stage} not computed: {reason}")
            }
        }
    }
}

/// EngineeringResult — physical parameters of one analysis.
///
/// Fields
/// ------
/// - `variant`, `test_type`: the model and test family analysed.
/// - `mean_intercept`, `characteristic_slope`, `characteristic_intercept`:
///   the overridable line coefficients with their source.
/// - `mean_line`, `characteristic_line`: regression-space lines after
///   overrides.
/// - `primary`, `secondary`: per-quantity tiers; `secondary` is `None` for
///   the stress-ratio method.
/// - `warnings`: every caller-visible warning, in the order raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineeringResult {
    pub variant: Variant,
    pub test_type: TestType,
    pub mean_intercept: Resolved<f64>,
    pub characteristic_slope: Resolved<f64>,
    pub characteristic_intercept: Resolved<f64>,
    pub mean_line: Line,
    pub characteristic_line: Line,
    pub primary: QuantityResult,
    pub secondary: Option<QuantityResult>,
    pub warnings: Vec<ResultWarning>,
}

impl EngineeringResult {
    /// The result of `quantity`, if this variant reports it.
    pub fn quantity(&self, quantity: Quantity) -> Option<&QuantityResult> {
        std::iter::once(&self.primary)
            .chain(self.secondary.as_ref())
            .find(|q| q.quantity == quantity)
    }
}
