//! analysis::pipeline — public stages and the `Analysis` orchestrator.
//!
//! Purpose
//! -------
//! Expose the characteristic-value engine as a chain of pure functions over
//! immutable records:
//!
//! `SampleTable → Dataset → RegressionFit → ConfidenceCurve →
//!  CharacteristicFit → EngineeringResult`
//!
//! and bundle them in [`Analysis`], which owns the settings and manual
//! overrides of one analysis and recomputes every stage on each
//! [`Analysis::run`].
//!
//! Key behaviors
//! -------------
//! - [`select`], [`fit`], [`confidence_curve`], [`characteristic_fit`] and
//!   [`engineering_result`] can be called one by one by visualisation or
//!   export collaborators that need the intermediates.
//! - [`engineering_result`] resolves every overridable coefficient once into
//!   a [`Resolved`] value, transforms the mean and characteristic lines into
//!   physical quantities, divides by the material factors and back-solves the
//!   implied standard deviations.
//! - [`Analysis::run`] switches to the constrained path when a manual mean
//!   intercept is set and to the stress-ratio path for
//!   [`Variant::CoulombStressRatio`].
//!
//! Invariants & assumptions
//! ------------------------
//! - No stage caches anything; two runs with unchanged inputs return equal
//!   reports.
//! - Design values of friction angles are taken in tan φ and converted to
//!   degrees afterwards.
//!
//! Testing notes
//! -------------
//! - Unit tests use the five-point reference dataset through direct
//!   `Dataset::from_pairs` construction; table-driven end-to-end runs live
//!   in `tests/integration_*.rs`.

use tracing::{debug, warn};

use crate::{
    analysis::{
        overrides::{ManualOverride, Resolved},
        result::{EngineeringResult, QuantityResult, ResultWarning, TierValues},
        settings::Settings,
        stress_ratio::{stress_ratio_bounds, stress_ratio_result},
    },
    estimation::{
        characteristic::{CharacteristicFit, CharacteristicSource, constrained_envelope},
        critical::ConfidenceLevel,
        envelope::{ConfidenceCurve, MeanBounds},
        errors::{EstimationError, EstimationResult},
        regression::RegressionFit,
    },
    parameters::{
        coulomb::degrees,
        design::design_value,
        dispersion::{DispersionNote, NonPositivePolicy, estimate},
        variant::{Line, Quantity, Variant},
    },
    samples::{
        schema::{FieldMap, TestType},
        selection::{self, Dataset, SampleQuery},
        table::SampleTable,
    },
};

pub use crate::estimation::characteristic::characteristic_fit;

/// Observations of `query` laid out for `variant`.
///
/// Errors
/// ------
/// - `UnsupportedCriterion` when the criterion is not recorded for the test
///   type.
/// - `InsufficientData` when no row survives the filters.
pub fn select(
    table: &SampleTable, query: &SampleQuery, variant: Variant,
) -> EstimationResult<Dataset> {
    let field_map = FieldMap::for_variant(variant, query.test_type, query.criterion)?;
    selection::select(table, query, &field_map)
}

/// Ordinary least-squares fit of a dataset.
///
/// Errors
/// ------
/// - `InsufficientData` for fewer than 3 observations.
/// - `DegenerateRegression` when all x are equal.
pub fn fit(dataset: &Dataset) -> EstimationResult<RegressionFit> {
    let fit = RegressionFit::ols(dataset.x(), dataset.y())?;
    debug!(
        n = fit.n,
        slope = fit.slope,
        intercept = fit.intercept,
        chi2 = fit.sum_sq_residual,
        "fitted regression line"
    );
    Ok(fit)
}

/// Envelope of `fit` over the x range of `dataset` at `settings.alpha()`.
///
/// Use [`Variant::confidence_level`] for the convention of a variant.
pub fn confidence_curve(
    fit: &RegressionFit, dataset: &Dataset, settings: &Settings, level: ConfidenceLevel,
) -> EstimationResult<ConfidenceCurve> {
    ConfidenceCurve::new(fit, dataset.x_range(), settings.alpha(), level)
}

/// Mean, characteristic and design values of `variant`.
///
/// Parameters
/// ----------
/// - `variant`, `test_type`: [`Variant`], [`TestType`]
///   Select the transform table row.
/// - `fit`: [`RegressionFit`]
///   Mean line. When `overrides` fixes the mean intercept this must be the
///   constrained fit through that intercept.
/// - `characteristic`: [`CharacteristicFit`]
///   Characteristic line before overrides.
/// - `settings`: [`Settings`]
///   Material factors.
/// - `overrides`: [`ManualOverride`]
///   Manual coefficients replacing the computed ones.
///
/// Returns
/// -------
/// `EstimationResult<EngineeringResult>`
///   Tiers for the primary and (if any) secondary quantity plus warnings.
///
/// Errors
/// ------
/// - `UnsupportedVariant` for [`Variant::CoulombStressRatio`], which has no
///   regression line; use [`Analysis`] or `stress_ratio_result`.
/// - `ConfigurationError` when a manual mean intercept is set but `fit` was
///   not constrained through it.
/// - `InvalidPhysicalValue` for a triaxial slope outside (−1, 1) or a
///   non-positive friction angle in the dispersion solve.
/// - `NonFiniteResult` when a transformed value overflows.
pub fn engineering_result(
    variant: Variant, test_type: TestType, fit: &RegressionFit,
    characteristic: &CharacteristicFit, settings: &Settings, overrides: &ManualOverride,
) -> EstimationResult<EngineeringResult> {
    if variant == Variant::CoulombStressRatio {
        return Err(EstimationError::UnsupportedVariant {
            variant,
            operation: "A regression-based engineering result",
        });
    }

    let mean_intercept = Resolved::resolve(fit.intercept, overrides.mean_intercept());
    if let Resolved::Manual(intercept) = mean_intercept {
        if !(fit.fixed_intercept && fit.intercept == intercept) {
            return Err(EstimationError::ConfigurationError {
                parameter: "manual mean intercept",
                value: intercept,
                reason: "The mean fit must be constrained through the manual intercept.",
            });
        }
    }
    let characteristic_slope =
        Resolved::resolve(characteristic.slope, overrides.characteristic_slope());
    let characteristic_intercept =
        Resolved::resolve(characteristic.intercept, overrides.characteristic_intercept());

    let mean_line = Line::new(fit.slope, mean_intercept.value());
    let characteristic_line =
        Line::new(characteristic_slope.value(), characteristic_intercept.value());

    let mut warnings = Vec::new();
    if characteristic.dropped > 0 {
        warnings.push(ResultWarning::DroppedEnvelopePoints { count: characteristic.dropped });
    }
    let (primary, secondary) =
        tier_lines(variant, test_type, mean_line, characteristic_line, settings, &mut warnings)?;

    debug!(
        %variant,
        %test_type,
        mean = primary.values.mean,
        characteristic = primary.values.characteristic,
        design = primary.values.design,
        warnings = warnings.len(),
        "engineering result"
    );
    Ok(EngineeringResult {
        variant,
        test_type,
        mean_intercept,
        characteristic_slope,
        characteristic_intercept,
        mean_line,
        characteristic_line,
        primary,
        secondary,
        warnings,
    })
}

/// Intermediates of a regression-based run.
///
/// Fields
/// ------
/// - `fit`: unconstrained OLS fit of the dataset.
/// - `mean_fit`: the mean line actually used; equals `fit` unless a manual
///   mean intercept is set.
/// - `curve`: envelope around `mean_fit`.
/// - `characteristic`, `upper`: refits of the lower and upper curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionStages {
    pub fit: RegressionFit,
    pub mean_fit: RegressionFit,
    pub curve: ConfidenceCurve,
    pub characteristic: CharacteristicFit,
    pub upper: CharacteristicFit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stages {
    Regression(Box<RegressionStages>),
    StressRatio(MeanBounds),
}

/// Everything one [`Analysis::run`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub dataset: Dataset,
    pub stages: Stages,
    pub result: EngineeringResult,
}

impl AnalysisReport {
    pub fn regression(&self) -> Option<&RegressionStages> {
        match &self.stages {
            Stages::Regression(stages) => Some(stages),
            Stages::StressRatio(_) => None,
        }
    }

    pub fn stress_ratio(&self) -> Option<&MeanBounds> {
        match &self.stages {
            Stages::StressRatio(bounds) => Some(bounds),
            Stages::Regression(_) => None,
        }
    }
}

/// Analysis — one configured characteristic-value analysis.
///
/// Purpose
/// -------
/// Own the variant, sample query, [`Settings`] and [`ManualOverride`] of one
/// analysis and run the full pipeline against a sample table on request.
///
/// Invariants
/// ----------
/// - The field map is built, and the stress criterion checked against the
///   test type, in [`Analysis::new`].
/// - Settings and overrides change only through the explicit setters.
///
/// Examples
/// --------
/// ```rust
/// # use soil_strength::analysis::pipeline::Analysis;
/// # use soil_strength::parameters::variant::Variant;
/// # use soil_strength::samples::{schema::{StressCriterion, TestType}, selection::SampleQuery};
/// let query = SampleQuery::new(TestType::Triaxial, ["clay"], StressCriterion::Strain10);
/// assert!(Analysis::new(Variant::Coulomb, query).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    variant: Variant,
    query: SampleQuery,
    field_map: FieldMap,
    settings: Settings,
    overrides: ManualOverride,
}

impl Analysis {
    /// Errors
    /// ------
    /// - `UnsupportedCriterion` for a criterion the test type does not record.
    pub fn new(variant: Variant, query: SampleQuery) -> EstimationResult<Self> {
        let field_map = FieldMap::for_variant(variant, query.test_type, query.criterion)?;
        Ok(Analysis {
            variant,
            query,
            field_map,
            settings: Settings::default(),
            overrides: ManualOverride::default(),
        })
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_overrides(mut self, overrides: ManualOverride) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn query(&self) -> &SampleQuery {
        &self.query
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn overrides(&self) -> &ManualOverride {
        &self.overrides
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn set_overrides(&mut self, overrides: ManualOverride) {
        self.overrides = overrides;
    }

    /// Settings for in-place edits through their validating setters.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn overrides_mut(&mut self) -> &mut ManualOverride {
        &mut self.overrides
    }

    /// Run every stage against `table`.
    ///
    /// Errors
    /// ------
    /// - Any error of the individual stages; nothing is partially returned.
    pub fn run(&self, table: &SampleTable) -> EstimationResult<AnalysisReport> {
        let dataset = selection::select(table, &self.query, &self.field_map)?;
        analyse(
            self.variant,
            self.query.test_type,
            dataset,
            &self.settings,
            &self.overrides,
        )
    }
}

/// Run every stage after selection on an already laid-out dataset.
///
/// Parameters
/// ----------
/// - `dataset`: observations in the layout of `variant` (see
///   `FieldMap::for_variant`).
///
/// Notes
/// -----
/// - A manual mean intercept switches to the constrained envelope and the
///   fixed-intercept characteristic refit.
/// - [`Variant::CoulombStressRatio`] runs the log-mean ratio bounds instead
///   of the regression stages.
///
/// Errors
/// ------
/// - Any error of the individual stages; nothing is partially returned.
pub fn analyse(
    variant: Variant, test_type: TestType, dataset: Dataset, settings: &Settings,
    overrides: &ManualOverride,
) -> EstimationResult<AnalysisReport> {
    if variant == Variant::CoulombStressRatio {
        let bounds = stress_ratio_bounds(&dataset, settings)?;
        let result = stress_ratio_result(test_type, &bounds, settings, overrides)?;
        return Ok(AnalysisReport { dataset, stages: Stages::StressRatio(bounds), result });
    }

    let level = variant.confidence_level();
    let alpha = settings.alpha();
    let unconstrained = fit(&dataset)?;
    let (mean_fit, curve, characteristic) = match overrides.mean_intercept() {
        Some(intercept) => {
            let (mean_fit, curve) =
                constrained_envelope(dataset.x(), dataset.y(), intercept, alpha, level)?;
            let characteristic = characteristic_fit(CharacteristicSource::FixedIntercept {
                x: dataset.x(),
                y: dataset.y(),
                intercept,
                alpha,
                level,
            })?;
            (mean_fit, curve, characteristic)
        }
        None => {
            let curve = confidence_curve(&unconstrained, &dataset, settings, level)?;
            let characteristic = characteristic_fit(CharacteristicSource::Envelope(&curve))?;
            (unconstrained, curve, characteristic)
        }
    };
    let upper = CharacteristicFit::upper_from_curve(&curve)?;
    let result =
        engineering_result(variant, test_type, &mean_fit, &characteristic, settings, overrides)?;

    let stages = RegressionStages { fit: unconstrained, mean_fit, curve, characteristic, upper };
    Ok(AnalysisReport { dataset, stages: Stages::Regression(Box::new(stages)), result })
}

// ---------- Private helpers (compact docs) ----------

/// Transform both lines, apply the material factors and solve dispersions.
pub(crate) fn tier_lines(
    variant: Variant, test_type: TestType, mean_line: Line, characteristic_line: Line,
    settings: &Settings, warnings: &mut Vec<ResultWarning>,
) -> EstimationResult<(QuantityResult, Option<QuantityResult>)> {
    let mean = variant.transform(test_type, mean_line)?;
    let characteristic = variant.transform(test_type, characteristic_line)?;
    let factors = settings.material_factors();

    let primary = tier_quantity(
        variant.primary(),
        mean.primary,
        characteristic.primary,
        factors.primary(),
        warnings,
    )?;
    let secondary = match (variant.secondary(), mean.secondary, characteristic.secondary) {
        (Some(quantity), Some(m), Some(c)) => {
            Some(tier_quantity(quantity, m, c, factors.secondary(), warnings)?)
        }
        _ => None,
    };
    Ok((primary, secondary))
}

/// Angles arrive as tan φ and leave in degrees, with the tangents kept.
fn tier_quantity(
    quantity: Quantity, mean: f64, characteristic: f64, factor: f64,
    warnings: &mut Vec<ResultWarning>,
) -> EstimationResult<QuantityResult> {
    let raw = TierValues { mean, characteristic, design: design_value(characteristic, factor)? };
    let (values, tangent) = match quantity {
        Quantity::FrictionAngle => (raw.map(degrees), Some(raw)),
        _ => (raw, None),
    };

    if quantity == Quantity::Exponent {
        let value = values.mean.max(values.characteristic);
        if value > 1.0 {
            warn!(value, "strength exponent m above 1");
            warnings.push(ResultWarning::ExponentAboveOne { value });
        }
    }

    let outcome = estimate(
        quantity.label(),
        values.mean,
        values.design,
        NonPositivePolicy::for_quantity(quantity),
    )?;
    match outcome.note {
        Some(DispersionNote::Substituted { mean, design, epsilon }) => {
            warnings.push(ResultWarning::DispersionSubstituted { quantity, mean, design, epsilon })
        }
        Some(DispersionNote::Unavailable { reason }) => {
            warnings.push(ResultWarning::DispersionUnavailable { quantity, reason })
        }
        None => {}
    }
    Ok(QuantityResult { quantity, values, tangent, std_dev: outcome.std_dev })
}
