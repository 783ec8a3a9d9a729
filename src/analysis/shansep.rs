//! analysis::shansep — combined SHANSEP report.
//!
//! Purpose
//! -------
//! Combine the two regressions of a SHANSEP evaluation into one report:
//!
//! - the linear power-law fit Su = a + S·σ'v,c on overconsolidated rows,
//! - the log-log fit ln(Su/σ'v,c) = ln S + m·ln OCR on all rows,
//!
//! and derive from them the pre-overburden pressure POP = a / S / m, the
//! field POP statistics, the normally consolidated strength ratio and the
//! SHANSEP strength curve Su(σ'v) = S·σ'v·((POP + σ'v)/σ'v)^m.
//!
//! Key behaviors
//! -------------
//! - Both regressions run through [`Analysis`], so settings and manual
//!   overrides act on them exactly as in a single-variant analysis.
//! - POP is computed twice: from the mean lines and from the characteristic
//!   lines of both fits.
//! - Field POP = σ'v,in-situ·OCR − σ'v,in-situ per overconsolidated sample,
//!   with characteristic value mean − t·s·sqrt((1 − α) + 1/n) (two-sided 10%
//!   / n − 2).
//! - The implied standard deviation of POP is back-solved from its mean and
//!   characteristic value; a non-positive POP leaves it unavailable with a
//!   warning.
//! - The NC strength ratio is the geometric mean of Su/σ'v,c over normally
//!   consolidated rows, bounded with the critical value t(0.95, n_oc − 2)
//!   and the 1/n_oc term of the overconsolidated linear fit.
//! - The field POP, NC ratio and strength curve are optional parts: data
//!   failures there become [`ResultWarning::PartialReport`] entries, while
//!   configuration errors still abort.
//!
//! Invariants & assumptions
//! ------------------------
//! - The two analyses always share one [`Settings`].

use ndarray::Array1;
use tracing::warn;

use crate::{
    analysis::{
        overrides::ManualOverride,
        pipeline::{Analysis, AnalysisReport},
        result::ResultWarning,
        settings::Settings,
    },
    estimation::{
        critical::ConfidenceLevel,
        envelope::MeanBounds,
        errors::{ErrorKind, EstimationResult},
    },
    parameters::{
        dispersion::{DispersionNote, NonPositivePolicy, estimate},
        log_log,
        variant::{Line, PowerLawForm, Quantity, Variant},
    },
    samples::{
        schema::FieldMap,
        selection::{self, SampleQuery},
        table::SampleTable,
    },
};

/// POP from the mean and from the characteristic lines (kPa).
///
/// `std_dev` is the log-normal standard deviation implied by the (mean,
/// characteristic) pair, `None` when either is not positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopEstimate {
    pub mean: f64,
    pub characteristic: f64,
    pub std_dev: Option<f64>,
}

/// Strength ratio Su/σ'v,c of normally consolidated samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalRatio {
    pub n: usize,
    pub mean: f64,
    pub characteristic: f64,
    pub upper: f64,
}

/// One row of the SHANSEP strength curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShansepPoint {
    pub stress: f64,
    pub mean: f64,
    pub characteristic: f64,
}

/// ShansepReport — everything one [`ShansepAnalysis::run`] produced.
///
/// Fields
/// ------
/// - `linear`, `log_log`: the two regression runs with their own results
///   and warnings.
/// - `pop`: POP = a / S / m from the mean and characteristic lines.
/// - `field_pop`: bounds on the per-sample POP of overconsolidated rows.
/// - `normal_ratio`: NC strength ratio with its bounds.
/// - `strength_table`: Su at the table stresses and the largest σ'v,c.
/// - `warnings`: report-level warnings (skipped optional parts).
#[derive(Debug, Clone, PartialEq)]
pub struct ShansepReport {
    pub linear: AnalysisReport,
    pub log_log: AnalysisReport,
    pub pop: PopEstimate,
    pub field_pop: Option<MeanBounds>,
    pub normal_ratio: Option<NormalRatio>,
    pub strength_table: Option<Vec<ShansepPoint>>,
    pub warnings: Vec<ResultWarning>,
}

impl ShansepReport {
    /// Report-level warnings followed by those of both regressions.
    pub fn all_warnings(&self) -> impl Iterator<Item = &ResultWarning> {
        self.warnings
            .iter()
            .chain(&self.linear.result.warnings)
            .chain(&self.log_log.result.warnings)
    }
}

/// Paired linear power-law and log-log analyses over one sample query.
#[derive(Debug, Clone, PartialEq)]
pub struct ShansepAnalysis {
    linear: Analysis,
    log_log: Analysis,
}

impl ShansepAnalysis {
    /// Errors
    /// ------
    /// - `UnsupportedCriterion` for a criterion the test type does not record.
    pub fn new(query: SampleQuery, settings: Settings) -> EstimationResult<Self> {
        let linear = Analysis::new(Variant::PowerLaw(PowerLawForm::Linear), query.clone())?
            .with_settings(settings);
        let log_log = Analysis::new(Variant::LogLog, query)?.with_settings(settings);
        Ok(ShansepAnalysis { linear, log_log })
    }

    pub fn settings(&self) -> &Settings {
        self.linear.settings()
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.linear.set_settings(settings);
        self.log_log.set_settings(settings);
    }

    pub fn set_linear_overrides(&mut self, overrides: ManualOverride) {
        self.linear.set_overrides(overrides);
    }

    pub fn set_log_log_overrides(&mut self, overrides: ManualOverride) {
        self.log_log.set_overrides(overrides);
    }

    /// Run both regressions and derive the combined quantities.
    ///
    /// Errors
    /// ------
    /// - Any error of the two regression runs.
    /// - `InvalidPhysicalValue` when S·m = 0 for either POP.
    pub fn run(&self, table: &SampleTable) -> EstimationResult<ShansepReport> {
        let linear = self.linear.run(table)?;
        let log_log = self.log_log.run(table)?;
        let query = self.linear.query();
        let alpha = self.settings().alpha();

        // a / S / m, with S from the linear fit and m from the log-log fit.
        let mean = log_log::pre_overburden_pressure(
            linear.result.mean_line.intercept,
            linear.result.mean_line.slope,
            log_log.result.mean_line.slope,
        )?;
        let characteristic = log_log::pre_overburden_pressure(
            linear.result.characteristic_line.intercept,
            linear.result.characteristic_line.slope,
            log_log.result.characteristic_line.slope,
        )?;

        let mut warnings = Vec::new();
        let std_dev = pop_std_dev(mean, characteristic, &mut warnings)?;
        let pop = PopEstimate { mean, characteristic, std_dev };

        let field_pop = optional("field POP", field_pop(table, query, alpha), &mut warnings)?;
        let oc_count = linear.dataset.len();
        let normal_ratio = optional(
            "NC strength ratio",
            normal_ratio(table, query, alpha, oc_count),
            &mut warnings,
        )?;
        let table_rows = strength_table(&linear, &log_log, pop);
        let strength_table = optional("SHANSEP strength table", table_rows, &mut warnings)?;

        Ok(ShansepReport {
            linear,
            log_log,
            pop,
            field_pop,
            normal_ratio,
            strength_table,
            warnings,
        })
    }
}

// ---------- Private helpers (compact docs) ----------

/// Per-sample POP bounds over overconsolidated rows.
fn field_pop(
    table: &SampleTable, query: &SampleQuery, alpha: f64,
) -> EstimationResult<MeanBounds> {
    let dataset = selection::select(table, query, &FieldMap::in_situ_state())?;
    let pop: Array1<f64> = dataset
        .x()
        .iter()
        .zip(dataset.y())
        .map(|(&stress, &ocr)| log_log::sample_pop(stress, ocr))
        .collect();
    MeanBounds::new(pop.view(), alpha, ConfidenceLevel::TwoSided10)
}

/// Implied POP dispersion; the note is mirrored as a report warning.
fn pop_std_dev(
    mean: f64, characteristic: f64, warnings: &mut Vec<ResultWarning>,
) -> EstimationResult<Option<f64>> {
    let quantity = Quantity::PreOverburdenPressure;
    let outcome = estimate(quantity.label(), mean, characteristic, NonPositivePolicy::Unavailable)?;
    match outcome.note {
        Some(DispersionNote::Unavailable { reason }) => {
            warnings.push(ResultWarning::DispersionUnavailable { quantity, reason })
        }
        Some(DispersionNote::Substituted { mean, design, epsilon }) => {
            warnings.push(ResultWarning::DispersionSubstituted { quantity, mean, design, epsilon })
        }
        None => {}
    }
    Ok(outcome.std_dev)
}

/// NC ratio bounds with t and 1/n taken from the `oc_count` rows of the
/// overconsolidated linear fit.
fn normal_ratio(
    table: &SampleTable, query: &SampleQuery, alpha: f64, oc_count: usize,
) -> EstimationResult<NormalRatio> {
    let field_map = FieldMap::normal_strength_ratio(query.test_type, query.criterion)?;
    let dataset = selection::select(table, query, &field_map)?;
    let bounds = MeanBounds::with_reference(
        dataset.y(),
        alpha,
        ConfidenceLevel::TwoSided10,
        oc_count,
    )?;
    let (mean, characteristic, upper) = bounds.exp();
    Ok(NormalRatio { n: bounds.n, mean, characteristic, upper })
}

/// Mean curve from the mean S, m and POP; characteristic from theirs.
fn strength_table(
    linear: &AnalysisReport, log_log: &AnalysisReport, pop: PopEstimate,
) -> EstimationResult<Vec<ShansepPoint>> {
    let max_stress = linear.dataset.x_range().1;
    let curve = |line: Line, pop: f64| {
        log_log::strength_table(
            log_log::strength_ratio(line.intercept),
            log_log::exponent(line.slope),
            pop,
            max_stress,
        )
    };
    let mean = curve(log_log.result.mean_line, pop.mean)?;
    let characteristic = curve(log_log.result.characteristic_line, pop.characteristic)?;
    Ok(mean
        .into_iter()
        .zip(characteristic)
        .map(|((stress, mean), (_, characteristic))| ShansepPoint { stress, mean, characteristic })
        .collect())
}

/// Data failures become a partial-report warning; configuration errors abort.
fn optional<T>(
    stage: &'static str, result: EstimationResult<T>, warnings: &mut Vec<ResultWarning>,
) -> EstimationResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == ErrorKind::ConfigurationError => Err(err),
        Err(err) => {
            warn!(stage, %err, "skipping optional part of SHANSEP report");
            warnings.push(ResultWarning::PartialReport { stage, reason: err.to_string() });
            Ok(None)
        }
    }
}
