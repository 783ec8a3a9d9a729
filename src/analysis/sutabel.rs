//! analysis::sutabel — SUTABEL power-law report.
//!
//! Runs the log-log power-law regression ln Su = ln S + (1 − m)·ln σ'v,c on
//! overconsolidated rows and tabulates the strength curve
//! Su = S·σ'v^(1 − m) for the mean and characteristic lines. With a
//! coefficient of variation the table also carries the constant-CoV
//! characteristic strength: the 5% quantile of a log-normal with the mean
//! curve as its mean.

use crate::{
    analysis::{
        overrides::ManualOverride,
        pipeline::{Analysis, AnalysisReport},
        settings::Settings,
    },
    estimation::{errors::EstimationResult, validation::validate_material_factor},
    parameters::{
        power_law,
        variant::{Line, PowerLawForm, Variant},
    },
    samples::{selection::SampleQuery, table::SampleTable},
};

/// One row of the SUTABEL strength table (kPa).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SutabelPoint {
    pub stress: f64,
    pub mean: f64,
    pub characteristic: f64,
    pub constant_cov: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SutabelReport {
    pub analysis: AnalysisReport,
    /// Standard error of estimate of the log-log fit, sqrt(chi2 / (n − 2)).
    pub steyx: f64,
    pub coefficient_of_variation: Option<f64>,
    pub strength_table: Vec<SutabelPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SutabelAnalysis {
    analysis: Analysis,
    coefficient_of_variation: Option<f64>,
}

impl SutabelAnalysis {
    /// Errors
    /// ------
    /// - `UnsupportedCriterion` for a criterion the test type does not record.
    pub fn new(query: SampleQuery, settings: Settings) -> EstimationResult<Self> {
        let analysis = Analysis::new(Variant::PowerLaw(PowerLawForm::LogLog), query)?
            .with_settings(settings);
        Ok(SutabelAnalysis { analysis, coefficient_of_variation: None })
    }

    pub fn analysis_mut(&mut self) -> &mut Analysis {
        &mut self.analysis
    }

    pub fn set_overrides(&mut self, overrides: ManualOverride) {
        self.analysis.set_overrides(overrides);
    }

    /// Set (or clear) the CoV of the constant-CoV curve.
    ///
    /// Errors
    /// ------
    /// - `ConfigurationError` unless finite and strictly positive.
    pub fn set_coefficient_of_variation(&mut self, vc: Option<f64>) -> EstimationResult<()> {
        self.coefficient_of_variation = vc
            .map(|v| validate_material_factor("coefficient of variation", v))
            .transpose()?;
        Ok(())
    }

    /// Errors
    /// ------
    /// - Any error of the regression run.
    /// - `NonFiniteResult` when a tabulated strength overflows.
    pub fn run(&self, table: &SampleTable) -> EstimationResult<SutabelReport> {
        let analysis = self.analysis.run(table)?;
        let steyx = analysis.regression().map_or(0.0, |stages| stages.mean_fit.standard_error());
        let max_stress = analysis.dataset.x_range().1.exp();

        let curve = |line: Line, vc: Option<f64>| {
            power_law::strength_table(
                power_law::reference_strength(line.intercept),
                power_law::exponent(line.slope),
                max_stress,
                vc,
            )
        };
        let mean = curve(analysis.result.mean_line, self.coefficient_of_variation)?;
        let characteristic = curve(analysis.result.characteristic_line, None)?;
        let strength_table = mean
            .into_iter()
            .zip(characteristic)
            .map(|(m, k)| SutabelPoint {
                stress: m.stress,
                mean: m.strength,
                characteristic: k.strength,
                constant_cov: m.characteristic,
            })
            .collect();

        Ok(SutabelReport {
            analysis,
            steyx,
            coefficient_of_variation: self.coefficient_of_variation,
            strength_table,
        })
    }
}
