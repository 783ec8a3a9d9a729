//! Integration tests for the strength-ratio models (power law, log-log,
//! SHANSEP and SUTABEL).
//!
//! Purpose
//! -------
//! - Validate that one undrained direct-shear table feeds every ratio model
//!   through the public API with consistent selections and transforms.
//!
//! Coverage
//! --------
//! - `analysis::pipeline::Analysis` with the linear power law, the log-log
//!   power law and the log-log ratio model.
//! - `analysis::shansep::ShansepAnalysis`: POP, field POP, NC ratio and the
//!   strength table in one report.
//! - `analysis::sutabel::SutabelAnalysis`: S, m and the constant-CoV curve.
//!
//! Exclusions
//! ----------
//! - Hand-evaluated reference numbers for POP and the NC ratio; these are
//!   pinned by the unit tests of `analysis::shansep`.
//! - Python bindings.
use approx::assert_relative_eq;
use soil_strength::{
    analysis::{
        pipeline::Analysis, settings::Settings, shansep::ShansepAnalysis,
        sutabel::SutabelAnalysis,
    },
    parameters::{
        design::MaterialFactors,
        variant::{PowerLawForm, Quantity, Variant},
    },
    samples::{
        schema::{Column, Consolidation, StressCriterion, TestType},
        selection::SampleQuery,
        table::{SampleRecord, SampleTable},
    },
};

const PEAK: StressCriterion = StressCriterion::Peak;

/// Purpose
/// -------
/// Five overconsolidated and four normally consolidated DSS clay samples.
///
/// Returns
/// -------
/// - OC rows (σ'v,c, Su, OCR, σ'v,0) and NC rows (σ'v,c, Su) with OCR 1.
fn clay_table() -> SampleTable {
    let oc = [
        (40.0, 26.4, 2.7, 20.0),
        (60.0, 34.6, 2.2, 25.0),
        (80.0, 44.3, 2.2, 40.0),
        (30.0, 21.2, 2.9, 12.0),
        (100.0, 53.2, 2.0, 45.0),
    ];
    let nc = [(50.0, 15.3), (100.0, 29.4), (150.0, 45.6), (200.0, 59.1)];
    let row = |id: String, consolidation: Consolidation, svc: f64, su: f64, ocr: f64| {
        SampleRecord::new(id, "clay", TestType::DirectSimpleShear)
            .with_consolidation(consolidation)
            .with_value(Column::ConsolidationStress, svc)
            .with_value(Column::UndrainedStrength(PEAK), su)
            .with_value(Column::OverconsolidationRatio, ocr)
    };
    let mut table: SampleTable = oc
        .iter()
        .enumerate()
        .map(|(i, &(svc, su, ocr, in_situ))| {
            row(format!("OC{i}"), Consolidation::Over, svc, su, ocr)
                .with_value(Column::InSituStress, in_situ)
        })
        .collect();
    for (i, &(svc, su)) in nc.iter().enumerate() {
        table.push(row(format!("NC{i}"), Consolidation::Normal, svc, su, 1.0));
    }
    table
}

fn query() -> SampleQuery {
    SampleQuery::new(TestType::DirectSimpleShear, ["clay"], PEAK)
}

fn local() -> Settings {
    Settings::new(1.0, MaterialFactors::default()).unwrap()
}

#[test]
// Purpose
// -------
// Each ratio variant selects its own rows and maps its line onto the
// documented physical quantities.
//
// Given
// -----
// - `clay_table()` under the linear power law, log-log power law and
//   log-log ratio model.
//
// Expect
// ------
// - Power laws use the five OC rows, the log-log ratio model all nine.
// - Linear: S = slope, intercept = a.
// - Log-log power law: S = exp(a), m = 1 − b.
// - Log-log ratio: S = exp(a), m = b.
fn ratio_variants_transform_their_lines() {
    // Arrange
    let run = |variant| {
        Analysis::new(variant, query()).unwrap().with_settings(local()).run(&clay_table()).unwrap()
    };

    // Act
    let linear = run(Variant::PowerLaw(PowerLawForm::Linear));
    let power = run(Variant::PowerLaw(PowerLawForm::LogLog));
    let ratio = run(Variant::LogLog);

    // Assert
    assert_eq!(linear.dataset.len(), 5);
    assert_eq!(power.dataset.len(), 5);
    assert_eq!(ratio.dataset.len(), 9);

    let line = linear.result.mean_line;
    let s = linear.result.quantity(Quantity::StrengthRatio).unwrap();
    let a = linear.result.quantity(Quantity::StrengthIntercept).unwrap();
    assert_relative_eq!(s.values.mean, line.slope, max_relative = 1e-12);
    assert_relative_eq!(a.values.mean, line.intercept, max_relative = 1e-12);

    let line = power.result.mean_line;
    let s = power.result.quantity(Quantity::StrengthRatio).unwrap();
    let m = power.result.quantity(Quantity::Exponent).unwrap();
    assert_relative_eq!(s.values.mean, line.intercept.exp(), max_relative = 1e-12);
    assert_relative_eq!(m.values.mean, 1.0 - line.slope, max_relative = 1e-12);

    let line = ratio.result.mean_line;
    let s = ratio.result.quantity(Quantity::StrengthRatio).unwrap();
    let m = ratio.result.quantity(Quantity::Exponent).unwrap();
    assert_relative_eq!(s.values.mean, line.intercept.exp(), max_relative = 1e-12);
    assert_relative_eq!(m.values.mean, line.slope, max_relative = 1e-12);
}

#[test]
// Purpose
// -------
// A SHANSEP run over the full table fills every part of the report.
//
// Given
// -----
// - `clay_table()` with in-situ stresses on the OC rows, alpha = 1.
//
// Expect
// ------
// - Positive mean POP, field POP over five samples, NC ratio over four.
// - A positive strength table ending at the largest OC σ'v,c (100 kPa).
// - No report-level warnings.
fn shansep_report_is_complete_on_full_table() {
    // Arrange
    let shansep = ShansepAnalysis::new(query(), local()).unwrap();

    // Act
    let report = shansep.run(&clay_table()).unwrap();

    // Assert
    assert!(report.pop.mean > 0.0);
    assert_eq!(report.field_pop.unwrap().n, 5);
    assert_eq!(report.normal_ratio.unwrap().n, 4);
    let table = report.strength_table.unwrap();
    assert_relative_eq!(table.last().unwrap().stress, 100.0, max_relative = 1e-12);
    assert!(table.iter().all(|p| p.mean > 0.0 && p.characteristic > 0.0));
    assert!(report.warnings.is_empty());
}

#[test]
// Purpose
// -------
// SUTABEL agrees with a plain log-log power-law analysis of the same rows
// and adds the constant-CoV curve.
//
// Given
// -----
// - `clay_table()`, vc = 0.2.
//
// Expect
// ------
// - Identical mean line to `Analysis` with the log-log power law.
// - Mean strength at 10 kPa = S·10^(1 − m).
// - Constant-CoV strength below the mean on every row.
fn sutabel_matches_power_law_analysis() {
    // Arrange
    let mut sutabel = SutabelAnalysis::new(query(), local()).unwrap();
    sutabel.set_coefficient_of_variation(Some(0.2)).unwrap();
    let plain = Analysis::new(Variant::PowerLaw(PowerLawForm::LogLog), query())
        .unwrap()
        .with_settings(local());

    // Act
    let report = sutabel.run(&clay_table()).unwrap();
    let reference = plain.run(&clay_table()).unwrap();

    // Assert
    assert_eq!(report.analysis.result.mean_line, reference.result.mean_line);
    let s = reference.result.mean_line.intercept.exp();
    let m = 1.0 - reference.result.mean_line.slope;
    let row = report.strength_table.iter().find(|p| p.stress == 10.0).unwrap();
    assert_relative_eq!(row.mean, s * 10.0_f64.powf(1.0 - m), max_relative = 1e-12);
    assert!(report.strength_table.iter().all(|p| p.constant_cov.unwrap() < p.mean));
}
