//! samples::schema — typed field layout of laboratory sample tables.
//!
//! Purpose
//! -------
//! Replace name-based column lookups with a closed set of typed columns and a
//! per-variant [`FieldMap`] that says which (derived) columns populate the
//! canonical regression pair (x, y).
//!
//! Key behaviors
//! -------------
//! - [`TestType`] and [`StressCriterion`] identify the test family and the
//!   strain level at which stresses were read.
//! - [`Column`] names every numeric field a sample row can carry.
//! - [`Derived`] evaluates raw values, natural logarithms or log-ratios of
//!   columns for a single row.
//! - [`FieldMap::for_variant`] checks the criterion against the test type
//!   when the map is built, so unsupported combinations fail before any data
//!   is touched.
//!
//! Invariants & assumptions
//! ------------------------
//! - Triaxial tests record no stresses at 10% or 20% strain.
//! - Logarithms of non-positive values evaluate to `None` (the row is
//!   skipped), never to NaN.
//!
//! Conventions
//! -----------
//! - Stresses are in kPa. Moisture content in %, unit weight in kN/m³.
//! - For triaxial tests the effective stress column holds the mean
//!   effective stress s' and the shear column holds t; for direct simple
//!   shear they hold σ'n and τ.

use serde::Serialize;

use crate::{
    estimation::errors::{EstimationError, EstimationResult},
    parameters::variant::{PowerLawForm, Variant},
    samples::table::SampleRecord,
};

/// Laboratory test family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestType {
    Triaxial,
    DirectSimpleShear,
}

impl TestType {
    /// Whether stresses are recorded at `criterion` for this test family.
    pub fn supports(self, criterion: StressCriterion) -> bool {
        match self {
            TestType::Triaxial => {
                !matches!(criterion, StressCriterion::Strain10 | StressCriterion::Strain20)
            }
            TestType::DirectSimpleShear => true,
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestType::Triaxial => write!(f, "triaxial"),
            TestType::DirectSimpleShear => write!(f, "direct simple shear"),
        }
    }
}

/// Strain level (or failure definition) at which stresses are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StressCriterion {
    Strain2,
    Strain5,
    Strain10,
    Strain15,
    Strain20,
    Peak,
    Ultimate,
}

impl StressCriterion {
    pub const ALL: [StressCriterion; 7] = [
        StressCriterion::Strain2,
        StressCriterion::Strain5,
        StressCriterion::Strain10,
        StressCriterion::Strain15,
        StressCriterion::Strain20,
        StressCriterion::Peak,
        StressCriterion::Ultimate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StressCriterion::Strain2 => "2% strain",
            StressCriterion::Strain5 => "5% strain",
            StressCriterion::Strain10 => "10% strain",
            StressCriterion::Strain15 => "15% strain",
            StressCriterion::Strain20 => "20% strain",
            StressCriterion::Peak => "peak",
            StressCriterion::Ultimate => "ultimate",
        }
    }
}

impl std::fmt::Display for StressCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Consolidation state of a sample before shearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Consolidation {
    Normal,
    Over,
}

/// Column — numeric fields a sample row may carry.
///
/// Variants
/// --------
/// - `EffectiveStress(c)` / `ShearStress(c)`
///   Stress pair read at criterion `c` (s'/t for triaxial, σ'n/τ for direct
///   simple shear).
/// - `UndrainedStrength(c)`
///   Undrained shear strength Su at criterion `c`.
/// - `ConsolidationStress`
///   Vertical effective consolidation stress σ'v,c of the test.
/// - `InSituStress`
///   Vertical effective in-situ stress σ'v,0 of the sampled layer.
/// - `OverconsolidationRatio`
///   OCR applied in the test.
/// - `UnitWeight`, `MoistureContent`
///   Index properties, reported only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    EffectiveStress(StressCriterion),
    ShearStress(StressCriterion),
    UndrainedStrength(StressCriterion),
    ConsolidationStress,
    InSituStress,
    OverconsolidationRatio,
    UnitWeight,
    MoistureContent,
}

/// Derived — a per-row expression over typed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derived {
    Raw(Column),
    Ln(Column),
    LnRatio { numerator: Column, denominator: Column },
}

impl Derived {
    /// Evaluate the expression for one row.
    ///
    /// Returns `None` when a column is missing or when a logarithm would be
    /// taken of a non-positive value.
    pub fn evaluate(&self, record: &SampleRecord) -> Option<f64> {
        match *self {
            Derived::Raw(column) => record.value(column),
            Derived::Ln(column) => positive_ln(record.value(column)?),
            Derived::LnRatio { numerator, denominator } => {
                let den = record.value(denominator)?;
                if den == 0.0 {
                    return None;
                }
                positive_ln(record.value(numerator)? / den)
            }
        }
    }
}

fn positive_ln(value: f64) -> Option<f64> {
    if value > 0.0 { Some(value.ln()) } else { None }
}

/// FieldMap — which expressions populate (x, y) for one analysis.
///
/// Fields
/// ------
/// - `x`, `y`: [`Derived`]
///   Expressions for the independent and dependent regression variable.
/// - `consolidation`: `Option<Consolidation>`
///   Restrict rows to one consolidation state; `None` keeps all rows.
///
/// Notes
/// -----
/// - Build maps through [`FieldMap::for_variant`] or
///   [`FieldMap::normal_strength_ratio`] so that the criterion is checked
///   against the test type up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub x: Derived,
    pub y: Derived,
    pub consolidation: Option<Consolidation>,
}

impl FieldMap {
    /// Field layout of `variant` for `test_type` at `criterion`.
    ///
    /// | Variant | x | y | rows |
    /// |---|---|---|---|
    /// | Coulomb, stress ratio | effective stress | shear stress | all |
    /// | Power law (linear) | σ'v,c | Su | overconsolidated |
    /// | Power law (log-log) | ln σ'v,c | ln Su | overconsolidated |
    /// | Log-log ratio | ln OCR | ln(Su/σ'v,c) | all |
    ///
    /// Errors
    /// ------
    /// - `EstimationError::UnsupportedCriterion`
    ///   When `test_type` records no stresses at `criterion`.
    pub fn for_variant(
        variant: Variant, test_type: TestType, criterion: StressCriterion,
    ) -> EstimationResult<Self> {
        ensure_supported(test_type, criterion)?;
        let su = Column::UndrainedStrength(criterion);
        let map = match variant {
            Variant::Coulomb | Variant::CoulombStressRatio => FieldMap {
                x: Derived::Raw(Column::EffectiveStress(criterion)),
                y: Derived::Raw(Column::ShearStress(criterion)),
                consolidation: None,
            },
            Variant::PowerLaw(PowerLawForm::Linear) => FieldMap {
                x: Derived::Raw(Column::ConsolidationStress),
                y: Derived::Raw(su),
                consolidation: Some(Consolidation::Over),
            },
            Variant::PowerLaw(PowerLawForm::LogLog) => FieldMap {
                x: Derived::Ln(Column::ConsolidationStress),
                y: Derived::Ln(su),
                consolidation: Some(Consolidation::Over),
            },
            Variant::LogLog => FieldMap {
                x: Derived::Ln(Column::OverconsolidationRatio),
                y: Derived::LnRatio { numerator: su, denominator: Column::ConsolidationStress },
                consolidation: None,
            },
        };
        Ok(map)
    }

    /// Normally consolidated strength ratios ln(Su/σ'v,c), carried in `y`.
    pub fn normal_strength_ratio(
        test_type: TestType, criterion: StressCriterion,
    ) -> EstimationResult<Self> {
        ensure_supported(test_type, criterion)?;
        Ok(FieldMap {
            x: Derived::Raw(Column::ConsolidationStress),
            y: Derived::LnRatio {
                numerator: Column::UndrainedStrength(criterion),
                denominator: Column::ConsolidationStress,
            },
            consolidation: Some(Consolidation::Normal),
        })
    }

    /// In-situ vertical stress (x) and OCR (y) of overconsolidated rows, the
    /// inputs of the per-sample POP.
    pub fn in_situ_state() -> Self {
        FieldMap {
            x: Derived::Raw(Column::InSituStress),
            y: Derived::Raw(Column::OverconsolidationRatio),
            consolidation: Some(Consolidation::Over),
        }
    }
}

fn ensure_supported(test_type: TestType, criterion: StressCriterion) -> EstimationResult<()> {
    if test_type.supports(criterion) {
        Ok(())
    } else {
        Err(EstimationError::UnsupportedCriterion { test_type, criterion })
    }
}
