//! analysis::stress_ratio — Coulomb friction angle from τ/σ' ratios.
//!
//! Estimates tan φ without a cohesion intercept: the per-sample ratios
//! r = τ/σ' are averaged in the log domain, bounded with the one-sided 5% /
//! n − 1 convention, and the mean and lower ratios are used as the slopes of
//! lines through the origin. The usual Coulomb transform then maps the ratio
//! onto tan φ (triaxial: r/sqrt(1 − r²), direct simple shear: r). Cohesion
//! is zero and is not reported.

use crate::{
    analysis::{
        overrides::{ManualOverride, Resolved},
        pipeline::tier_lines,
        result::EngineeringResult,
        settings::Settings,
    },
    estimation::{
        envelope::MeanBounds,
        errors::{EstimationError, EstimationResult},
    },
    parameters::{
        coulomb,
        variant::{Line, Variant},
    },
    samples::{schema::TestType, selection::Dataset},
};

/// Log-domain bounds of τ/σ' over a Coulomb-layout dataset (x = σ', y = τ).
///
/// Errors
/// ------
/// - `InvalidPhysicalValue` for a non-positive ratio.
/// - `InsufficientData` for fewer than 2 observations.
pub fn stress_ratio_bounds(
    dataset: &Dataset, settings: &Settings,
) -> EstimationResult<MeanBounds> {
    coulomb::stress_ratio_bounds(dataset.x(), dataset.y(), settings.alpha())
}

/// Engineering result of the stress-ratio method.
///
/// The mean ratio exp(mean) and the characteristic ratio exp(lower) become
/// the slopes of the mean and characteristic lines. A manual characteristic
/// slope replaces the characteristic ratio.
///
/// Errors
/// ------
/// - `ConfigurationError` when a manual intercept (mean or characteristic)
///   is set; these lines pass through the origin.
/// - Errors of the Coulomb transform, design value and dispersion solve.
pub fn stress_ratio_result(
    test_type: TestType, bounds: &MeanBounds, settings: &Settings, overrides: &ManualOverride,
) -> EstimationResult<EngineeringResult> {
    let manual_intercept = [
        ("manual mean intercept", overrides.mean_intercept()),
        ("manual characteristic intercept", overrides.characteristic_intercept()),
    ]
    .into_iter()
    .find_map(|(parameter, value)| value.map(|v| (parameter, v)));
    if let Some((parameter, value)) = manual_intercept {
        return Err(EstimationError::ConfigurationError {
            parameter,
            value,
            reason: "The stress-ratio method has no intercept.",
        });
    }

    let (mean_ratio, lower_ratio, _) = bounds.exp();
    let characteristic_slope = Resolved::resolve(lower_ratio, overrides.characteristic_slope());
    let mean_line = Line::new(mean_ratio, 0.0);
    let characteristic_line = Line::new(characteristic_slope.value(), 0.0);

    let variant = Variant::CoulombStressRatio;
    let mut warnings = Vec::new();
    let (primary, secondary) =
        tier_lines(variant, test_type, mean_line, characteristic_line, settings, &mut warnings)?;

    Ok(EngineeringResult {
        variant,
        test_type,
        mean_intercept: Resolved::Computed(0.0),
        characteristic_slope,
        characteristic_intercept: Resolved::Computed(0.0),
        mean_line,
        characteristic_line,
        primary,
        secondary,
        warnings,
    })
}
