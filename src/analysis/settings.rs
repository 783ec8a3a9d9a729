//! analysis::settings — per-analysis configuration.
//!
//! Purpose
//! -------
//! Hold the two caller-controlled knobs that every downstream stage reads:
//! the locality weight α used by the confidence envelope and the partial
//! material factors used by the design values.
//!
//! Key behaviors
//! -------------
//! - [`Settings::new`] validates α ∈ (0, 1]; [`MaterialFactors`] validate
//!   themselves on construction.
//! - Setters validate before mutating; a rejected value leaves the settings
//!   unchanged.
//! - [`Settings::from_toml_str`] reads the same fields from a TOML document.
//!   A document may name the weight directly (`alpha = 0.9`) or through a
//!   [`Locality`] (`locality = "local"`), not both.
//!
//! Invariants & assumptions
//! ------------------------
//! - A `Settings` value is always valid; there is no unchecked constructor.
//! - Defaults are α = 0.75 (regional) and unit material factors.
//!
//! Testing notes
//! -------------
//! - Unit tests cover defaults, setter rollback on invalid input and the TOML
//!   loader including its failure modes.

use serde::{Deserialize, Serialize};

use crate::{
    estimation::{
        errors::{EstimationError, EstimationResult},
        validation::validate_alpha,
    },
    parameters::design::MaterialFactors,
};

/// Locality weight used when none is configured.
pub const DEFAULT_ALPHA: f64 = 0.75;

/// Spatial extent of the sample collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locality {
    /// Samples from one site; α = 1.0.
    Local,
    /// Samples pooled over a region; α = 0.75.
    Regional,
}

impl Locality {
    pub fn alpha(self) -> f64 {
        match self {
            Locality::Local => 1.0,
            Locality::Regional => DEFAULT_ALPHA,
        }
    }
}

/// Settings — locality weight and material factors of one analysis.
///
/// Fields
/// ------
/// - `alpha`: `f64`
///   Locality weight in (0, 1]; scales the residual variance pooled into
///   the envelope by (1 − α).
/// - `material_factors`: [`MaterialFactors`]
///   Partial factors for the primary and secondary quantity.
///
/// Examples
/// --------
/// ```rust
/// # use soil_strength::analysis::settings::{Locality, Settings};
/// let mut settings = Settings::default();
/// assert_eq!(settings.alpha(), 0.75);
/// settings.set_locality(Locality::Local);
/// assert_eq!(settings.alpha(), 1.0);
/// assert!(settings.set_alpha(0.0).is_err());
/// assert_eq!(settings.alpha(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Settings {
    alpha: f64,
    material_factors: MaterialFactors,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    alpha: Option<f64>,
    locality: Option<Locality>,
    material_factors: Option<MaterialFactors>,
}

impl Settings {
    /// Errors
    /// ------
    /// - `ConfigurationError` for α outside (0, 1].
    pub fn new(alpha: f64, material_factors: MaterialFactors) -> EstimationResult<Self> {
        Ok(Settings { alpha: validate_alpha(alpha)?, material_factors })
    }

    pub fn for_locality(locality: Locality, material_factors: MaterialFactors) -> Self {
        Settings { alpha: locality.alpha(), material_factors }
    }

    /// Parse settings from a TOML document.
    ///
    /// Missing fields take their defaults.
    ///
    /// ```toml
    /// locality = "local"
    ///
    /// [material_factors]
    /// primary = 1.2
    /// secondary = 1.25
    /// ```
    ///
    /// Errors
    /// ------
    /// - `InvalidSettingsFile` for malformed TOML, unknown keys, invalid
    ///   material factors, or both `alpha` and `locality` present.
    /// - `ConfigurationError` for α outside (0, 1].
    pub fn from_toml_str(text: &str) -> EstimationResult<Self> {
        let file: SettingsFile = toml::from_str(text)
            .map_err(|e| EstimationError::InvalidSettingsFile { reason: e.to_string() })?;
        let alpha = match (file.alpha, file.locality) {
            (Some(_), Some(_)) => {
                return Err(EstimationError::InvalidSettingsFile {
                    reason: "set either `alpha` or `locality`, not both".to_string(),
                });
            }
            (Some(alpha), None) => alpha,
            (None, Some(locality)) => locality.alpha(),
            (None, None) => DEFAULT_ALPHA,
        };
        Settings::new(alpha, file.material_factors.unwrap_or_default())
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn material_factors(&self) -> MaterialFactors {
        self.material_factors
    }

    /// Errors
    /// ------
    /// - `ConfigurationError` for α outside (0, 1]; `self` is unchanged.
    pub fn set_alpha(&mut self, alpha: f64) -> EstimationResult<()> {
        self.alpha = validate_alpha(alpha)?;
        Ok(())
    }

    pub fn set_locality(&mut self, locality: Locality) {
        self.alpha = locality.alpha();
    }

    pub fn set_material_factors(&mut self, material_factors: MaterialFactors) {
        self.material_factors = material_factors;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings { alpha: DEFAULT_ALPHA, material_factors: MaterialFactors::default() }
    }
}
