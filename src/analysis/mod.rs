//! analysis — end-to-end characteristic-value analyses.
//!
//! Purpose
//! -------
//! Tie sample selection, regression, envelopes, characteristic refits and
//! the parameter transforms into the operations callers actually run:
//! `select → fit → confidence_curve → characteristic_fit →
//! engineering_result`, either step by step or through [`Analysis::run`].
//!
//! Key behaviors
//! -------------
//! - [`pipeline`]: the staged operations and the [`Analysis`] driver.
//! - [`stress_ratio`]: Coulomb friction from τ/σ' ratios without cohesion.
//! - [`shansep`]: combined linear / log-log report with POP, field POP and
//!   the normally consolidated strength ratio.
//! - [`sutabel`]: log-log power-law report with strength tables.
//! - [`settings`] / [`overrides`]: user configuration and manual line
//!   coefficients.
//! - [`result`]: three-tier values and caller-visible warnings.
//!
//! Invariants & assumptions
//! ------------------------
//! - Each run is a pure function of the sample table, the query, the
//!   settings and the overrides; nothing is cached between runs.
//! - Every `warn!` emitted while building a result is mirrored by a
//!   [`ResultWarning`] on that result.
//!
//! Downstream usage
//! ----------------
//! - Import [`prelude`] for the common driver types.

pub mod overrides;
pub mod pipeline;
pub mod result;
pub mod settings;
pub mod shansep;
pub mod stress_ratio;
pub mod sutabel;

// ---- Re-exports ----
pub use self::overrides::{ManualOverride, Resolved};
pub use self::pipeline::{
    Analysis, AnalysisReport, RegressionStages, Stages, analyse, characteristic_fit,
    confidence_curve, engineering_result, fit, select,
};
pub use self::result::{EngineeringResult, QuantityResult, ResultWarning, TierValues};
pub use self::settings::{DEFAULT_ALPHA, Locality, Settings};
pub use self::shansep::{
    NormalRatio, PopEstimate, ShansepAnalysis, ShansepPoint, ShansepReport,
};
pub use self::stress_ratio::{stress_ratio_bounds, stress_ratio_result};
pub use self::sutabel::{SutabelAnalysis, SutabelPoint, SutabelReport};

pub mod prelude {
    pub use super::{
        Analysis, AnalysisReport, EngineeringResult, Locality, ManualOverride, ResultWarning,
        Settings, ShansepAnalysis, SutabelAnalysis,
    };
}
