//! parameters — from regression lines to engineering quantities.
//!
//! Purpose
//! -------
//! Hold the per-variant formula table ([`variant`]), the domain formulas of
//! each strength model ([`coulomb`], [`power_law`], [`log_log`]), material
//! factors ([`design`]) and the log-normal dispersion back-solve
//! ([`dispersion`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - All functions are pure; warnings are both logged through `tracing` and
//!   returned to the caller as values.
//!
//! Downstream usage
//! ----------------
//! - `analysis::engineering_result` applies [`Variant::transform`] to the
//!   mean, characteristic and design lines and asks [`dispersion::estimate`]
//!   for the implied standard deviations.

pub mod coulomb;
pub mod design;
pub mod dispersion;
pub mod log_log;
pub mod power_law;
pub mod variant;

// ---- Re-exports ----
pub use self::design::{MaterialFactors, design_value};
pub use self::dispersion::{
    DispersionNote, DispersionOutcome, NonPositivePolicy, estimate, implied_std_dev,
};
pub use self::power_law::StrengthPoint;
pub use self::variant::{Line, PhysicalPair, PowerLawForm, Quantity, Variant};

pub mod prelude {
    pub use super::{Line, MaterialFactors, PowerLawForm, Quantity, Variant};
}
