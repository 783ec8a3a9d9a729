//! samples — typed sample tables and the DataSelector.
//!
//! Purpose
//! -------
//! Describe laboratory sample rows with typed columns and reduce them to the
//! canonical (x, y) [`Dataset`] one analysis works on.
//!
//! Key behaviors
//! -------------
//! - [`schema`]: test types, stress criteria, columns and per-variant field
//!   maps.
//! - [`table`]: [`SampleRecord`] / [`SampleTable`] as delivered by import code.
//! - [`selection`]: [`select`] and the immutable [`Dataset`].
//! - [`stats`]: descriptive statistics of auxiliary index properties.
//!
//! Conventions
//! -----------
//! - Data-quality checks (ranges, completeness) belong to the import
//!   collaborator; this module only skips rows that cannot be evaluated.

pub mod schema;
pub mod selection;
pub mod stats;
pub mod table;

// ---- Re-exports ----
pub use self::schema::{Column, Consolidation, Derived, FieldMap, StressCriterion, TestType};
pub use self::selection::{Dataset, Observation, SampleQuery, select};
pub use self::stats::{AuxiliaryStats, Descriptive};
pub use self::table::{SampleRecord, SampleTable};

pub mod prelude {
    pub use super::{
        Column, Consolidation, Dataset, SampleQuery, SampleRecord, SampleTable, StressCriterion,
        TestType,
    };
}
