//! samples::selection — DataSelector: table rows → canonical (x, y) dataset.
//!
//! Purpose
//! -------
//! Filter a [`SampleTable`] down to the rows of one test type and a set of
//! sample groups, evaluate the variant's [`FieldMap`] for each row, and
//! collect the surviving pairs into an immutable [`Dataset`].
//!
//! Key behaviors
//! -------------
//! - Rows are kept when their test type matches, their group is listed in the
//!   query and their consolidation state matches the field map (if any).
//! - Rows whose x or y expression evaluates to `None` are skipped.
//! - An empty selection is an error, never an empty dataset.
//! - Auxiliary statistics (unit weight, moisture content) are computed over
//!   the rows that produced an observation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every selected x and y is finite; infinities are rejected with
//!   `EstimationError::NonFiniteData`.
//! - A `Dataset` is never empty. Regression stages apply their own minimum
//!   counts on top.
//!
//! Downstream usage
//! ----------------
//! - `analysis::select` wraps [`select`] with the field map of the active
//!   variant; tests and bindings may build datasets directly with
//!   [`Dataset::from_pairs`].

use ndarray::{Array1, ArrayView1};
use tracing::debug;

use crate::{
    estimation::{
        errors::{EstimationError, EstimationResult},
        validation::validate_pairs,
    },
    samples::{
        schema::{FieldMap, StressCriterion, TestType},
        stats::AuxiliaryStats,
        table::{SampleRecord, SampleTable},
    },
};

/// Which rows and stress level an analysis works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleQuery {
    pub test_type: TestType,
    pub groups: Vec<String>,
    pub criterion: StressCriterion,
}

impl SampleQuery {
    pub fn new<I, S>(test_type: TestType, groups: I, criterion: StressCriterion) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SampleQuery { test_type, groups: groups.into_iter().map(Into::into).collect(), criterion }
    }

    fn matches(&self, record: &SampleRecord, field_map: &FieldMap) -> bool {
        record.test_type == self.test_type
            && self.groups.iter().any(|g| *g == record.group)
            && field_map.consolidation.is_none_or(|c| record.consolidation == Some(c))
    }
}

/// One selected sample in canonical regression coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub sample_id: String,
    pub x: f64,
    pub y: f64,
}

/// Dataset — ordered, non-empty set of observations.
///
/// Fields
/// ------
/// - `observations`: sample ids with their (x, y) pair, in table order.
/// - `x`, `y`: the same values as contiguous arrays for the numeric stages.
/// - `auxiliary`: descriptive statistics of index properties.
/// - `query`: the selection that produced the dataset, `None` for datasets
///   built directly from pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
    x: Array1<f64>,
    y: Array1<f64>,
    auxiliary: AuxiliaryStats,
    query: Option<SampleQuery>,
}

impl Dataset {
    /// Build a dataset from paired values with generated sample ids "1".."n".
    ///
    /// Errors
    /// ------
    /// - `LengthMismatch`, `NonFiniteData`, or `InsufficientData` for an
    ///   empty input.
    pub fn from_pairs(x: &[f64], y: &[f64]) -> EstimationResult<Self> {
        if x.len() != y.len() {
            return Err(EstimationError::LengthMismatch { x_len: x.len(), y_len: y.len() });
        }
        let observations = x
            .iter()
            .zip(y)
            .enumerate()
            .map(|(i, (&x, &y))| Observation { sample_id: (i + 1).to_string(), x, y })
            .collect();
        Dataset::from_observations(observations, AuxiliaryStats::default(), None)
    }

    fn from_observations(
        observations: Vec<Observation>, auxiliary: AuxiliaryStats, query: Option<SampleQuery>,
    ) -> EstimationResult<Self> {
        let x: Array1<f64> = observations.iter().map(|o| o.x).collect();
        let y: Array1<f64> = observations.iter().map(|o| o.y).collect();
        validate_pairs(x.view(), y.view(), 1, "sample selection")?;
        Ok(Dataset { observations, x, y, auxiliary, query })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// (min x, max x) of the observations.
    pub fn x_range(&self) -> (f64, f64) {
        self.x.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
    }

    pub fn auxiliary(&self) -> &AuxiliaryStats {
        &self.auxiliary
    }

    pub fn query(&self) -> Option<&SampleQuery> {
        self.query.as_ref()
    }
}

/// Select the observations of `query` from `table` using `field_map`.
///
/// Parameters
/// ----------
/// - `table`: [`SampleTable`]
///   Full sample table from the import collaborator.
/// - `query`: [`SampleQuery`]
///   Test type, accepted groups and stress criterion.
/// - `field_map`: [`FieldMap`]
///   Expressions for (x, y) and the consolidation filter.
///
/// Returns
/// -------
/// `EstimationResult<Dataset>`
///   Non-empty dataset in table order.
///
/// Errors
/// ------
/// - `EstimationError::InsufficientData`
///   No row survives the filters.
/// - `EstimationError::NonFiniteData`
///   A selected value is ±∞.
pub fn select(
    table: &SampleTable, query: &SampleQuery, field_map: &FieldMap,
) -> EstimationResult<Dataset> {
    let mut rows: Vec<&SampleRecord> = Vec::new();
    let mut observations = Vec::new();
    for record in table.records().iter().filter(|r| query.matches(r, field_map)) {
        let (Some(x), Some(y)) = (field_map.x.evaluate(record), field_map.y.evaluate(record))
        else {
            continue;
        };
        rows.push(record);
        observations.push(Observation { sample_id: record.sample_id.clone(), x, y });
    }

    debug!(
        test_type = %query.test_type,
        criterion = %query.criterion,
        groups = ?query.groups,
        selected = observations.len(),
        table_rows = table.len(),
        "selected observations"
    );

    if observations.is_empty() {
        return Err(EstimationError::InsufficientData {
            required: 1,
            actual: 0,
            context: "sample selection",
        });
    }

    let auxiliary = AuxiliaryStats::from_records(rows.iter().copied());
    Dataset::from_observations(observations, auxiliary, Some(query.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        estimation::errors::ErrorKind,
        parameters::variant::{PowerLawForm, Variant},
        samples::schema::{Column, Consolidation},
    };

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Filtering by test type, group and consolidation state.
    // - Skipping rows with missing values.
    // - The empty-selection error.
    // - Rejection of infinite values.
    // -------------------------------------------------------------------------

    fn shear_row(id: &str, group: &str, test_type: TestType, s: f64, t: f64) -> SampleRecord {
        SampleRecord::new(id, group, test_type)
            .with_value(Column::EffectiveStress(StressCriterion::Peak), s)
            .with_value(Column::ShearStress(StressCriterion::Peak), t)
            .with_value(Column::UnitWeight, 17.0)
    }

    fn coulomb_map() -> FieldMap {
        FieldMap::for_variant(Variant::Coulomb, TestType::DirectSimpleShear, StressCriterion::Peak)
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Only rows of the requested test type and groups are selected, in
    // table order, and rows with a missing y are skipped.
    //
    // Given
    // -----
    // - Rows in groups "clay"/"sand", mixed test types, one with no shear.
    //
    // Expect
    // ------
    // - Two observations: ids "1" and "4".
    fn select_filters_by_test_type_group_and_missing_values() {
        // Arrange
        let table = SampleTable::new(vec![
            shear_row("1", "clay", TestType::DirectSimpleShear, 10.0, 5.0),
            shear_row("2", "sand", TestType::DirectSimpleShear, 20.0, 9.0),
            shear_row("3", "clay", TestType::Triaxial, 30.0, 14.0),
            shear_row("4", "clay", TestType::DirectSimpleShear, 40.0, 18.0),
            SampleRecord::new("5", "clay", TestType::DirectSimpleShear)
                .with_value(Column::EffectiveStress(StressCriterion::Peak), 50.0),
        ]);
        let query = SampleQuery::new(TestType::DirectSimpleShear, ["clay"], StressCriterion::Peak);

        // Act
        let dataset = select(&table, &query, &coulomb_map()).unwrap();

        // Assert
        let ids: Vec<&str> =
            dataset.observations().iter().map(|o| o.sample_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(dataset.x().to_vec(), vec![10.0, 40.0]);
        assert_eq!(dataset.auxiliary().unit_weight.unwrap().count, 2);
        assert_eq!(dataset.query(), Some(&query));
    }

    #[test]
    // Purpose
    // -------
    // An empty filtered result raises `InsufficientData`.
    //
    // Given
    // -----
    // - A table with only "sand" rows and a query for "clay".
    //
    // Expect
    // ------
    // - `Err` of kind `InsufficientData`.
    fn select_empty_result_is_insufficient_data() {
        // Arrange
        let table =
            SampleTable::new(vec![shear_row("1", "sand", TestType::DirectSimpleShear, 1.0, 1.0)]);
        let query = SampleQuery::new(TestType::DirectSimpleShear, ["clay"], StressCriterion::Peak);

        // Act
        let err = select(&table, &query, &coulomb_map()).unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
    }

    #[test]
    // Purpose
    // -------
    // Consolidation filters of the power-law map drop normally
    // consolidated rows.
    //
    // Given
    // -----
    // - One NC and one OC row with σ'v,c and Su(peak).
    //
    // Expect
    // ------
    // - Only the OC row is selected.
    fn select_applies_consolidation_filter() {
        // Arrange
        let row = |id: &str, state: Consolidation| {
            SampleRecord::new(id, "clay", TestType::DirectSimpleShear)
                .with_consolidation(state)
                .with_value(Column::ConsolidationStress, 50.0)
                .with_value(Column::UndrainedStrength(StressCriterion::Peak), 20.0)
        };
        let table =
            SampleTable::new(vec![row("nc", Consolidation::Normal), row("oc", Consolidation::Over)]);
        let query = SampleQuery::new(TestType::DirectSimpleShear, ["clay"], StressCriterion::Peak);
        let map = FieldMap::for_variant(
            Variant::PowerLaw(PowerLawForm::Linear),
            TestType::DirectSimpleShear,
            StressCriterion::Peak,
        )
        .unwrap();

        // Act
        let dataset = select(&table, &query, &map).unwrap();

        // Assert
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.observations()[0].sample_id, "oc");
    }

    #[test]
    // Purpose
    // -------
    // Infinite values are rejected rather than passed downstream.
    //
    // Given
    // -----
    // - A row with shear stress +∞.
    //
    // Expect
    // ------
    // - `NonFiniteData` error.
    fn select_rejects_infinite_values() {
        // Arrange
        let table = SampleTable::new(vec![shear_row(
            "1",
            "clay",
            TestType::DirectSimpleShear,
            10.0,
            f64::INFINITY,
        )]);
        let query = SampleQuery::new(TestType::DirectSimpleShear, ["clay"], StressCriterion::Peak);

        // Act
        let err = select(&table, &query, &coulomb_map()).unwrap_err();

        // Assert
        assert!(matches!(err, EstimationError::NonFiniteData { index: 0, .. }), "Got {err:?}");
    }

    #[test]
    // Purpose
    // -------
    // `x_range` reports the extreme x values regardless of order.
    //
    // Given
    // -----
    // - x = [30, 10, 50].
    //
    // Expect
    // ------
    // - (10, 50).
    fn dataset_x_range_reports_extremes() {
        let dataset = Dataset::from_pairs(&[30.0, 10.0, 50.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(dataset.x_range(), (10.0, 50.0));
    }
}
