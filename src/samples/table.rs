//! samples::table — in-memory sample table handed over by import collaborators.
//!
//! Purpose
//! -------
//! Hold one row per laboratory sample with its identifying attributes
//! (sample id, group, test type, consolidation state) and a sparse set of
//! typed numeric values.
//!
//! Key behaviors
//! -------------
//! - Builder-style [`SampleRecord::with_value`] for assembling rows.
//! - [`SampleRecord::value`] treats NaN as missing, matching how blank
//!   spreadsheet cells arrive from import code.
//!
//! Conventions
//! -----------
//! - The table performs no range or completeness checks; data quality is
//!   owned by the import collaborator.

use std::collections::HashMap;

use crate::samples::schema::{Column, Consolidation, TestType};

/// One laboratory sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub sample_id: String,
    pub group: String,
    pub test_type: TestType,
    pub consolidation: Option<Consolidation>,
    values: HashMap<Column, f64>,
}

impl SampleRecord {
    pub fn new(sample_id: impl Into<String>, group: impl Into<String>, test_type: TestType) -> Self {
        SampleRecord {
            sample_id: sample_id.into(),
            group: group.into(),
            test_type,
            consolidation: None,
            values: HashMap::new(),
        }
    }

    pub fn with_consolidation(mut self, consolidation: Consolidation) -> Self {
        self.consolidation = Some(consolidation);
        self
    }

    pub fn with_value(mut self, column: Column, value: f64) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: Column, value: f64) {
        self.values.insert(column, value);
    }

    /// Value stored for `column`, with NaN reported as missing.
    pub fn value(&self, column: Column) -> Option<f64> {
        self.values.get(&column).copied().filter(|v| !v.is_nan())
    }
}

/// Ordered collection of [`SampleRecord`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleTable {
    records: Vec<SampleRecord>,
}

impl SampleTable {
    pub fn new(records: Vec<SampleRecord>) -> Self {
        SampleTable { records }
    }

    pub fn push(&mut self, record: SampleRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<SampleRecord> for SampleTable {
    fn from_iter<I: IntoIterator<Item = SampleRecord>>(iter: I) -> Self {
        SampleTable { records: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::schema::StressCriterion;

    #[test]
    // Purpose
    // -------
    // NaN cells must read as missing values.
    //
    // Given
    // -----
    // - A record with unit weight NaN and moisture content 35.
    //
    // Expect
    // ------
    // - `value` returns None for the NaN cell and Some(35) for the other.
    fn record_value_reports_nan_as_missing() {
        // Arrange
        let record = SampleRecord::new("B2", "peat", TestType::Triaxial)
            .with_value(Column::UnitWeight, f64::NAN)
            .with_value(Column::MoistureContent, 35.0);

        // Act / Assert
        assert_eq!(record.value(Column::UnitWeight), None);
        assert_eq!(record.value(Column::MoistureContent), Some(35.0));
        assert_eq!(record.value(Column::ShearStress(StressCriterion::Peak)), None);
    }

    #[test]
    // Purpose
    // -------
    // Tables collect from iterators and preserve row order.
    //
    // Given
    // -----
    // - Three records with ids "1", "2", "3".
    //
    // Expect
    // ------
    // - `records()` yields them in the same order.
    fn table_from_iterator_preserves_order() {
        // Arrange / Act
        let table: SampleTable = ["1", "2", "3"]
            .into_iter()
            .map(|id| SampleRecord::new(id, "clay", TestType::DirectSimpleShear))
            .collect();

        // Assert
        let ids: Vec<&str> = table.records().iter().map(|r| r.sample_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(table.len(), 3);
    }
}
