//! samples::stats — descriptive statistics of auxiliary index properties.
//!
//! Reporting only: nothing here feeds the regression pipeline.

use ndarray::Array1;

use crate::samples::{schema::Column, table::SampleRecord};

/// Count, mean and sample standard deviation (n − 1 denominator).
///
/// `std_dev` is `None` for a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptive {
    pub count: usize,
    pub mean: f64,
    pub std_dev: Option<f64>,
}

impl Descriptive {
    /// Summarize `values`; `None` when the iterator is empty.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let values: Array1<f64> = values.into_iter().collect();
        let count = values.len();
        let mean = values.mean()?;
        let std_dev = (count > 1).then(|| values.std(1.0));
        Some(Descriptive { count, mean, std_dev })
    }
}

/// Unit weight and moisture content of the rows behind a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AuxiliaryStats {
    pub unit_weight: Option<Descriptive>,
    pub moisture_content: Option<Descriptive>,
}

impl AuxiliaryStats {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SampleRecord> + Clone,
    {
        let column = |c: Column| {
            Descriptive::from_values(records.clone().into_iter().filter_map(|r| r.value(c)))
        };
        AuxiliaryStats {
            unit_weight: column(Column::UnitWeight),
            moisture_content: column(Column::MoistureContent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::schema::TestType;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Sample standard deviation uses the n − 1 denominator.
    //
    // Given
    // -----
    // - Values [2, 4, 4, 4, 5, 5, 7, 9] (population std 2).
    //
    // Expect
    // ------
    // - mean = 5, std = sqrt(32 / 7).
    fn descriptive_uses_sample_standard_deviation() {
        // Act
        let d = Descriptive::from_values([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();

        // Assert
        assert_eq!(d.count, 8);
        assert_relative_eq!(d.mean, 5.0);
        assert_relative_eq!(d.std_dev.unwrap(), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Missing cells are skipped and single values carry no spread.
    //
    // Given
    // -----
    // - Two records, only one with a unit weight, none with moisture content.
    //
    // Expect
    // ------
    // - unit weight: count 1, no std; moisture content: None.
    fn auxiliary_stats_skip_missing_cells() {
        // Arrange
        let records = vec![
            SampleRecord::new("1", "sand", TestType::Triaxial).with_value(Column::UnitWeight, 19.5),
            SampleRecord::new("2", "sand", TestType::Triaxial),
        ];

        // Act
        let stats = AuxiliaryStats::from_records(records.iter());

        // Assert
        let uw = stats.unit_weight.unwrap();
        assert_eq!(uw.count, 1);
        assert_eq!(uw.std_dev, None);
        assert!(stats.moisture_content.is_none());
    }

    #[test]
    // Purpose
    // -------
    // An empty column has no summary; two values give the closed-form spread.
    //
    // Given
    // -----
    // - No values, then [17, 19].
    //
    // Expect
    // ------
    // - None for the empty input.
    // - mean 18, std sqrt(2).
    fn descriptive_handles_empty_and_pair() {
        // Act
        let empty = Descriptive::from_values(std::iter::empty());
        let pair = Descriptive::from_values([17.0, 19.0]).unwrap();

        // Assert
        assert!(empty.is_none());
        assert_eq!(pair.count, 2);
        assert_relative_eq!(pair.mean, 18.0);
        assert_relative_eq!(pair.std_dev.unwrap(), 2.0_f64.sqrt(), epsilon = 1e-12);
    }
}
