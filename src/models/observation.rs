use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{RainCategory, YearRange};

/// Column layout shared by every input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Input header in file order, derived columns excluded
    pub columns: Vec<String>,
    /// Designated floating-point columns, in header order
    pub numeric: Vec<String>,
    /// Columns carried through uninterpreted, in header order
    pub passthrough: Vec<String>,
}

impl Schema {
    pub fn numeric_index(&self, column: &str) -> Option<usize> {
        self.numeric.iter().position(|c| c == column)
    }

    pub fn passthrough_index(&self, column: &str) -> Option<usize> {
        self.passthrough.iter().position(|c| c == column)
    }

    /// Index of a numeric column the caller cannot do without
    pub fn require_numeric(&self, column: &str) -> Result<usize> {
        self.numeric_index(column)
            .ok_or_else(|| ProcessingError::MissingColumn {
                column: column.to_string(),
                source_name: "numeric columns".to_string(),
            })
    }
}

/// One station reading for one hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observation {
    #[validate(length(min = 1))]
    pub station: String,

    pub year: i32,

    #[validate(range(min = 1, max = 12))]
    pub month: u32,

    #[validate(range(min = 1, max = 31))]
    pub day: u32,

    #[validate(range(max = 23))]
    pub hour: u32,

    /// Aligned with `Schema::numeric`
    pub values: Vec<Option<f64>>,

    pub wind_direction: Option<String>,

    /// Aligned with `Schema::passthrough`
    pub passthrough: Vec<String>,

    // Derived during cleaning
    pub date: Option<NaiveDateTime>,
    pub rain_category: Option<RainCategory>,
}

impl Observation {
    pub fn new(station: impl Into<String>, year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            station: station.into(),
            year,
            month,
            day,
            hour,
            values: Vec::new(),
            wind_direction: None,
            passthrough: Vec::new(),
            date: None,
            rain_category: None,
        }
    }

    pub fn with_values(mut self, values: Vec<Option<f64>>) -> Self {
        self.values = values;
        self
    }

    pub fn with_wind_direction(mut self, wind_direction: Option<&str>) -> Self {
        self.wind_direction = wind_direction.map(str::to_string);
        self
    }

    pub fn with_passthrough(mut self, passthrough: Vec<String>) -> Self {
        self.passthrough = passthrough;
        self
    }

    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Composite timestamp from year/month/day/hour
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_opt(self.hour, 0, 0))
            .ok_or(ProcessingError::InvalidDate {
                year: self.year,
                month: self.month,
                day: self.day,
                hour: self.hour,
            })
    }
}

/// Combined record set from one or more input files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub schema: Schema,
    pub records: Vec<Observation>,
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<Observation>) -> Self {
        Self { schema, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of one numeric column in record order
    pub fn column(&self, column: &str) -> Result<Vec<Option<f64>>> {
        let index = self.schema.require_numeric(column)?;
        Ok(self.records.iter().map(|r| r.value(index)).collect())
    }

    /// Row indices per station, in input order. Stations iterate in name order.
    pub fn station_rows(&self) -> BTreeMap<&str, Vec<usize>> {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, record) in self.records.iter().enumerate() {
            groups.entry(record.station.as_str()).or_default().push(i);
        }
        groups
    }

    /// Distinct station names, sorted
    pub fn stations(&self) -> Vec<String> {
        self.station_rows().keys().map(|s| s.to_string()).collect()
    }

    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Records whose year falls inside the range, order preserved
    pub fn filter_years(&self, range: YearRange) -> Dataset {
        Dataset {
            schema: self.schema.clone(),
            records: self
                .records
                .iter()
                .filter(|r| range.contains(r.year))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema {
            columns: vec![
                "No".into(),
                "year".into(),
                "RAIN".into(),
                "NO2".into(),
                "station".into(),
            ],
            numeric: vec!["RAIN".into(), "NO2".into()],
            passthrough: vec!["No".into()],
        }
    }

    #[test]
    fn test_observation_validation() {
        let ok = Observation::new("Aotizhongxin", 2013, 3, 1, 0);
        assert!(ok.validate().is_ok());

        let bad_month = Observation::new("Aotizhongxin", 2013, 13, 1, 0);
        assert!(bad_month.validate().is_err());

        let bad_hour = Observation::new("Aotizhongxin", 2013, 3, 1, 24);
        assert!(bad_hour.validate().is_err());

        let no_station = Observation::new("", 2013, 3, 1, 0);
        assert!(no_station.validate().is_err());
    }

    #[test]
    fn test_timestamp() {
        let obs = Observation::new("Dongsi", 2016, 2, 29, 23);
        let ts = obs.timestamp().unwrap();
        assert_eq!(ts.to_string(), "2016-02-29 23:00:00");

        let invalid = Observation::new("Dongsi", 2015, 2, 30, 0);
        assert!(matches!(
            invalid.timestamp(),
            Err(ProcessingError::InvalidDate { day: 30, .. })
        ));
    }

    #[test]
    fn test_station_rows_keep_input_order() {
        let records = vec![
            Observation::new("B", 2013, 1, 1, 0),
            Observation::new("A", 2013, 1, 1, 0),
            Observation::new("B", 2013, 1, 1, 1),
        ];
        let dataset = Dataset::new(schema(), records);
        let groups = dataset.station_rows();

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(groups["B"], vec![0, 2]);
        assert_eq!(dataset.stations(), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_column_and_missing_column() {
        let records = vec![
            Observation::new("A", 2013, 1, 1, 0).with_values(vec![Some(1.0), None]),
            Observation::new("A", 2013, 1, 1, 1).with_values(vec![None, Some(4.0)]),
        ];
        let dataset = Dataset::new(schema(), records);

        assert_eq!(dataset.column("NO2").unwrap(), vec![None, Some(4.0)]);
        assert!(matches!(
            dataset.column("SO2"),
            Err(ProcessingError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_filter_years() {
        let records = vec![
            Observation::new("A", 2013, 1, 1, 0),
            Observation::new("A", 2015, 1, 1, 0),
            Observation::new("A", 2017, 1, 1, 0),
        ];
        let dataset = Dataset::new(schema(), records);

        assert_eq!(dataset.year_bounds(), Some((2013, 2017)));
        let filtered = dataset.filter_years(YearRange::new(2014, 2017));
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.records[0].year, 2015);
    }
}
