use crate::models::Dataset;
use crate::processors::CleaningReport;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub station_count: usize,
    pub year_bounds: Option<(i32, i32)>,
    pub missing_before: BTreeMap<String, usize>,
    pub missing_after: BTreeMap<String, usize>,
    pub wind_direction_missing_before: usize,
    pub wind_direction_missing_after: usize,
    pub unresolved: Vec<(String, String)>,
    pub uncategorised_rain: usize,
}

impl IntegrityReport {
    pub fn is_complete(&self) -> bool {
        self.missing_after.values().all(|&n| n == 0) && self.wind_direction_missing_after == 0
    }
}

/// Compares missing-value counts before and after cleaning
pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Missing entries per numeric column
    pub fn missing_counts(&self, dataset: &Dataset) -> BTreeMap<String, usize> {
        dataset
            .schema
            .numeric
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let missing = dataset
                    .records
                    .iter()
                    .filter(|r| r.value(index).is_none())
                    .count();
                (name.clone(), missing)
            })
            .collect()
    }

    fn wind_direction_missing(&self, dataset: &Dataset) -> usize {
        dataset
            .records
            .iter()
            .filter(|r| r.wind_direction.is_none())
            .count()
    }

    pub fn check_integrity(
        &self,
        raw: &Dataset,
        cleaned: &Dataset,
        cleaning: &CleaningReport,
    ) -> IntegrityReport {
        IntegrityReport {
            total_records: cleaned.len(),
            station_count: cleaned.station_rows().len(),
            year_bounds: cleaned.year_bounds(),
            missing_before: self.missing_counts(raw),
            missing_after: self.missing_counts(cleaned),
            wind_direction_missing_before: self.wind_direction_missing(raw),
            wind_direction_missing_after: self.wind_direction_missing(cleaned),
            unresolved: cleaning.unresolved.clone(),
            uncategorised_rain: cleaning.uncategorised_rain,
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!("Stations: {}\n", report.station_count));
        if let Some((first, last)) = report.year_bounds {
            summary.push_str(&format!("Years: {} to {}\n", first, last));
        }

        summary.push_str("\nMissing Values (before -> after cleaning):\n");
        for (column, before) in &report.missing_before {
            let after = report.missing_after.get(column).copied().unwrap_or(0);
            let pct = if report.total_records == 0 {
                0.0
            } else {
                100.0 * *before as f64 / report.total_records as f64
            };
            summary.push_str(&format!(
                "  {:<6} {:>8} ({:.1}%) -> {}\n",
                column, before, pct, after
            ));
        }
        summary.push_str(&format!(
            "  {:<6} {:>8} -> {}\n",
            "wd", report.wind_direction_missing_before, report.wind_direction_missing_after
        ));

        summary.push_str(&format!(
            "\nUnresolved station columns: {}\n",
            report.unresolved.len()
        ));
        for (i, (station, column)) in report.unresolved.iter().take(10).enumerate() {
            summary.push_str(&format!("  {}. {} has no {} values\n", i + 1, station, column));
        }

        if report.uncategorised_rain > 0 {
            summary.push_str(&format!(
                "Rain values outside every category: {}\n",
                report.uncategorised_rain
            ));
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Observation, Schema};
    use crate::processors::DataCleaner;

    fn raw() -> Dataset {
        let schema = Schema {
            columns: Vec::new(),
            numeric: vec!["RAIN".into(), "NO2".into()],
            passthrough: Vec::new(),
        };
        Dataset::new(
            schema,
            vec![
                Observation::new("A", 2013, 3, 1, 0)
                    .with_values(vec![None, Some(3.0)])
                    .with_wind_direction(Some("N")),
                Observation::new("A", 2013, 3, 1, 1)
                    .with_values(vec![Some(1.0), None])
                    .with_wind_direction(None),
                Observation::new("B", 2013, 3, 1, 0)
                    .with_values(vec![Some(0.0), None])
                    .with_wind_direction(Some("E")),
            ],
        )
    }

    #[test]
    fn test_check_integrity() {
        let raw = raw();
        let (cleaned, cleaning) = DataCleaner::new().clean(raw.clone()).unwrap();

        let checker = IntegrityChecker::new();
        let report = checker.check_integrity(&raw, &cleaned, &cleaning);

        assert_eq!(report.total_records, 3);
        assert_eq!(report.station_count, 2);
        assert_eq!(report.missing_before["RAIN"], 1);
        assert_eq!(report.missing_before["NO2"], 2);
        assert_eq!(report.missing_after["RAIN"], 0);
        // Station B has no NO2 at all
        assert_eq!(report.missing_after["NO2"], 1);
        assert_eq!(report.wind_direction_missing_before, 1);
        assert_eq!(report.wind_direction_missing_after, 0);
        assert!(!report.is_complete());

        let summary = checker.generate_summary(&report);
        assert!(summary.contains("Total Records: 3"));
        assert!(summary.contains("B has no NO2 values"));
    }
}
