use crate::error::Result;
use crate::models::{Dataset, RainBins};
use crate::processors::categorical_fill::{fill_missing, mode};
use crate::processors::interpolator::interpolate_both_ways;
use crate::utils::constants::RAIN_COLUMN;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// What cleaning changed
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningReport {
    /// Values filled by interpolation, per column
    pub interpolated: BTreeMap<String, usize>,
    /// (station, column) pairs with no value to interpolate from
    pub unresolved: Vec<(String, String)>,
    pub wind_direction_mode: Option<String>,
    pub wind_direction_filled: usize,
    pub rain_bins: RainBins,
    /// Records with a RAIN value that no bin covers
    pub uncategorised_rain: usize,
}

impl CleaningReport {
    pub fn total_interpolated(&self) -> usize {
        self.interpolated.values().sum()
    }
}

/// Per-station interpolation, wind-direction fill and derived columns.
pub struct DataCleaner {
    columns: Option<Vec<String>>,
}

impl DataCleaner {
    /// Interpolate every numeric column of the schema
    pub fn new() -> Self {
        Self { columns: None }
    }

    /// Interpolate only the named columns; others are left as read
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns: Some(columns),
        }
    }

    pub fn clean(&self, mut dataset: Dataset) -> Result<(Dataset, CleaningReport)> {
        let (interpolated, unresolved) = self.interpolate_by_station(&mut dataset);
        let (wind_direction_mode, wind_direction_filled) = fill_wind_direction(&mut dataset);

        derive_dates(&mut dataset)?;
        let (rain_bins, uncategorised_rain) = assign_rain_categories(&mut dataset)?;

        let report = CleaningReport {
            interpolated,
            unresolved,
            wind_direction_mode,
            wind_direction_filled,
            rain_bins,
            uncategorised_rain,
        };

        info!(
            records = dataset.len(),
            interpolated = report.total_interpolated(),
            wind_direction_filled = report.wind_direction_filled,
            unresolved = report.unresolved.len(),
            "Cleaned dataset"
        );

        Ok((dataset, report))
    }

    fn target_columns(&self, dataset: &Dataset) -> Vec<(usize, String)> {
        dataset
            .schema
            .numeric
            .iter()
            .enumerate()
            .filter(|(_, name)| {
                self.columns
                    .as_ref()
                    .map_or(true, |wanted| wanted.iter().any(|w| w == *name))
            })
            .map(|(i, name)| (i, name.clone()))
            .collect()
    }

    /// Each station is interpolated on its own rows only, in input order.
    fn interpolate_by_station(
        &self,
        dataset: &mut Dataset,
    ) -> (BTreeMap<String, usize>, Vec<(String, String)>) {
        let columns = self.target_columns(dataset);
        let mut interpolated: BTreeMap<String, usize> =
            columns.iter().map(|(_, name)| (name.clone(), 0)).collect();
        let mut unresolved = Vec::new();

        let groups: Vec<(String, Vec<usize>)> = dataset
            .station_rows()
            .into_iter()
            .map(|(station, rows)| (station.to_string(), rows))
            .collect();

        for (station, rows) in groups {
            for (index, name) in &columns {
                let mut series: Vec<Option<f64>> =
                    rows.iter().map(|&r| dataset.records[r].value(*index)).collect();

                let filled = interpolate_both_ways(&mut series);
                if series.iter().all(Option::is_none) {
                    warn!(station = %station, column = %name, "No values to interpolate from");
                    unresolved.push((station.clone(), name.clone()));
                    continue;
                }

                for (&r, value) in rows.iter().zip(series) {
                    dataset.records[r].values[*index] = value;
                }
                *interpolated.entry(name.clone()).or_default() += filled;
            }
            debug!(station = %station, rows = rows.len(), "Interpolated station");
        }

        (interpolated, unresolved)
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Global mode substitution for the wind-direction column
fn fill_wind_direction(dataset: &mut Dataset) -> (Option<String>, usize) {
    let most_frequent = mode(
        dataset
            .records
            .iter()
            .map(|r| r.wind_direction.as_deref()),
    );

    let filled = match &most_frequent {
        Some(fill) => fill_missing(
            dataset.records.iter_mut().map(|r| &mut r.wind_direction),
            fill,
        ),
        None => {
            warn!("Wind direction has no values; leaving it missing");
            0
        }
    };

    (most_frequent, filled)
}

fn derive_dates(dataset: &mut Dataset) -> Result<()> {
    for record in &mut dataset.records {
        record.date = Some(record.timestamp()?);
    }
    Ok(())
}

fn assign_rain_categories(dataset: &mut Dataset) -> Result<(RainBins, usize)> {
    let rain = dataset.schema.require_numeric(RAIN_COLUMN)?;
    let bins = RainBins::from_observed(dataset.records.iter().map(|r| r.value(rain)));

    let mut uncategorised = 0;
    for record in &mut dataset.records {
        record.rain_category = record.value(rain).and_then(|v| bins.classify(v));
        if record.value(rain).is_some() && record.rain_category.is_none() {
            uncategorised += 1;
        }
    }

    Ok((bins, uncategorised))
}
