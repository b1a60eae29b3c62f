use crate::error::Result;
use crate::models::{
    Dataset, PollutantCorrelation, RainCorrelation, Selection, StationSummary,
    StationYearSummary, SummaryStatistics, YearRange,
};
use crate::utils::constants::RAIN_COLUMN;
use std::collections::BTreeMap;

/// Grouped statistics over a cleaned dataset
pub struct Aggregator<'a> {
    dataset: &'a Dataset,
}

impl<'a> Aggregator<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Statistics of one column per station, in station-name order
    pub fn by_station(&self, column: &str) -> Result<Vec<StationSummary>> {
        let index = self.dataset.schema.require_numeric(column)?;
        let mut groups: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();

        for record in &self.dataset.records {
            groups
                .entry(record.station.as_str())
                .or_default()
                .push(record.value(index));
        }

        Ok(groups
            .into_iter()
            .map(|(station, values)| StationSummary {
                station: station.to_string(),
                stats: SummaryStatistics::from_values(values),
            })
            .collect())
    }

    /// Statistics of one column per (station, year), ordered by station then year
    pub fn by_station_year(&self, column: &str) -> Result<Vec<StationYearSummary>> {
        let index = self.dataset.schema.require_numeric(column)?;
        let mut groups: BTreeMap<(&str, i32), Vec<Option<f64>>> = BTreeMap::new();

        for record in &self.dataset.records {
            groups
                .entry((record.station.as_str(), record.year))
                .or_default()
                .push(record.value(index));
        }

        Ok(groups
            .into_iter()
            .map(|((station, year), values)| StationYearSummary {
                station: station.to_string(),
                year,
                stats: SummaryStatistics::from_values(values),
            })
            .collect())
    }

    /// Per-station statistics restricted to a year range
    pub fn by_station_in_range(
        &self,
        column: &str,
        range: YearRange,
    ) -> Result<Selection<Vec<StationSummary>>> {
        // Resolve the column first so a bad name is an error, not "no data"
        self.dataset.schema.require_numeric(column)?;

        if range.is_inverted() {
            return Ok(Selection::Empty(range));
        }

        let filtered = self.dataset.filter_years(range);
        if filtered.is_empty() {
            return Ok(Selection::Empty(range));
        }

        Ok(Selection::Available(
            Aggregator::new(&filtered).by_station(column)?,
        ))
    }

    /// Pearson correlation of RAIN against each target, per station
    pub fn rain_correlations(&self, targets: &[String]) -> Result<Vec<RainCorrelation>> {
        let rain = self.dataset.schema.require_numeric(RAIN_COLUMN)?;
        let target_indices = targets
            .iter()
            .map(|t| self.dataset.schema.require_numeric(t))
            .collect::<Result<Vec<_>>>()?;

        let mut correlations = Vec::new();
        for (station, rows) in self.dataset.station_rows() {
            let per_target = targets
                .iter()
                .zip(&target_indices)
                .map(|(pollutant, &index)| {
                    let pairs: Vec<(f64, f64)> = rows
                        .iter()
                        .filter_map(|&r| {
                            let record = &self.dataset.records[r];
                            Some((record.value(rain)?, record.value(index)?))
                        })
                        .collect();

                    PollutantCorrelation {
                        pollutant: pollutant.clone(),
                        coefficient: pearson(&pairs),
                    }
                })
                .collect();

            correlations.push(RainCorrelation {
                station: station.to_string(),
                correlations: per_target,
            });
        }

        Ok(correlations)
    }
}

/// Stations sorted by sum, largest first. Ties keep their incoming order;
/// stations without a sum go last.
pub fn rank_by_sum(summaries: &[StationSummary]) -> Vec<StationSummary> {
    let mut ranked = summaries.to_vec();
    ranked.sort_by(|a, b| match (a.stats.sum, b.stats.sum) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    ranked
}

/// Pearson r over complete pairs. `None` for fewer than two pairs or zero variance.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    // Fixed accumulation order regardless of row order
    let mut sorted = pairs.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let n = sorted.len() as f64;
    let mean_x = sorted.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = sorted.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in &sorted {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    let r = sxy / (sxx.sqrt() * syy.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
