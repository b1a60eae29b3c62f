use serde::{Deserialize, Serialize};

/// Count/sum/mean/median/min/max over the present values of a group.
///
/// Missing values are skipped. A group without any present value has
/// `count == 0` and every statistic missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub sum: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SummaryStatistics {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut present: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();

        if present.is_empty() {
            return Self::default();
        }

        // Sorted accumulation keeps the sum independent of row order
        present.sort_by(f64::total_cmp);

        let count = present.len();
        let sum: f64 = present.iter().sum();
        let median = if count % 2 == 1 {
            present[count / 2]
        } else {
            (present[count / 2 - 1] + present[count / 2]) / 2.0
        };

        Self {
            count,
            sum: Some(sum),
            mean: Some(sum / count as f64),
            median: Some(median),
            min: present.first().copied(),
            max: present.last().copied(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub station: String,
    pub stats: SummaryStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationYearSummary {
    pub station: String,
    pub year: i32,
    pub stats: SummaryStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantCorrelation {
    pub pollutant: String,
    /// Pearson r; missing for fewer than two pairs or a constant series
    pub coefficient: Option<f64>,
}

impl PollutantCorrelation {
    pub fn column_label(&self) -> String {
        Self::label_for(&self.pollutant)
    }

    /// Heatmap column name for a pollutant, e.g. `rain_no2_corr`
    pub fn label_for(pollutant: &str) -> String {
        format!("rain_{}_corr", pollutant.to_lowercase())
    }
}

/// RAIN against each pollutant for one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainCorrelation {
    pub station: String,
    pub correlations: Vec<PollutantCorrelation>,
}

impl RainCorrelation {
    pub fn coefficient(&self, pollutant: &str) -> Option<f64> {
        self.correlations
            .iter()
            .find(|c| c.pollutant == pollutant)
            .and_then(|c| c.coefficient)
    }
}
