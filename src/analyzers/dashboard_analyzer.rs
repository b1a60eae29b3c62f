use crate::analyzers::geocoder::{geocode_stations, join_by_station, GeoPoint, Geocoder};
use crate::analyzers::labels::{self, ChartLabels};
use crate::error::Result;
use crate::models::{
    Dataset, PollutantCorrelation, RainCategory, RainCorrelation, Selection, StationSummary,
    YearRange,
};
use crate::processors::{rank_by_sum, Aggregator};
use crate::utils::constants::RAIN_COLUMN;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which slice of the data the range-driven views show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    /// Years for the pollutant distribution and the map
    pub range: YearRange,
    pub pollutant: String,
    /// Years for the rain trend; every year in the data when unset
    #[serde(default)]
    pub trend_range: Option<YearRange>,
}

impl ViewRequest {
    pub fn new(range: YearRange, pollutant: impl Into<String>) -> Self {
        Self {
            range,
            pollutant: pollutant.into(),
            trend_range: None,
        }
    }

    pub fn with_trend_range(mut self, range: YearRange) -> Self {
        self.trend_range = Some(range);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub rain: f64,
    pub value: f64,
    pub rain_cat: Option<RainCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterView {
    pub pollutant: String,
    pub labels: ChartLabels,
    pub hue: String,
    pub points: Vec<ScatterPoint>,
}

impl ScatterView {
    pub fn category_counts(&self) -> BTreeMap<RainCategory, usize> {
        let mut counts = BTreeMap::new();
        for point in &self.points {
            if let Some(category) = point.rain_cat {
                *counts.entry(category).or_default() += 1;
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapView {
    pub labels: ChartLabels,
    pub columns: Vec<String>,
    pub rows: Vec<RainCorrelation>,
}

/// Yearly rain totals, plus the per-station rain summary ranked by total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainTrendView {
    pub labels: ChartLabels,
    pub ranked_stations: Vec<StationSummary>,
    pub years: Vec<i32>,
    pub stations: Vec<String>,
    /// `totals[year][station]`, aligned with `years` and `stations`
    pub totals: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPair {
    pub value_label: String,
    pub value: f64,
    pub station_label: String,
    pub station: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionView {
    pub pollutant: String,
    pub range: YearRange,
    pub labels: ChartLabels,
    /// Bar chart rows in station-name order
    pub summaries: Vec<StationSummary>,
    pub metric: Option<MetricPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoView {
    pub heading: String,
    pub pollutant: String,
    pub range: YearRange,
    pub points: Vec<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardViews {
    pub title: String,
    pub scatter: Vec<ScatterView>,
    pub heatmap: HeatmapView,
    pub rain_trend: Selection<RainTrendView>,
    pub pollution: Selection<PollutionView>,
}

/// Builds the pre-aggregated tables behind each dashboard view
pub struct DashboardAnalyzer<'a> {
    dataset: &'a Dataset,
    correlation_targets: &'a [String],
}

impl<'a> DashboardAnalyzer<'a> {
    pub fn new(dataset: &'a Dataset, correlation_targets: &'a [String]) -> Self {
        Self {
            dataset,
            correlation_targets,
        }
    }

    pub fn build(&self, request: &ViewRequest) -> Result<DashboardViews> {
        let trend_range = request
            .trend_range
            .or_else(|| self.full_span())
            .unwrap_or(request.range);

        Ok(DashboardViews {
            title: labels::DASHBOARD_TITLE.to_string(),
            scatter: self.scatter_views()?,
            heatmap: self.heatmap()?,
            rain_trend: self.rain_trend(trend_range)?,
            pollution: self.pollution(&request.pollutant, request.range)?,
        })
    }

    /// RAIN against each correlation target, coloured by rain category
    pub fn scatter_views(&self) -> Result<Vec<ScatterView>> {
        let rain = self.dataset.schema.require_numeric(RAIN_COLUMN)?;

        self.correlation_targets
            .iter()
            .map(|pollutant| {
                let index = self.dataset.schema.require_numeric(pollutant)?;
                let points = self
                    .dataset
                    .records
                    .iter()
                    .filter_map(|r| {
                        Some(ScatterPoint {
                            rain: r.value(rain)?,
                            value: r.value(index)?,
                            rain_cat: r.rain_category,
                        })
                    })
                    .collect();

                Ok(ScatterView {
                    pollutant: pollutant.clone(),
                    labels: labels::scatter(RAIN_COLUMN, pollutant),
                    hue: labels::RAIN_CATEGORY_HUE.to_string(),
                    points,
                })
            })
            .collect()
    }

    /// First through last year present in the dataset
    pub fn full_span(&self) -> Option<YearRange> {
        self.dataset
            .year_bounds()
            .map(|(first, last)| YearRange::new(first, last))
    }

    pub fn heatmap(&self) -> Result<HeatmapView> {
        let rows = Aggregator::new(self.dataset).rain_correlations(self.correlation_targets)?;
        let columns = self
            .correlation_targets
            .iter()
            .map(|t| PollutantCorrelation::label_for(t))
            .collect();

        Ok(HeatmapView {
            labels: labels::heatmap(),
            columns,
            rows,
        })
    }

    /// Yearly totals over `range`; the station ranking always covers the whole dataset
    pub fn rain_trend(&self, range: YearRange) -> Result<Selection<RainTrendView>> {
        let selection = Aggregator::new(self.dataset).by_station_in_range(RAIN_COLUMN, range)?;
        let Selection::Available(summaries) = selection else {
            return Ok(Selection::Empty(range));
        };

        let filtered = self.dataset.filter_years(range);
        let yearly = Aggregator::new(&filtered).by_station_year(RAIN_COLUMN)?;

        let stations: Vec<String> = summaries.iter().map(|s| s.station.clone()).collect();
        let mut years: Vec<i32> = yearly.iter().map(|s| s.year).collect();
        years.sort_unstable();
        years.dedup();

        let lookup: BTreeMap<(&str, i32), Option<f64>> = yearly
            .iter()
            .map(|s| ((s.station.as_str(), s.year), s.stats.sum))
            .collect();

        let totals = years
            .iter()
            .map(|&year| {
                stations
                    .iter()
                    .map(|station| lookup.get(&(station.as_str(), year)).copied().flatten())
                    .collect()
            })
            .collect();

        Ok(Selection::Available(RainTrendView {
            labels: labels::rain_trend(range),
            ranked_stations: rank_by_sum(&Aggregator::new(self.dataset).by_station(RAIN_COLUMN)?),
            years,
            stations,
            totals,
        }))
    }

    pub fn pollution(&self, pollutant: &str, range: YearRange) -> Result<Selection<PollutionView>> {
        let selection = Aggregator::new(self.dataset).by_station_in_range(pollutant, range)?;

        Ok(selection.map(|summaries| {
            let metric = rank_by_sum(&summaries).into_iter().next().and_then(|top| {
                Some(MetricPair {
                    value_label: labels::metric_value(pollutant),
                    value: top.stats.sum?,
                    station_label: labels::metric_station(pollutant),
                    station: top.station,
                })
            });

            PollutionView {
                pollutant: pollutant.to_string(),
                range,
                labels: labels::pollution(pollutant, range),
                summaries,
                metric,
            }
        }))
    }

    /// Pollution sums joined to geocoded stations by name
    pub fn geo_view(
        &self,
        pollutant: &str,
        range: YearRange,
        geocoder: &dyn Geocoder,
    ) -> Result<Selection<GeoView>> {
        let selection = Aggregator::new(self.dataset).by_station_in_range(pollutant, range)?;

        Ok(selection.map(|summaries| {
            let stations: Vec<String> = summaries.iter().map(|s| s.station.clone()).collect();
            let located = geocode_stations(geocoder, &stations);

            GeoView {
                heading: labels::geo_heading(pollutant, range),
                pollutant: pollutant.to_string(),
                range,
                points: join_by_station(&summaries, &located),
            }
        }))
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{:.2}", v))
}

impl DashboardViews {
    /// Terminal rendering of every view
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== {} ===\n", self.title));

        if let Some(first) = self.scatter.first() {
            out.push_str(&format!("\n## {}\n", first.labels.heading));
        }
        for view in &self.scatter {
            out.push_str(&format!(
                "{}: {} points",
                view.labels.title,
                view.points.len()
            ));
            let counts: Vec<String> = view
                .category_counts()
                .iter()
                .map(|(category, n)| format!("{}={}", category, n))
                .collect();
            if !counts.is_empty() {
                out.push_str(&format!(" ({})", counts.join(", ")));
            }
            out.push('\n');
        }

        out.push_str(&format!("\n## {}\n", self.heatmap.labels.heading));
        out.push_str(&format!("{:<16}", "station"));
        for column in &self.heatmap.columns {
            out.push_str(&format!("{:>16}", column));
        }
        out.push('\n');
        for row in &self.heatmap.rows {
            out.push_str(&format!("{:<16}", row.station));
            for correlation in &row.correlations {
                out.push_str(&format!("{:>16}", format_value(correlation.coefficient)));
            }
            out.push('\n');
        }

        match &self.rain_trend {
            Selection::Available(trend) => {
                out.push_str(&format!("\n## {}\n", trend.labels.heading));
                out.push_str(&format!("{}\n", trend.labels.title));
                out.push_str(&format!(
                    "{:<16}{:>12}{:>10}{:>10}{:>10}{:>10}\n",
                    "station", "sum", "mean", "median", "min", "max"
                ));
                for summary in &trend.ranked_stations {
                    let s = &summary.stats;
                    out.push_str(&format!(
                        "{:<16}{:>12}{:>10}{:>10}{:>10}{:>10}\n",
                        summary.station,
                        format_value(s.sum),
                        format_value(s.mean),
                        format_value(s.median),
                        format_value(s.min),
                        format_value(s.max)
                    ));
                }
                out.push_str(&format!("\n{:<8}", trend.labels.x_label));
                for station in &trend.stations {
                    out.push_str(&format!("{:>16}", station));
                }
                out.push('\n');
                for (year, row) in trend.years.iter().zip(&trend.totals) {
                    out.push_str(&format!("{:<8}", year));
                    for total in row {
                        out.push_str(&format!("{:>16}", format_value(*total)));
                    }
                    out.push('\n');
                }
            }
            Selection::Empty(range) => {
                out.push_str(&format!("\n## {}\n", labels::RAIN_TREND_HEADING));
                out.push_str(&format!("{}\n", Selection::<()>::no_data_message(*range)));
            }
        }

        match &self.pollution {
            Selection::Available(view) => {
                out.push_str(&format!("\n## {}\n", view.labels.heading));
                if let Some(metric) = &view.metric {
                    out.push_str(&format!(
                        "{}: {:.2}\n{}: {}\n",
                        metric.value_label, metric.value, metric.station_label, metric.station
                    ));
                }
                out.push_str(&format!("{}\n", view.labels.title));
                for summary in &view.summaries {
                    out.push_str(&format!(
                        "{:<16}{:>14}\n",
                        summary.station,
                        format_value(summary.stats.sum)
                    ));
                }
            }
            Selection::Empty(range) => {
                out.push_str(&format!("\n{}\n", Selection::<()>::no_data_message(*range)));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::GazetteerGeocoder;
    use crate::models::{Observation, Schema, StationLocation};
    use pretty_assertions::assert_eq;

    fn targets() -> Vec<String> {
        vec!["NO2".to_string(), "SO2".to_string(), "PM10".to_string()]
    }

    fn dataset() -> Dataset {
        let schema = Schema {
            columns: Vec::new(),
            numeric: vec!["RAIN".into(), "NO2".into(), "SO2".into(), "PM10".into()],
            passthrough: Vec::new(),
        };
        let obs = |station: &str, year: i32, rain: f64, no2: f64| {
            let mut o = Observation::new(station, year, 1, 1, 0)
                .with_values(vec![Some(rain), Some(no2), Some(no2 / 10.0), Some(no2 * 2.0)]);
            o.rain_category = Some(if rain == 0.0 {
                RainCategory::NoRain
            } else {
                RainCategory::Light
            });
            o
        };
        Dataset::new(
            schema,
            vec![
                obs("A", 2016, 1.0, 20.0),
                obs("A", 2017, 0.0, 60.0),
                obs("A", 2017, 2.0, 40.0),
                obs("B", 2016, 0.5, 10.0),
                obs("B", 2017, 0.0, 300.0),
            ],
        )
    }

    #[test]
    fn test_pollution_metric_pair() {
        let data = dataset();
        let targets = targets();
        let analyzer = DashboardAnalyzer::new(&data, &targets);

        let view = analyzer.pollution("NO2", YearRange::single(2017)).unwrap();
        let view = view.available().unwrap();

        let sums: Vec<(String, Option<f64>)> = view
            .summaries
            .iter()
            .map(|s| (s.station.clone(), s.stats.sum))
            .collect();
        assert_eq!(
            sums,
            vec![
                ("A".to_string(), Some(100.0)),
                ("B".to_string(), Some(300.0))
            ]
        );

        let metric = view.metric.as_ref().unwrap();
        assert_eq!(metric.station, "B");
        assert_eq!(metric.value, 300.0);
        assert_eq!(metric.value_label, "Jumlah NO2 Terbesar");
    }

    #[test]
    fn test_empty_range_views() {
        let data = dataset();
        let targets = targets();
        let analyzer = DashboardAnalyzer::new(&data, &targets);
        let request = ViewRequest::new(YearRange::new(2020, 2021), "NO2")
            .with_trend_range(YearRange::new(2020, 2021));

        let views = analyzer.build(&request).unwrap();
        assert!(views.rain_trend.is_empty());
        assert!(views.pollution.is_empty());
        assert!(views
            .summary()
            .contains("No data for the selected range 2020–2021"));
    }

    #[test]
    fn test_rain_trend_pivot() {
        let data = dataset();
        let targets = targets();
        let analyzer = DashboardAnalyzer::new(&data, &targets);

        let trend = analyzer.rain_trend(YearRange::new(2016, 2017)).unwrap();
        let trend = trend.available().unwrap();

        assert_eq!(trend.years, vec![2016, 2017]);
        assert_eq!(trend.stations, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(
            trend.totals,
            vec![vec![Some(1.0), Some(0.5)], vec![Some(2.0), Some(0.0)]]
        );
        assert_eq!(trend.ranked_stations[0].station, "A");
        assert_eq!(
            trend.labels.title,
            "Perkembangan Total Curah Hujan per Tahun (2016–2017)"
        );
    }

    #[test]
    fn test_default_trend_spans_every_year() {
        let schema = Schema {
            columns: Vec::new(),
            numeric: vec!["RAIN".into(), "NO2".into(), "SO2".into(), "PM10".into()],
            passthrough: Vec::new(),
        };
        let records = (2013..=2017)
            .map(|year| {
                Observation::new("A", year, 3, 1, 0)
                    .with_values(vec![Some(1.0), Some(10.0), Some(1.0), Some(5.0)])
            })
            .collect();
        let data = Dataset::new(schema, records);
        let targets = targets();

        let views = DashboardAnalyzer::new(&data, &targets)
            .build(&ViewRequest::new(YearRange::single(2017), "NO2"))
            .unwrap();

        let trend = views.rain_trend.available().unwrap();
        assert_eq!(trend.years, (2013..=2017).collect::<Vec<_>>());
        assert_eq!(
            trend.labels.title,
            "Perkembangan Total Curah Hujan per Tahun (2013–2017)"
        );
        assert_eq!(trend.ranked_stations[0].stats.sum, Some(5.0));

        // The pollutant view stays on the requested year
        let pollution = views.pollution.available().unwrap();
        assert_eq!(pollution.summaries[0].stats.sum, Some(10.0));
    }

    #[test]
    fn test_ranking_covers_whole_dataset() {
        let data = dataset();
        let targets = targets();
        let analyzer = DashboardAnalyzer::new(&data, &targets);

        let trend = analyzer.rain_trend(YearRange::single(2017)).unwrap();
        let trend = trend.available().unwrap();

        assert_eq!(trend.years, vec![2017]);
        let ranked: Vec<(&str, Option<f64>)> = trend
            .ranked_stations
            .iter()
            .map(|s| (s.station.as_str(), s.stats.sum))
            .collect();
        assert_eq!(ranked, vec![("A", Some(3.0)), ("B", Some(0.5))]);
    }

    #[test]
    fn test_scatter_and_heatmap() {
        let data = dataset();
        let targets = targets();
        let analyzer = DashboardAnalyzer::new(&data, &targets);

        let scatter = analyzer.scatter_views().unwrap();
        assert_eq!(scatter.len(), 3);
        assert_eq!(scatter[0].points.len(), 5);
        assert_eq!(scatter[0].labels.title, "Scatter Plot Korelasi RAIN dengan NO2");
        assert_eq!(scatter[0].category_counts()[&RainCategory::NoRain], 2);

        let heatmap = analyzer.heatmap().unwrap();
        assert_eq!(
            heatmap.columns,
            vec!["rain_no2_corr", "rain_so2_corr", "rain_pm10_corr"]
        );
        assert_eq!(heatmap.rows.len(), 2);
    }

    #[test]
    fn test_geo_view_joins_by_name() {
        let data = dataset();
        let targets = targets();
        let analyzer = DashboardAnalyzer::new(&data, &targets);
        let geocoder =
            GazetteerGeocoder::from_locations(vec![StationLocation::new("B", 40.0, 116.0)]);

        let view = analyzer
            .geo_view("NO2", YearRange::single(2017), &geocoder)
            .unwrap();
        let view = view.available().unwrap();

        assert_eq!(view.points.len(), 1);
        assert_eq!(view.points[0].station, "B");
        assert_eq!(view.points[0].value, 300.0);
    }

    #[test]
    fn test_views_serialize() {
        let data = dataset();
        let targets = targets();
        let views = DashboardAnalyzer::new(&data, &targets)
            .build(&ViewRequest::new(YearRange::single(2017), "NO2"))
            .unwrap();

        let json = serde_json::to_value(&views).unwrap();
        assert_eq!(json["pollution"]["status"], "available");
        assert_eq!(json["pollution"]["data"]["metric"]["station"], "B");
        assert_eq!(json["scatter"][0]["points"][1]["rain_cat"], "None");
    }
}
