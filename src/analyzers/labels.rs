//! Literal titles and axis labels shown by the dashboard.

use crate::models::YearRange;
use serde::{Deserialize, Serialize};

pub const DASHBOARD_TITLE: &str = "Analisis dan Visualisasi Data Air Quality";
pub const SCATTER_HEADING: &str = "Scatter Plot antara RAIN dengan SO2, NO2, dan PM10";
pub const HEATMAP_HEADING: &str = "Heatmap Korelasi RAIN dengan SO2, NO2, dan PM10";
pub const RAIN_TREND_HEADING: &str = "Visualisasi Tren Rata-Rata Curah Hujan Dari Tiap Kota";
pub const YEAR_AXIS: &str = "Tahun";
pub const RAIN_TOTAL_AXIS: &str = "Total Curah Hujan (mm)";
pub const STATION_AXIS: &str = "Station";
pub const RAIN_CATEGORY_HUE: &str = "rain_cat";
pub const CONCENTRATION_UNIT: &str = "µg/m³";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLabels {
    pub heading: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

pub fn scatter(rain_column: &str, pollutant: &str) -> ChartLabels {
    ChartLabels {
        heading: SCATTER_HEADING.to_string(),
        title: format!("Scatter Plot Korelasi {} dengan {}", rain_column, pollutant),
        x_label: rain_column.to_string(),
        y_label: pollutant.to_string(),
    }
}

pub fn heatmap() -> ChartLabels {
    ChartLabels {
        heading: HEATMAP_HEADING.to_string(),
        title: HEATMAP_HEADING.to_string(),
        x_label: String::new(),
        y_label: STATION_AXIS.to_lowercase(),
    }
}

pub fn rain_trend(range: YearRange) -> ChartLabels {
    ChartLabels {
        heading: RAIN_TREND_HEADING.to_string(),
        title: format!("Perkembangan Total Curah Hujan per Tahun ({})", range),
        x_label: YEAR_AXIS.to_string(),
        y_label: RAIN_TOTAL_AXIS.to_string(),
    }
}

pub fn pollution(pollutant: &str, range: YearRange) -> ChartLabels {
    ChartLabels {
        heading: format!(
            "Persebaran Jumlah Polusi {} di Tiap Kota pada Tahun {}",
            pollutant, range
        ),
        title: format!(
            "Jumlah Polusi {} untuk Tiap Kota di Tahun {}",
            pollutant, range
        ),
        x_label: STATION_AXIS.to_string(),
        y_label: format!("Jumlah Polusi {}", pollutant),
    }
}

pub fn metric_value(pollutant: &str) -> String {
    format!("Jumlah {} Terbesar", pollutant)
}

pub fn metric_station(pollutant: &str) -> String {
    format!("Kota dengan {} Terbesar", pollutant)
}

pub fn geo_heading(pollutant: &str, range: YearRange) -> String {
    format!(
        "Visualisasi Geografi Daerah Terkena Polusi {} Tahun {}",
        pollutant, range
    )
}

/// Marker tooltip and popup text
pub fn marker_text(station: &str, value: f64) -> String {
    format!("{}: {:.2} {}", station, value, CONCENTRATION_UNIT)
}
