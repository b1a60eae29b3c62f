pub mod dashboard_analyzer;
pub mod geocoder;
pub mod labels;

pub use dashboard_analyzer::{
    DashboardAnalyzer, DashboardViews, GeoView, HeatmapView, MetricPair, PollutionView,
    RainTrendView, ScatterPoint, ScatterView, ViewRequest,
};
pub use geocoder::{geocode_stations, join_by_station, GazetteerGeocoder, GeoPoint, Geocoder};
pub use labels::ChartLabels;
