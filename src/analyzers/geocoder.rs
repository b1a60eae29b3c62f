use crate::error::Result;
use crate::models::{StationLocation, StationSummary};
use crate::readers::LocationReader;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Resolves a station name to `(latitude, longitude)`
pub trait Geocoder {
    fn locate(&self, station: &str) -> Option<(f64, f64)>;
}

/// Geocoder backed by a local gazetteer file
pub struct GazetteerGeocoder {
    locations: HashMap<String, StationLocation>,
}

impl GazetteerGeocoder {
    pub fn from_file(path: &Path) -> Result<Self> {
        let locations = LocationReader::new().read_locations_map(path)?;
        debug!(entries = locations.len(), "Loaded gazetteer");
        Ok(Self { locations })
    }

    pub fn from_locations(locations: Vec<StationLocation>) -> Self {
        Self {
            locations: locations
                .into_iter()
                .map(|l| (StationLocation::key(&l.station), l))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Geocoder for GazetteerGeocoder {
    fn locate(&self, station: &str) -> Option<(f64, f64)> {
        self.locations
            .get(&StationLocation::key(station))
            .map(StationLocation::coordinates)
    }
}

/// Locations for the stations that resolve; the rest are dropped.
pub fn geocode_stations(geocoder: &dyn Geocoder, stations: &[String]) -> Vec<StationLocation> {
    stations
        .iter()
        .filter_map(|station| match geocoder.locate(station) {
            Some((latitude, longitude)) => {
                Some(StationLocation::new(station.clone(), latitude, longitude))
            }
            None => {
                warn!(station = %station, "Station could not be geocoded; dropped from map");
                None
            }
        })
        .collect()
}

/// A located station with its aggregated value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
}

/// Join aggregates to locations by station name.
///
/// Stations missing from either side, or without a sum, are left out.
/// Output follows the order of `summaries`.
pub fn join_by_station(summaries: &[StationSummary], locations: &[StationLocation]) -> Vec<GeoPoint> {
    let by_name: HashMap<&str, &StationLocation> = locations
        .iter()
        .map(|l| (l.station.as_str(), l))
        .collect();

    summaries
        .iter()
        .filter_map(|summary| {
            let location = by_name.get(summary.station.as_str())?;
            let value = summary.stats.sum?;
            Some(GeoPoint {
                station: summary.station.clone(),
                latitude: location.latitude,
                longitude: location.longitude,
                value,
            })
        })
        .collect()
}
