use serde::{Deserialize, Serialize};
use validator::Validate;

/// Resolved position of a monitoring station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationLocation {
    #[validate(length(min = 1))]
    pub station: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl StationLocation {
    pub fn new(station: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            station: station.into(),
            latitude,
            longitude,
        }
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Lookup key; gazetteer matches ignore case and surrounding spaces
    pub fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_validation() {
        let station = StationLocation::new("Dongsi", 39.929, 116.417);
        assert!(station.validate().is_ok());
        assert_eq!(station.coordinates(), (39.929, 116.417));
    }

    #[test]
    fn test_invalid_coordinates() {
        let station = StationLocation::new("Invalid Station", 91.0, 116.0);
        assert!(station.validate().is_err());

        let station = StationLocation::new("Invalid Station", 39.0, 181.0);
        assert!(station.validate().is_err());

        let unnamed = StationLocation::new("", 39.0, 116.0);
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_key_normalisation() {
        assert_eq!(StationLocation::key("  Wanshouxigong "), "wanshouxigong");
    }
}
