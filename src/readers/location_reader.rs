use crate::error::{ProcessingError, Result};
use crate::models::StationLocation;
use crate::utils::coordinates::parse_coordinate;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use validator::Validate;

/// Reads a station gazetteer: `station, latitude, longitude` per line.
/// Coordinates may be decimal or `DD:MM:SS`.
pub struct LocationReader {
    skip_headers: bool,
}

impl LocationReader {
    pub fn new() -> Self {
        Self { skip_headers: true }
    }

    pub fn with_skip_headers(skip_headers: bool) -> Self {
        Self { skip_headers }
    }

    pub fn read_locations(&self, path: &Path) -> Result<Vec<StationLocation>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut locations = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(location) = self.parse_location_line(trimmed).map_err(|e| {
                ProcessingError::InvalidFormat(format!(
                    "{} line {}: {}",
                    path.display(),
                    index + 1,
                    e
                ))
            })? {
                locations.push(location);
            }
        }

        Ok(locations)
    }

    /// Parse a single gazetteer line
    fn parse_location_line(&self, line: &str) -> Result<Option<StationLocation>> {
        let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();

        if parts.len() < 3 {
            return Ok(None); // Skip malformed lines
        }

        // Header rows carry column names where coordinates should be
        if self.skip_headers && !looks_numeric(parts[1]) {
            return Ok(None);
        }

        let latitude = parse_coordinate(parts[1])?;
        let longitude = parse_coordinate(parts[2])?;
        let location = StationLocation::new(parts[0], latitude, longitude);
        location.validate()?;

        Ok(Some(location))
    }

    /// Locations keyed by normalised station name; later lines win.
    pub fn read_locations_map(&self, path: &Path) -> Result<HashMap<String, StationLocation>> {
        let locations = self.read_locations(path)?;
        let mut map = HashMap::with_capacity(locations.len());

        for location in locations {
            map.insert(StationLocation::key(&location.station), location);
        }

        Ok(map)
    }
}

impl Default for LocationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn looks_numeric(field: &str) -> bool {
    field
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_location_line() {
        let reader = LocationReader::new();

        let line = "Dongsi, 39:55:44, 116:25:01";
        let location = reader.parse_location_line(line).unwrap().unwrap();

        assert_eq!(location.station, "Dongsi");
        assert!((location.latitude - 39.928889).abs() < 0.00001);
        assert!((location.longitude - 116.416944).abs() < 0.00001);
    }

    #[test]
    fn test_header_line_skipped() {
        let reader = LocationReader::new();
        assert!(reader
            .parse_location_line("station,latitude,longitude")
            .unwrap()
            .is_none());

        let strict = LocationReader::with_skip_headers(false);
        assert!(strict
            .parse_location_line("station,latitude,longitude")
            .is_err());
    }

    #[test]
    fn test_out_of_range_coordinate_rejected() {
        let reader = LocationReader::new();
        assert!(reader.parse_location_line("Nowhere, 95.0, 116.0").is_err());
    }

    #[test]
    fn test_read_locations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "station,latitude,longitude")?;
        writeln!(temp_file, "# Beijing monitoring sites")?;
        writeln!(temp_file)?;
        writeln!(temp_file, "Aotizhongxin, 39.982, 116.397")?;
        writeln!(temp_file, "Changping, 40.217, 116.230")?;

        let reader = LocationReader::new();
        let locations = reader.read_locations(temp_file.path())?;

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].station, "Aotizhongxin");
        assert_eq!(locations[1].station, "Changping");

        let map = reader.read_locations_map(temp_file.path())?;
        assert!(map.contains_key("changping"));

        Ok(())
    }

    #[test]
    fn test_bad_line_reports_position() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "Aotizhongxin, 39.982, 116.397")?;
        writeln!(temp_file, "Changping, 40.2x, 116.230")?;

        let err = LocationReader::new()
            .read_locations(temp_file.path())
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));

        Ok(())
    }
}
