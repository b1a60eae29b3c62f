use crate::error::{ProcessingError, Result};

/// Convert DMS (Degrees:Minutes:Seconds) format to decimal degrees
///
/// # Examples
/// ```
/// use airquality_processor::utils::dms_to_decimal;
///
/// let decimal = dms_to_decimal("39:55:44").unwrap();
/// assert!((decimal - 39.928889).abs() < 0.000001);
/// ```
pub fn dms_to_decimal(dms: &str) -> Result<f64> {
    let parts: Vec<&str> = dms.split(':').collect();

    if parts.len() != 3 {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Invalid DMS format: '{}'. Expected format: 'DD:MM:SS'",
            dms
        )));
    }

    let is_negative = dms.starts_with('-');

    let degrees = parts[0].parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid degrees value: '{}'", parts[0]))
    })?;

    let minutes = parts[1].parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid minutes value: '{}'", parts[1]))
    })?;

    let seconds = parts[2].parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid seconds value: '{}'", parts[2]))
    })?;

    if !(0.0..60.0).contains(&minutes) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Minutes must be between 0 and 60, got: {}",
            minutes
        )));
    }

    if !(0.0..60.0).contains(&seconds) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Seconds must be between 0 and 60, got: {}",
            seconds
        )));
    }

    let decimal_value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;

    if is_negative {
        Ok(-decimal_value)
    } else {
        Ok(decimal_value)
    }
}

/// Parse coordinate that might be in DMS or decimal format
pub fn parse_coordinate(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();

    if !trimmed.contains(':') {
        trimmed.parse::<f64>().map_err(|_| {
            ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
        })
    } else {
        dms_to_decimal(trimmed)
    }
}

/// Centre and bounding box of a set of (latitude, longitude) points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicExtent {
    pub center: (f64, f64),
    pub south_west: (f64, f64),
    pub north_east: (f64, f64),
}

impl GeographicExtent {
    /// Mean centre plus min/max bounds; `None` for an empty point set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut count = 0usize;
        let (mut lat_sum, mut lon_sum) = (0.0, 0.0);
        let mut south_west = (f64::INFINITY, f64::INFINITY);
        let mut north_east = (f64::NEG_INFINITY, f64::NEG_INFINITY);

        for (lat, lon) in points {
            count += 1;
            lat_sum += lat;
            lon_sum += lon;
            south_west = (south_west.0.min(lat), south_west.1.min(lon));
            north_east = (north_east.0.max(lat), north_east.1.max(lon));
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            center: (lat_sum / count as f64, lon_sum / count as f64),
            south_west,
            north_east,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dms_to_decimal() {
        assert!((dms_to_decimal("50:30:15").unwrap() - 50.504167).abs() < 0.000001);
        assert!((dms_to_decimal("116:24:25").unwrap() - 116.406944).abs() < 0.000001);

        // -0:07:39 = -(7/60 + 39/3600)
        let result = dms_to_decimal("-0:07:39").unwrap();
        assert!((result - -0.1275).abs() < 0.0001);
    }

    #[test]
    fn test_invalid_dms_format() {
        assert!(dms_to_decimal("50:30").is_err());
        assert!(dms_to_decimal("50:70:15").is_err()); // Invalid minutes
        assert!(dms_to_decimal("50:30:70").is_err()); // Invalid seconds
    }

    #[test]
    fn test_parse_coordinate() {
        assert!((parse_coordinate("39.9042").unwrap() - 39.9042).abs() < 0.000001);
        assert!((parse_coordinate("50:30:15").unwrap() - 50.504167).abs() < 0.000001);
        assert!((parse_coordinate(" 116.4074 ").unwrap() - 116.4074).abs() < 0.000001);
        assert!(parse_coordinate("north").is_err());
    }

    #[test]
    fn test_geographic_extent() {
        let extent =
            GeographicExtent::from_points(vec![(39.0, 116.0), (41.0, 118.0), (40.0, 117.0)])
                .unwrap();
        assert_eq!(extent.center, (40.0, 117.0));
        assert_eq!(extent.south_west, (39.0, 116.0));
        assert_eq!(extent.north_east, (41.0, 118.0));

        assert!(GeographicExtent::from_points(Vec::new()).is_none());
    }
}
