use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    RAIN_HEAVY_MAX, RAIN_LIGHT_MAX, RAIN_LOWER_EDGE, RAIN_MODERATE_MAX, RAIN_NONE_MAX,
};

/// Ordinal rainfall band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RainCategory {
    #[serde(rename = "None")]
    NoRain,
    Light,
    Moderate,
    Heavy,
    #[serde(rename = "Very Heavy")]
    VeryHeavy,
}

impl RainCategory {
    pub const ALL: [RainCategory; 5] = [
        RainCategory::NoRain,
        RainCategory::Light,
        RainCategory::Moderate,
        RainCategory::Heavy,
        RainCategory::VeryHeavy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RainCategory::NoRain => "None",
            RainCategory::Light => "Light",
            RainCategory::Moderate => "Moderate",
            RainCategory::Heavy => "Heavy",
            RainCategory::VeryHeavy => "Very Heavy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == s)
    }
}

impl std::fmt::Display for RainCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Right-closed bin edges `[-0.1, 0, 2.5, 7.6, 50, upper]`.
///
/// `upper` is the largest rainfall seen when the bins were built. It never
/// drops below the Heavy edge, so the edges always increase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainBins {
    upper: f64,
}

impl RainBins {
    pub fn with_upper(upper: f64) -> Self {
        let upper = if upper.is_nan() { RAIN_HEAVY_MAX } else { upper };
        Self {
            upper: upper.max(RAIN_HEAVY_MAX),
        }
    }

    /// Build bins from the observed rainfall values, ignoring missing ones.
    pub fn from_observed<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let max = values
            .into_iter()
            .flatten()
            .fold(f64::NEG_INFINITY, f64::max);
        Self::with_upper(max)
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn edges(&self) -> [f64; 6] {
        [
            RAIN_LOWER_EDGE,
            RAIN_NONE_MAX,
            RAIN_LIGHT_MAX,
            RAIN_MODERATE_MAX,
            RAIN_HEAVY_MAX,
            self.upper,
        ]
    }

    /// Category for a rainfall value. Values outside `(-0.1, upper]` are not classified.
    pub fn classify(&self, rain: f64) -> Option<RainCategory> {
        if rain.is_nan() || rain <= RAIN_LOWER_EDGE || rain > self.upper {
            return None;
        }

        let category = if rain <= RAIN_NONE_MAX {
            RainCategory::NoRain
        } else if rain <= RAIN_LIGHT_MAX {
            RainCategory::Light
        } else if rain <= RAIN_MODERATE_MAX {
            RainCategory::Moderate
        } else if rain <= RAIN_HEAVY_MAX {
            RainCategory::Heavy
        } else {
            RainCategory::VeryHeavy
        };

        Some(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_right_closed() {
        let bins = RainBins::with_upper(72.5);

        assert_eq!(bins.classify(0.0), Some(RainCategory::NoRain));
        assert_eq!(bins.classify(-0.05), Some(RainCategory::NoRain));
        assert_eq!(bins.classify(0.1), Some(RainCategory::Light));
        assert_eq!(bins.classify(2.5), Some(RainCategory::Light));
        assert_eq!(bins.classify(2.6), Some(RainCategory::Moderate));
        assert_eq!(bins.classify(7.6), Some(RainCategory::Moderate));
        assert_eq!(bins.classify(7.7), Some(RainCategory::Heavy));
        assert_eq!(bins.classify(50.0), Some(RainCategory::Heavy));
        assert_eq!(bins.classify(50.1), Some(RainCategory::VeryHeavy));
        assert_eq!(bins.classify(72.5), Some(RainCategory::VeryHeavy));
    }

    #[test]
    fn test_out_of_range_is_unclassified() {
        let bins = RainBins::with_upper(72.5);

        assert_eq!(bins.classify(-0.1), None);
        assert_eq!(bins.classify(-3.0), None);
        assert_eq!(bins.classify(72.6), None);
        assert_eq!(bins.classify(f64::NAN), None);
    }

    #[test]
    fn test_partition_has_no_gaps() {
        let bins = RainBins::with_upper(60.0);
        let mut value = -0.09;
        while value <= 60.0 {
            assert!(bins.classify(value).is_some(), "gap at {}", value);
            value += 0.01;
        }
    }

    #[test]
    fn test_edges_increase_when_max_is_small() {
        let bins = RainBins::from_observed(vec![Some(0.0), None, Some(3.2)]);
        assert_eq!(bins.upper(), 50.0);
        let edges = bins.edges();
        assert!(edges.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(bins.classify(3.2), Some(RainCategory::Moderate));
    }

    #[test]
    fn test_upper_follows_observed_max() {
        let bins = RainBins::from_observed(vec![Some(12.0), Some(72.5), None]);
        assert_eq!(bins.upper(), 72.5);

        let empty = RainBins::from_observed(Vec::<Option<f64>>::new());
        assert_eq!(empty.upper(), 50.0);
    }

    #[test]
    fn test_labels_round_trip() {
        for category in RainCategory::ALL {
            assert_eq!(RainCategory::parse(category.label()), Some(category));
        }
        assert_eq!(RainCategory::VeryHeavy.to_string(), "Very Heavy");
        assert_eq!(RainCategory::parse("Drizzle"), None);
    }
}
