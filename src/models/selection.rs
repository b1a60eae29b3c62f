use serde::{Deserialize, Serialize};

/// Inclusive year range picked by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn single(year: i32) -> Self {
        Self::new(year, year)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// A reversed range selects nothing
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.to_string()
        } else {
            format!("{}–{}", self.start, self.end)
        }
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of a range-filtered view: either data, or an explicit "no data" marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Selection<T> {
    Available(T),
    Empty(YearRange),
}

impl<T> Selection<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty(_))
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Selection::Available(value) => Some(value),
            Selection::Empty(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Selection<U> {
        match self {
            Selection::Available(value) => Selection::Available(f(value)),
            Selection::Empty(range) => Selection::Empty(range),
        }
    }

    pub fn no_data_message(range: YearRange) -> String {
        format!("No data for the selected range {}", range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_contains() {
        let range = YearRange::new(2014, 2016);
        assert!(!range.contains(2013));
        assert!(range.contains(2014));
        assert!(range.contains(2016));
        assert!(!range.contains(2017));
        assert!(YearRange::new(2018, 2017).is_inverted());
    }

    #[test]
    fn test_year_range_label() {
        assert_eq!(YearRange::new(2013, 2017).label(), "2013–2017");
        assert_eq!(YearRange::single(2017).label(), "2017");
    }

    #[test]
    fn test_selection_map() {
        let available: Selection<u32> = Selection::Available(2);
        assert_eq!(available.map(|v| v * 2), Selection::Available(4));

        let empty: Selection<u32> = Selection::Empty(YearRange::single(2020));
        assert!(empty.clone().map(|v| v * 2).is_empty());
        assert_eq!(empty.available(), None);
        assert_eq!(
            Selection::<u32>::no_data_message(YearRange::single(2020)),
            "No data for the selected range 2020"
        );
    }
}
