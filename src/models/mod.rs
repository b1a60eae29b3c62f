pub mod aggregate;
pub mod observation;
pub mod rain;
pub mod selection;
pub mod station;

pub use aggregate::{
    PollutantCorrelation, RainCorrelation, StationSummary, StationYearSummary, SummaryStatistics,
};
pub use observation::{Dataset, Observation, Schema};
pub use rain::{RainBins, RainCategory};
pub use selection::{Selection, YearRange};
pub use station::StationLocation;
