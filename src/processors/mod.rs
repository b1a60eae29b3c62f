pub mod aggregator;
pub mod categorical_fill;
pub mod cleaner;
pub mod integrity_checker;
pub mod interpolator;

pub use aggregator::{pearson, rank_by_sum, Aggregator};
pub use cleaner::{CleaningReport, DataCleaner};
pub use integrity_checker::{IntegrityChecker, IntegrityReport};
pub use interpolator::{interpolate, interpolate_both_ways, Direction};
