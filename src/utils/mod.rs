pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;
pub mod settings;

pub use constants::*;
pub use coordinates::{dms_to_decimal, parse_coordinate, GeographicExtent};
pub use filename::{generate_default_cleaned_filename, OutputFormat};
pub use progress::ProgressReporter;
pub use settings::Settings;
