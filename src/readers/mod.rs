pub mod archive_reader;
pub mod dataset_loader;
pub mod location_reader;
pub mod observation_reader;

pub use archive_reader::ArchiveReader;
pub use dataset_loader::{DatasetLoader, InputSource};
pub use location_reader::LocationReader;
pub use observation_reader::ObservationReader;
