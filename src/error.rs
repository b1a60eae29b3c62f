use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Required column '{column}' missing from {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Schema of {source_name} does not match the first input file")]
    SchemaMismatch { source_name: String },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Invalid date {year}-{month:02}-{day:02} {hour:02}:00")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
    },

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinate(String),

    #[error("No input files found at {0}")]
    NoInput(String),
}
