use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Generate default cleaned-dataset filename with format: cleaned-air-quality-{YYMMDD}.csv
pub fn generate_default_cleaned_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "cleaned-air-quality-{:02}{:02}{:02}.csv",
        year, month, day
    );
    PathBuf::from("output").join(filename)
}

/// Output format inferred from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("parquet") | Some("pq") => OutputFormat::Parquet,
            _ => OutputFormat::Csv,
        }
    }
}
