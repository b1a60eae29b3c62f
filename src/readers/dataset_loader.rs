use crate::error::{ProcessingError, Result};
use crate::models::Dataset;
use crate::readers::archive_reader::is_csv_name;
use crate::readers::{ArchiveReader, ObservationReader};
use crate::utils::progress::ProgressReporter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the observations come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Directory(PathBuf),
    Archive(PathBuf),
}

impl InputSource {
    pub fn detect(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ProcessingError::NoInput(path.display().to_string()));
        }

        if path.is_dir() {
            return Ok(InputSource::Directory(path.to_path_buf()));
        }

        let is_zip = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"));

        if is_zip {
            Ok(InputSource::Archive(path.to_path_buf()))
        } else {
            Ok(InputSource::File(path.to_path_buf()))
        }
    }
}

/// Ingests one file, a directory of CSV files, or a zip archive into a single dataset.
pub struct DatasetLoader {
    reader: ObservationReader,
}

impl DatasetLoader {
    pub fn new(reader: ObservationReader) -> Self {
        Self { reader }
    }

    pub fn load(&self, path: &Path, progress: Option<&ProgressReporter>) -> Result<Dataset> {
        let parts = match InputSource::detect(path)? {
            InputSource::File(file) => {
                let source_name = file.display().to_string();
                vec![(source_name, self.reader.read_path(&file)?)]
            }
            InputSource::Directory(dir) => {
                let files = Self::list_csv_files(&dir)?;
                if let Some(p) = progress {
                    p.set_message(&format!("Reading {} files...", files.len()));
                }

                let mut parts = Vec::with_capacity(files.len());
                for file in files {
                    let dataset = self.reader.read_path(&file)?;
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    parts.push((file.display().to_string(), dataset));
                }
                parts
            }
            InputSource::Archive(zip_path) => {
                if let Some(p) = progress {
                    p.set_message("Reading archive...");
                }
                ArchiveReader::new(&self.reader).read_archive(&zip_path)?
            }
        };

        let dataset = concatenate(parts, path)?;
        info!(
            records = dataset.len(),
            stations = dataset.station_rows().len(),
            "Loaded observations"
        );
        Ok(dataset)
    }

    /// `*.csv` files directly inside the directory, sorted by file name
    pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_csv = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_csv_name);
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Concatenate per-file datasets in order, without deduplication.
pub fn concatenate(parts: Vec<(String, Dataset)>, origin: &Path) -> Result<Dataset> {
    let mut parts = parts.into_iter();
    let (_, mut combined) = parts
        .next()
        .ok_or_else(|| ProcessingError::NoInput(origin.display().to_string()))?;

    for (source_name, dataset) in parts {
        if dataset.schema != combined.schema {
            return Err(ProcessingError::SchemaMismatch { source_name });
        }
        combined.records.extend(dataset.records);
    }

    Ok(combined)
}
