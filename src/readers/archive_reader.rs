use crate::error::Result;
use crate::models::Dataset;
use crate::readers::ObservationReader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Reads every `*.csv` entry of a zip archive, in entry-name order.
pub struct ArchiveReader<'a> {
    reader: &'a ObservationReader,
}

impl<'a> ArchiveReader<'a> {
    pub fn new(reader: &'a ObservationReader) -> Self {
        Self { reader }
    }

    /// CSV entry names, sorted
    pub fn list_csv_entries(zip_path: &Path) -> Result<Vec<String>> {
        let file = File::open(zip_path)?;
        let archive = ZipArchive::new(file)?;

        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| is_csv_name(name) && !is_hidden_entry(name))
            .map(|name| name.to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn read_archive(&self, zip_path: &Path) -> Result<Vec<(String, Dataset)>> {
        let names = Self::list_csv_entries(zip_path)?;
        let file = File::open(zip_path)?;
        let mut archive = ZipArchive::new(file)?;
        let mut datasets = Vec::with_capacity(names.len());

        for name in names {
            let mut entry = archive.by_name(&name)?;
            let mut buffer = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut buffer)?;

            let source_name = format!("{}:{}", zip_path.display(), name);
            debug!(entry = %source_name, bytes = buffer.len(), "Reading archive entry");
            let dataset = self.reader.read_bytes(&buffer, &source_name)?;
            datasets.push((source_name, dataset));
        }

        Ok(datasets)
    }
}

pub(crate) fn is_csv_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".csv")
}

/// macOS archives carry `__MACOSX/._foo.csv` resource forks
fn is_hidden_entry(name: &str) -> bool {
    name.starts_with("__MACOSX/")
        || name
            .rsplit('/')
            .next()
            .is_some_and(|base| base.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use zip::write::FileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const HEADER: &str = "year,month,day,hour,RAIN,NO2,SO2,PM10,wd,station\n";

    fn build_archive() -> NamedTempFile {
        let temp = NamedTempFile::new().unwrap();
        {
            let mut zip = ZipWriter::new(temp.reopen().unwrap());
            let options = FileOptions::default().compression_method(CompressionMethod::Stored);

            zip.start_file("PRSA_Data/PRSA_Data_B.csv", options).unwrap();
            zip.write_all(format!("{}2013,3,1,0,0,2,2,2,N,B\n", HEADER).as_bytes())
                .unwrap();

            zip.start_file("PRSA_Data/PRSA_Data_A.csv", options).unwrap();
            zip.write_all(format!("{}2013,3,1,0,0,1,1,1,N,A\n", HEADER).as_bytes())
                .unwrap();

            zip.start_file("__MACOSX/PRSA_Data/._PRSA_Data_A.csv", options)
                .unwrap();
            zip.write_all(b"junk").unwrap();

            zip.start_file("README.txt", options).unwrap();
            zip.write_all(b"readme").unwrap();

            zip.finish().unwrap();
        }
        temp
    }

    #[test]
    fn test_list_csv_entries() {
        let archive = build_archive();
        let names = ArchiveReader::list_csv_entries(archive.path()).unwrap();
        assert_eq!(
            names,
            vec![
                "PRSA_Data/PRSA_Data_A.csv".to_string(),
                "PRSA_Data/PRSA_Data_B.csv".to_string()
            ]
        );
    }

    #[test]
    fn test_read_archive_in_name_order() {
        let archive = build_archive();
        let reader = ObservationReader::new();
        let datasets = ArchiveReader::new(&reader)
            .read_archive(archive.path())
            .unwrap();

        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].1.records[0].station, "A");
        assert_eq!(datasets[1].1.records[0].station, "B");
    }

    #[test]
    fn test_is_hidden_entry() {
        assert!(is_hidden_entry("__MACOSX/x.csv"));
        assert!(is_hidden_entry("dir/.hidden.csv"));
        assert!(!is_hidden_entry("dir/data.csv"));
    }
}
