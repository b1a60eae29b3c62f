use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_CORRELATION_TARGETS, DEFAULT_MAP_CACHE, DEFAULT_MMAP_THRESHOLD,
    DEFAULT_NUMERIC_COLUMNS, DEFAULT_POLLUTANT, DEFAULT_YEAR, ENV_PREFIX, RAIN_COLUMN,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Runtime settings: serde defaults, then an optional TOML file, then `AIRQ_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub numeric_columns: Vec<String>,

    #[validate(length(min = 1))]
    pub correlation_targets: Vec<String>,

    #[validate(length(min = 1))]
    pub default_pollutant: String,

    pub default_year: i32,

    pub map_cache_path: PathBuf,

    #[validate(length(equal = 1))]
    pub delimiter: String,

    pub mmap_threshold_bytes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            numeric_columns: DEFAULT_NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
            correlation_targets: DEFAULT_CORRELATION_TARGETS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            default_pollutant: DEFAULT_POLLUTANT.to_string(),
            default_year: DEFAULT_YEAR,
            map_cache_path: PathBuf::from(DEFAULT_MAP_CACHE),
            delimiter: ",".to_string(),
            mmap_threshold_bytes: DEFAULT_MMAP_THRESHOLD,
        }
    }
}

impl Settings {
    /// Load settings. An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        debug!(file = %file.display(), required, "Loading settings");

        let settings: Settings = Config::builder()
            .add_source(File::from(file).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("numeric_columns")
                    .with_list_parse_key("correlation_targets"),
            )
            .build()?
            .try_deserialize()?;

        settings.check()?;
        Ok(settings)
    }

    /// Field validation plus cross-field rules
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if !self.is_numeric(RAIN_COLUMN) {
            return Err(ProcessingError::Config(format!(
                "'{}' must be one of the numeric columns",
                RAIN_COLUMN
            )));
        }

        for target in self
            .correlation_targets
            .iter()
            .chain(std::iter::once(&self.default_pollutant))
        {
            if !self.is_numeric(target) {
                return Err(ProcessingError::Config(format!(
                    "'{}' is not one of the numeric columns",
                    target
                )));
            }
        }

        Ok(())
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == column)
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.check().is_ok());
        assert_eq!(settings.default_pollutant, "NO2");
        assert_eq!(settings.default_year, 2017);
        assert_eq!(settings.delimiter_byte(), b',');
        assert!(settings.is_numeric("PM2.5"));
        assert!(!settings.is_numeric("wd"));
    }

    #[test]
    fn test_correlation_target_must_be_numeric() {
        let settings = Settings {
            correlation_targets: vec!["wd".to_string()],
            ..Settings::default()
        };
        assert!(matches!(settings.check(), Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_rain_must_be_numeric() {
        let settings = Settings {
            numeric_columns: vec!["NO2".to_string(), "SO2".to_string(), "PM10".to_string()],
            ..Settings::default()
        };
        assert!(settings.check().is_err());
    }

    #[test]
    fn test_empty_numeric_columns_rejected() {
        let settings = Settings {
            numeric_columns: Vec::new(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.check(),
            Err(ProcessingError::Validation(_))
        ));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "default_year = 2015").unwrap();
        writeln!(file, "default_pollutant = \"SO2\"").unwrap();
        writeln!(file, "map_cache_path = \"maps/so2.html\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.default_year, 2015);
        assert_eq!(settings.default_pollutant, "SO2");
        assert_eq!(settings.map_cache_path, PathBuf::from("maps/so2.html"));
        assert_eq!(settings.numeric_columns.len(), DEFAULT_NUMERIC_COLUMNS.len());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = NamedTempFile::new().unwrap();
        let missing = temp.path().with_extension("absent.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }
}
