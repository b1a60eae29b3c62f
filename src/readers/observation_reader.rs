use crate::error::{ProcessingError, Result};
use crate::models::{Dataset, Observation, Schema};
use crate::utils::constants::{
    DATE_COLUMN, DAY_COLUMN, DEFAULT_MMAP_THRESHOLD, DEFAULT_NUMERIC_COLUMNS, HOUR_COLUMN,
    MONTH_COLUMN, RAIN_CATEGORY_COLUMN, RAIN_COLUMN, REQUIRED_COLUMNS, STATION_COLUMN,
    WIND_DIRECTION_COLUMN, YEAR_COLUMN,
};
use crate::utils::Settings;
use csv::{ReaderBuilder, StringRecord, Trim};
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use validator::Validate;

/// Tokens treated as a missing cell
const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Header positions resolved once per file
struct ColumnMap {
    station: usize,
    year: usize,
    month: usize,
    day: usize,
    hour: usize,
    wind_direction: usize,
    rain: usize,
    numeric: Vec<usize>,
    passthrough: Vec<usize>,
}

pub struct ObservationReader {
    numeric_columns: Vec<String>,
    delimiter: u8,
    mmap_threshold: u64,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            numeric_columns: DEFAULT_NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
            delimiter: b',',
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            numeric_columns: settings.numeric_columns.clone(),
            delimiter: settings.delimiter_byte(),
            mmap_threshold: settings.mmap_threshold_bytes,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    /// Read one delimited file. Large files are memory-mapped.
    pub fn read_path(&self, path: &Path) -> Result<Dataset> {
        let source_name = path.display().to_string();
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        if size >= self.mmap_threshold && size > 0 {
            debug!(file = %source_name, size, "Memory-mapping input file");
            let mmap = unsafe { Mmap::map(&file)? };
            self.read_bytes(&mmap, &source_name)
        } else {
            let mut buffer = Vec::with_capacity(size as usize);
            let mut file = file;
            file.read_to_end(&mut buffer)?;
            self.read_bytes(&buffer, &source_name)
        }
    }

    /// Parse raw file contents. Non-UTF-8 input is decoded as Windows-1252.
    pub fn read_bytes(&self, bytes: &[u8], source_name: &str) -> Result<Dataset> {
        let text: Cow<'_, str> = match std::str::from_utf8(bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => {
                warn!(source = source_name, "Input is not UTF-8, decoding as Windows-1252");
                let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
                decoded
            }
        };
        let content: &str = text.strip_prefix('\u{feff}').unwrap_or(&*text);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let (schema, columns) = self.resolve_columns(&headers, source_name)?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            // Header is line 1
            let line = row + 2;
            records.push(self.parse_record(&record, &columns, source_name, line)?);
        }

        debug!(source = source_name, records = records.len(), "Read observations");
        Ok(Dataset::new(schema, records))
    }

    fn resolve_columns(
        &self,
        headers: &StringRecord,
        source_name: &str,
    ) -> Result<(Schema, ColumnMap)> {
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ProcessingError::MissingColumn {
                    column: name.to_string(),
                    source_name: source_name.to_string(),
                })
        };

        for required in REQUIRED_COLUMNS {
            position(*required)?;
        }

        let fixed = [
            STATION_COLUMN,
            YEAR_COLUMN,
            MONTH_COLUMN,
            DAY_COLUMN,
            HOUR_COLUMN,
            WIND_DIRECTION_COLUMN,
        ];

        let mut columns = Vec::new();
        let mut numeric = Vec::new();
        let mut numeric_names = Vec::new();
        let mut passthrough = Vec::new();
        let mut passthrough_names = Vec::new();

        for (i, header) in headers.iter().enumerate() {
            if header == DATE_COLUMN || header == RAIN_CATEGORY_COLUMN {
                continue;
            }
            columns.push(header.to_string());

            if fixed.contains(&header) {
                continue;
            }
            if self.numeric_columns.iter().any(|c| c == header) {
                numeric.push(i);
                numeric_names.push(header.to_string());
            } else {
                passthrough.push(i);
                passthrough_names.push(header.to_string());
            }
        }

        let rain_offset = numeric_names
            .iter()
            .position(|c| c == RAIN_COLUMN)
            .ok_or_else(|| ProcessingError::MissingColumn {
                column: RAIN_COLUMN.to_string(),
                source_name: source_name.to_string(),
            })?;

        let map = ColumnMap {
            station: position(STATION_COLUMN)?,
            year: position(YEAR_COLUMN)?,
            month: position(MONTH_COLUMN)?,
            day: position(DAY_COLUMN)?,
            hour: position(HOUR_COLUMN)?,
            wind_direction: position(WIND_DIRECTION_COLUMN)?,
            rain: rain_offset,
            numeric,
            passthrough,
        };

        let schema = Schema {
            columns,
            numeric: numeric_names,
            passthrough: passthrough_names,
        };

        Ok((schema, map))
    }

    fn parse_record(
        &self,
        record: &StringRecord,
        columns: &ColumnMap,
        source_name: &str,
        line: usize,
    ) -> Result<Observation> {
        let field = |i: usize| record.get(i).unwrap_or("");

        let integer = |i: usize, name: &str| -> Result<i64> {
            parse_integer(field(i)).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "{} line {}: invalid {} value '{}'",
                    source_name,
                    line,
                    name,
                    field(i)
                ))
            })
        };

        let year = integer(columns.year, YEAR_COLUMN)?;
        let month = integer(columns.month, MONTH_COLUMN)?;
        let day = integer(columns.day, DAY_COLUMN)?;
        let hour = integer(columns.hour, HOUR_COLUMN)?;

        let (year, month, day, hour) = match (
            i32::try_from(year),
            u32::try_from(month),
            u32::try_from(day),
            u32::try_from(hour),
        ) {
            (Ok(y), Ok(m), Ok(d), Ok(h)) => (y, m, d, h),
            _ => {
                return Err(ProcessingError::InvalidFormat(format!(
                    "{} line {}: date parts out of range",
                    source_name, line
                )))
            }
        };

        let mut values: Vec<Option<f64>> = columns
            .numeric
            .iter()
            .map(|&i| parse_numeric(field(i)))
            .collect();

        if let Some(rain) = values[columns.rain] {
            if rain < 0.0 {
                debug!(source = source_name, line, rain, "Negative rainfall treated as missing");
                values[columns.rain] = None;
            }
        }

        let wind_direction = field(columns.wind_direction);
        let wind_direction = (!is_missing(wind_direction)).then_some(wind_direction);

        let observation = Observation::new(field(columns.station), year, month, day, hour)
            .with_values(values)
            .with_wind_direction(wind_direction)
            .with_passthrough(
                columns
                    .passthrough
                    .iter()
                    .map(|&i| field(i).to_string())
                    .collect(),
            );

        observation.validate().map_err(|e| {
            ProcessingError::InvalidFormat(format!("{} line {}: {}", source_name, line, e))
        })?;

        Ok(observation)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value.trim())
}

/// Coerce a cell to a number; anything unparseable is missing.
pub fn parse_numeric(value: &str) -> Option<f64> {
    if is_missing(value) {
        return None;
    }
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integers may arrive as "2013" or "2013.0"
fn parse_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}
