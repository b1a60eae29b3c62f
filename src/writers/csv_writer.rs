use crate::error::Result;
use crate::models::{Dataset, Observation};
use crate::utils::constants::{DATE_FORMAT, DEFAULT_BUFFER_SIZE};
use crate::writers::{output_columns, OutputColumn};
use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes a cleaned dataset as delimited text
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn write_dataset(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(dataset, BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))?;
        debug!(path = %path.display(), records = dataset.len(), "Wrote CSV");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, dataset: &Dataset, sink: W) -> Result<()> {
        let columns = output_columns(&dataset.schema);
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(sink);

        writer.write_record(columns.iter().map(|(name, _)| name.as_str()))?;

        let mut row = Vec::with_capacity(columns.len());
        for record in &dataset.records {
            row.clear();
            row.extend(columns.iter().map(|(_, column)| cell(record, *column)));
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Text for one cell; missing values become empty cells
fn cell(record: &Observation, column: OutputColumn) -> String {
    match column {
        OutputColumn::Station => record.station.clone(),
        OutputColumn::Year => record.year.to_string(),
        OutputColumn::Month => record.month.to_string(),
        OutputColumn::Day => record.day.to_string(),
        OutputColumn::Hour => record.hour.to_string(),
        OutputColumn::WindDirection => record.wind_direction.clone().unwrap_or_default(),
        OutputColumn::Numeric(i) => record.value(i).map(|v| v.to_string()).unwrap_or_default(),
        OutputColumn::Passthrough(i) => record.passthrough.get(i).cloned().unwrap_or_default(),
        OutputColumn::Date => record
            .date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        OutputColumn::RainCategory => record
            .rain_category
            .map(|c| c.label().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RainCategory, Schema};
    use crate::processors::DataCleaner;
    use pretty_assertions::assert_eq;

    fn dataset() -> Dataset {
        let schema = Schema {
            columns: vec![
                "No".into(),
                "year".into(),
                "month".into(),
                "day".into(),
                "hour".into(),
                "RAIN".into(),
                "NO2".into(),
                "wd".into(),
                "station".into(),
            ],
            numeric: vec!["RAIN".into(), "NO2".into()],
            passthrough: vec!["No".into()],
        };
        Dataset::new(
            schema,
            vec![
                Observation::new("Dongsi", 2017, 2, 28, 23)
                    .with_values(vec![Some(0.0), None])
                    .with_wind_direction(Some("NW"))
                    .with_passthrough(vec!["1".into()]),
                Observation::new("Dongsi", 2017, 3, 1, 0)
                    .with_values(vec![Some(1.5), None])
                    .with_wind_direction(None)
                    .with_passthrough(vec!["2".into()]),
            ],
        )
    }

    #[test]
    fn test_missing_values_are_empty_cells() {
        let mut buffer = Vec::new();
        CsvWriter::new().write_to(&dataset(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "No,year,month,day,hour,RAIN,NO2,wd,station,date,rain_cat",
                "1,2017,2,28,23,0,,NW,Dongsi,,",
                "2,2017,3,1,0,1.5,,,Dongsi,,",
            ]
        );
    }

    #[test]
    fn test_cleaned_columns_written() {
        let (cleaned, _) = DataCleaner::new().clean(dataset()).unwrap();
        assert_eq!(cleaned.records[1].rain_category, Some(RainCategory::Light));

        let mut buffer = Vec::new();
        CsvWriter::new().write_to(&cleaned, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let last = text.lines().last().unwrap();
        assert_eq!(last, "2,2017,3,1,0,1.5,,NW,Dongsi,2017-03-01 00:00:00,Light");
    }
}
