pub mod csv_writer;
pub mod map_writer;
pub mod parquet_writer;

pub use csv_writer::CsvWriter;
pub use map_writer::{MapCache, MapOutcome, MapWriter};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

use crate::models::Schema;
use crate::utils::constants::{
    DATE_COLUMN, DAY_COLUMN, HOUR_COLUMN, MONTH_COLUMN, RAIN_CATEGORY_COLUMN, STATION_COLUMN,
    WIND_DIRECTION_COLUMN, YEAR_COLUMN,
};

/// Where an output column's value lives on an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputColumn {
    Station,
    Year,
    Month,
    Day,
    Hour,
    WindDirection,
    Numeric(usize),
    Passthrough(usize),
    Date,
    RainCategory,
}

/// Input columns in file order, followed by `date` and `rain_cat`
pub(crate) fn output_columns(schema: &Schema) -> Vec<(String, OutputColumn)> {
    let mut columns: Vec<(String, OutputColumn)> = schema
        .columns
        .iter()
        .filter_map(|name| {
            let column = match name.as_str() {
                STATION_COLUMN => OutputColumn::Station,
                YEAR_COLUMN => OutputColumn::Year,
                MONTH_COLUMN => OutputColumn::Month,
                DAY_COLUMN => OutputColumn::Day,
                HOUR_COLUMN => OutputColumn::Hour,
                WIND_DIRECTION_COLUMN => OutputColumn::WindDirection,
                other => schema
                    .numeric_index(other)
                    .map(OutputColumn::Numeric)
                    .or_else(|| schema.passthrough_index(other).map(OutputColumn::Passthrough))?,
            };
            Some((name.clone(), column))
        })
        .collect();

    columns.push((DATE_COLUMN.to_string(), OutputColumn::Date));
    columns.push((RAIN_CATEGORY_COLUMN.to_string(), OutputColumn::RainCategory));
    columns
}
