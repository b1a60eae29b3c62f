use crate::error::Result;
use crate::models::{Dataset, Observation};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use crate::writers::{output_columns, OutputColumn};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(crate::error::ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write a cleaned dataset to a Parquet file
    pub fn write_dataset(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        self.write_dataset_batched(dataset, path, self.row_group_size)
    }

    /// Write the dataset in record batches of `batch_size` rows
    pub fn write_dataset_batched(
        &self,
        dataset: &Dataset,
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        let columns = output_columns(&dataset.schema);
        let schema = self.create_schema(&columns);

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in dataset.records.chunks(batch_size.max(1)) {
            let batch = self.records_to_batch(chunk, &columns, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        debug!(path = %path.display(), records = dataset.len(), "Wrote Parquet");
        Ok(())
    }

    /// Arrow schema mirroring the cleaned column layout
    fn create_schema(&self, columns: &[(String, OutputColumn)]) -> Arc<Schema> {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, column)| match column {
                OutputColumn::Station => Field::new(name, DataType::Utf8, false),
                OutputColumn::Year => Field::new(name, DataType::Int32, false),
                OutputColumn::Month | OutputColumn::Day | OutputColumn::Hour => {
                    Field::new(name, DataType::UInt32, false)
                }
                OutputColumn::WindDirection | OutputColumn::RainCategory => {
                    Field::new(name, DataType::Utf8, true)
                }
                OutputColumn::Numeric(_) => Field::new(name, DataType::Float64, true),
                OutputColumn::Passthrough(_) => Field::new(name, DataType::Utf8, false),
                OutputColumn::Date => {
                    Field::new(name, DataType::Timestamp(TimeUnit::Second, None), true)
                }
            })
            .collect();

        Arc::new(Schema::new(fields))
    }

    /// Convert observations to an Arrow RecordBatch
    fn records_to_batch(
        &self,
        records: &[Observation],
        columns: &[(String, OutputColumn)],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let arrays: Vec<ArrayRef> = columns
            .iter()
            .map(|(_, column)| column_array(records, *column))
            .collect();

        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let columns = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            let rg_metadata = metadata.row_group(i);
            row_group_sizes.push(rg_metadata.num_rows());
        }

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            columns,
            file_size,
            compression: self.compression,
        })
    }
}

fn column_array(records: &[Observation], column: OutputColumn) -> ArrayRef {
    match column {
        OutputColumn::Station => Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.station.as_str()),
        )),
        OutputColumn::Year => Arc::new(Int32Array::from_iter_values(records.iter().map(|r| r.year))),
        OutputColumn::Month => {
            Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.month)))
        }
        OutputColumn::Day => Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.day))),
        OutputColumn::Hour => {
            Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.hour)))
        }
        OutputColumn::WindDirection => Arc::new(StringArray::from_iter(
            records.iter().map(|r| r.wind_direction.as_deref()),
        )),
        OutputColumn::Numeric(i) => {
            Arc::new(Float64Array::from_iter(records.iter().map(|r| r.value(i))))
        }
        OutputColumn::Passthrough(i) => Arc::new(StringArray::from_iter_values(
            records
                .iter()
                .map(|r| r.passthrough.get(i).map_or("", String::as_str)),
        )),
        OutputColumn::Date => Arc::new(TimestampSecondArray::from_iter(
            records
                .iter()
                .map(|r| r.date.map(|d| d.and_utc().timestamp())),
        )),
        OutputColumn::RainCategory => Arc::new(StringArray::from_iter(
            records.iter().map(|r| r.rain_category.map(|c| c.label())),
        )),
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub columns: Vec<String>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups == 0 {
            0.0
        } else {
            self.total_rows as f64 / self.row_groups as f64
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Columns: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.columns.len(),
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
            avg_rows
        )
    }
}
