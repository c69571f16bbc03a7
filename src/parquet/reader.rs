//! Parquet decoding from an in-memory upload

use super::RowGroupPolicy;
use crate::error::{ConvertError, Result};
use crate::types::{CellValue, Table};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::*;
use bytes::Bytes;
use chrono::NaiveDateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

/// Parquet reader over a buffered upload
///
/// The schema and row-group layout are read from the footer when the reader
/// is created; data pages are decoded by [`ParquetReader::read_table`].
pub struct ParquetReader {
    data: Bytes,
    schema: SchemaRef,
    row_count: usize,
    num_row_groups: usize,
}

impl ParquetReader {
    /// Parse the footer of a Parquet payload
    pub fn from_bytes(data: Bytes) -> Result<Self> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(data.clone())
            .map_err(|e| ConvertError::ReadError(format!("Failed to open Parquet file: {}", e)))?;

        let metadata = builder.metadata();
        let row_count = metadata.file_metadata().num_rows().try_into().unwrap_or(0);
        let num_row_groups = metadata.num_row_groups();
        let schema = builder.schema().clone();

        Ok(ParquetReader {
            data,
            schema,
            row_count,
            num_row_groups,
        })
    }

    /// Get column names from the Parquet schema
    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Get the schema of the Parquet file
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Total number of rows across all row groups
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn num_row_groups(&self) -> usize {
        self.num_row_groups
    }

    /// Decode the selected row groups into a table.
    ///
    /// Each column array is scattered into rows by position.
    pub fn read_table(&self, policy: RowGroupPolicy) -> Result<Table> {
        let columns = self.column_names();
        if self.num_row_groups == 0 || columns.is_empty() {
            return Ok(Table::new(columns, Vec::new()));
        }

        let mut builder = ParquetRecordBatchReaderBuilder::try_new(self.data.clone())?;
        if policy == RowGroupPolicy::First {
            builder = builder.with_row_groups(vec![0]);
            if self.num_row_groups > 1 {
                tracing::warn!(
                    skipped = self.num_row_groups - 1,
                    "reading first Parquet row group only"
                );
            }
        }
        let reader = builder
            .build()
            .map_err(|e| ConvertError::ReadError(format!("Failed to build reader: {}", e)))?;

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for batch in reader {
            let batch = batch
                .map_err(|e| ConvertError::ReadError(format!("Failed to read Parquet batch: {}", e)))?;
            let offset = rows.len();
            rows.extend((0..batch.num_rows()).map(|_| Vec::with_capacity(columns.len())));

            for array in batch.columns() {
                for idx in 0..batch.num_rows() {
                    rows[offset + idx].push(cell_value(array, idx)?);
                }
            }
        }

        tracing::debug!(
            columns = columns.len(),
            rows = rows.len(),
            row_groups = self.num_row_groups,
            "decoded Parquet"
        );
        Ok(Table::new(columns, rows))
    }
}

/// Decode a Parquet payload
pub fn read_table(data: Bytes, policy: RowGroupPolicy) -> Result<Table> {
    ParquetReader::from_bytes(data)?.read_table(policy)
}

macro_rules! primitive {
    ($array:expr, $ty:ty) => {
        $array.as_primitive_opt::<$ty>().ok_or_else(|| {
            ConvertError::ReadError(format!(
                "Failed to downcast to {}",
                stringify!($ty)
            ))
        })?
    };
}

fn datetime(value: Option<NaiveDateTime>) -> CellValue {
    value.map(CellValue::DateTime).unwrap_or(CellValue::Empty)
}

fn cell_value(array: &ArrayRef, idx: usize) -> Result<CellValue> {
    if array.is_null(idx) {
        return Ok(CellValue::Empty);
    }

    let value = match array.data_type() {
        DataType::Utf8 => {
            let arr = array.as_string_opt::<i32>().ok_or_else(|| {
                ConvertError::ReadError("Failed to downcast to StringArray".to_string())
            })?;
            CellValue::String(arr.value(idx).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = array.as_string_opt::<i64>().ok_or_else(|| {
                ConvertError::ReadError("Failed to downcast to LargeStringArray".to_string())
            })?;
            CellValue::String(arr.value(idx).to_string())
        }
        DataType::Boolean => {
            let arr = array.as_boolean_opt().ok_or_else(|| {
                ConvertError::ReadError("Failed to downcast to BooleanArray".to_string())
            })?;
            CellValue::Bool(arr.value(idx))
        }
        DataType::Int8 => CellValue::Int(primitive!(array, Int8Type).value(idx).into()),
        DataType::Int16 => CellValue::Int(primitive!(array, Int16Type).value(idx).into()),
        DataType::Int32 => CellValue::Int(primitive!(array, Int32Type).value(idx).into()),
        DataType::Int64 => CellValue::Int(primitive!(array, Int64Type).value(idx)),
        DataType::UInt8 => CellValue::Int(primitive!(array, UInt8Type).value(idx).into()),
        DataType::UInt16 => CellValue::Int(primitive!(array, UInt16Type).value(idx).into()),
        DataType::UInt32 => CellValue::Int(primitive!(array, UInt32Type).value(idx).into()),
        DataType::UInt64 => {
            let v = primitive!(array, UInt64Type).value(idx);
            i64::try_from(v)
                .map(CellValue::Int)
                .unwrap_or(CellValue::Float(v as f64))
        }
        DataType::Float32 => CellValue::Float(primitive!(array, Float32Type).value(idx).into()),
        DataType::Float64 => CellValue::Float(primitive!(array, Float64Type).value(idx)),
        DataType::Date32 => datetime(primitive!(array, Date32Type).value_as_datetime(idx)),
        DataType::Date64 => datetime(primitive!(array, Date64Type).value_as_datetime(idx)),
        DataType::Timestamp(TimeUnit::Second, _) => {
            datetime(primitive!(array, TimestampSecondType).value_as_datetime(idx))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            datetime(primitive!(array, TimestampMillisecondType).value_as_datetime(idx))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            datetime(primitive!(array, TimestampMicrosecondType).value_as_datetime(idx))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            datetime(primitive!(array, TimestampNanosecondType).value_as_datetime(idx))
        }
        _ => arrow::util::display::array_value_to_string(array, idx)
            .map(CellValue::String)
            .map_err(|e| ConvertError::ReadError(e.to_string()))?,
    };

    Ok(value)
}
