//! Parquet encoding into an in-memory buffer

use crate::error::Result;
use crate::types::Table;
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;

/// Encode a table with every column as nullable UTF-8, in one row group.
///
/// Empty cells become nulls. A table without columns still produces a valid
/// file: an empty schema and no rows.
pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    let fields: Vec<Field> = table
        .columns
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let props = WriterProperties::builder()
        .set_max_row_group_size(table.row_count().max(1))
        .build();
    let mut writer = ArrowWriter::try_new(Vec::new(), schema.clone(), Some(props))?;

    // rows without columns cannot form a batch; decoders never produce them
    if table.row_count() > 0 && !table.columns.is_empty() {
        let batch = RecordBatch::try_new(schema, string_columns(table))?;
        writer.write(&batch)?;
    }

    Ok(writer.into_inner()?)
}

// Convert rows to columnar format, looking cells up by position
fn string_columns(table: &Table) -> Vec<ArrayRef> {
    (0..table.columns.len())
        .map(|col| {
            let values: Vec<Option<String>> = (0..table.row_count())
                .map(|row| {
                    let cell = table.cell(row, col);
                    (!cell.is_empty()).then(|| cell.as_string())
                })
                .collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parquet::{ParquetReader, RowGroupPolicy};
    use crate::types::CellValue;

    #[test]
    fn test_all_columns_are_strings() -> Result<()> {
        let table = Table::new(
            vec!["n".into(), "b".into()],
            vec![
                vec![CellValue::Int(5), CellValue::Bool(true)],
                vec![CellValue::Float(1.5)],
            ],
        );
        let bytes = write_table(&table)?;

        let reader = ParquetReader::from_bytes(bytes.into())?;
        assert_eq!(reader.num_row_groups(), 1);
        assert!(reader
            .schema()
            .fields()
            .iter()
            .all(|f| f.data_type() == &DataType::Utf8));

        let decoded = reader.read_table(RowGroupPolicy::All)?;
        assert_eq!(decoded.rows[0], vec![CellValue::from("5"), CellValue::from("true")]);
        assert_eq!(decoded.rows[1], vec![CellValue::from("1.5"), CellValue::Empty]);
        Ok(())
    }

    #[test]
    fn test_header_only_table() -> Result<()> {
        let table = Table::new(vec!["a".into()], Vec::new());
        let bytes = write_table(&table)?;

        let reader = ParquetReader::from_bytes(bytes.into())?;
        assert_eq!(reader.row_count(), 0);
        let decoded = reader.read_table(RowGroupPolicy::All)?;
        assert_eq!(decoded.columns, vec!["a"]);
        assert_eq!(decoded.row_count(), 0);
        Ok(())
    }

    #[test]
    fn test_no_columns() -> Result<()> {
        let bytes = write_table(&Table::default())?;
        assert!(!bytes.is_empty());

        let reader = ParquetReader::from_bytes(bytes.into())?;
        assert!(reader.column_names().is_empty());
        assert_eq!(reader.read_table(RowGroupPolicy::All)?, Table::default());
        Ok(())
    }
}
