//! CSV decoding from an in-memory upload

use crate::error::{ConvertError, Result};
use crate::types::{CellValue, Table};

/// CSV reader over a buffered upload
///
/// The first record is the header; every following record becomes one row of
/// text cells. Values are never type-inferred.
///
/// # Examples
///
/// ```
/// use tabconvert::csv_reader::CsvReader;
///
/// let table = CsvReader::from_bytes(b"a,b\n1,x\n").read_table().unwrap();
/// assert_eq!(table.columns, vec!["a", "b"]);
/// assert_eq!(table.row_count(), 1);
/// ```
pub struct CsvReader<'a> {
    data: &'a [u8],
}

impl<'a> CsvReader<'a> {
    /// Create a reader with comma delimiter and double-quote quoting
    pub fn from_bytes(data: &'a [u8]) -> Self {
        CsvReader { data }
    }

    /// Decode the whole payload.
    ///
    /// Rows shorter than the header are padded with empty text and longer
    /// rows are truncated to the header width. Repeated header names are
    /// made unique by [`Table::new`].
    pub fn read_table(self) -> Result<Table> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(self.data);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(ConvertError::ReadError(
                "CSV input has no header row".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Vec<CellValue> = (0..columns.len())
                .map(|idx| CellValue::String(record.get(idx).unwrap_or_default().to_string()))
                .collect();
            rows.push(row);
        }

        tracing::debug!(columns = columns.len(), rows = rows.len(), "decoded CSV");
        Ok(Table::new(columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with_headers() -> Result<()> {
        let table = CsvReader::from_bytes(b"Name,Age\r\nAlice,30\r\nBob,25\r\n").read_table()?;

        assert_eq!(table.columns, vec!["Name", "Age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 0), &CellValue::from("Bob"));
        assert_eq!(table.cell(1, 1), &CellValue::from("25"));
        Ok(())
    }

    #[test]
    fn test_quoted_fields_with_newline() -> Result<()> {
        let data = b"a,b\n\"Line 1\nLine 2\",\"Say \"\"Hi\"\"\"\n";
        let table = CsvReader::from_bytes(data).read_table()?;

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, 0).as_string(), "Line 1\nLine 2");
        assert_eq!(table.cell(0, 1).as_string(), "Say \"Hi\"");
        Ok(())
    }

    #[test]
    fn test_ragged_rows() -> Result<()> {
        let table = CsvReader::from_bytes(b"a,b,c\n1\n1,2,3,4\n").read_table()?;

        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.cell(0, 2), &CellValue::from(""));
        assert_eq!(table.rows[1].len(), 3);
        Ok(())
    }

    #[test]
    fn test_header_only() -> Result<()> {
        let table = CsvReader::from_bytes(b"a,b\n").read_table()?;
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.row_count(), 0);
        Ok(())
    }

    #[test]
    fn test_no_header_is_error() {
        assert!(CsvReader::from_bytes(b"").read_table().is_err());
    }

    #[test]
    fn test_repeated_header_names() -> Result<()> {
        let table = CsvReader::from_bytes(b"a,a,b\n1,2,3\n").read_table()?;
        assert_eq!(table.columns, vec!["a", "a_2", "b"]);
        assert_eq!(table.cell(0, 1).as_string(), "2");
        Ok(())
    }
}
