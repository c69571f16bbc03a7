//! CSV encoding into an in-memory buffer

use crate::error::{ConvertError, Result};
use crate::types::Table;

/// CSV writer that builds the whole file in memory
///
/// Fields are quoted only when they contain the delimiter, a quote or a line
/// break; records end with CRLF.
///
/// # Examples
///
/// ```
/// use tabconvert::csv_writer::CsvWriter;
///
/// let mut writer = CsvWriter::new();
/// writer.write_row(["Name", "Age"]).unwrap();
/// writer.write_row(["Alice", "30"]).unwrap();
/// assert_eq!(writer.finish().unwrap(), b"Name,Age\r\nAlice,30\r\n");
/// ```
pub struct CsvWriter {
    inner: ::csv::Writer<Vec<u8>>,
}

impl CsvWriter {
    /// Create a writer with comma delimiter and double-quote quoting
    pub fn new() -> Self {
        let inner = ::csv::WriterBuilder::new()
            .terminator(::csv::Terminator::CRLF)
            .flexible(true)
            .from_writer(Vec::new());

        CsvWriter { inner }
    }

    /// Write a row of text fields
    pub fn write_row<I, S>(&mut self, data: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.inner.write_record(data)?;
        Ok(())
    }

    /// Write multiple rows at once
    pub fn write_rows_batch<I, R, S>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Flush and return the encoded bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        self.inner
            .into_inner()
            .map_err(|e| ConvertError::WriteError(format!("Failed to flush CSV: {}", e.error())))
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a table: header line, then one line per row.
///
/// A table without columns encodes to an empty payload.
pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    if table.columns.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = CsvWriter::new();
    writer.write_row(&table.columns)?;
    writer.write_rows_batch(table.text_rows())?;
    writer.finish()
}
