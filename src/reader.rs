//! Excel (XLSX) decoding from an in-memory upload
//!
//! Only the first worksheet is read. Its first used row is the header and
//! every later non-blank row becomes one data row. Cells keep their native
//! spreadsheet type so JSON output can carry numbers, booleans and dates.

use crate::error::{ConvertError, Result};
use crate::types::{CellValue, Table};
use calamine::{Data, Range, Reader, Xlsx};
use chrono::NaiveDateTime;
use std::io::Cursor;

/// Excel reader over a buffered upload
///
/// # Example
///
/// ```no_run
/// use tabconvert::reader::ExcelReader;
///
/// let bytes = std::fs::read("workbook.xlsx")?;
/// let mut reader = ExcelReader::from_bytes(&bytes)?;
/// for sheet_name in reader.sheet_names() {
///     println!("Sheet: {}", sheet_name);
/// }
/// let table = reader.read_table()?;
/// println!("{} rows", table.row_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ExcelReader<'a> {
    workbook: Xlsx<Cursor<&'a [u8]>>,
}

impl<'a> ExcelReader<'a> {
    /// Open an XLSX workbook held in memory
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        let workbook = Xlsx::new(Cursor::new(data))?;
        Ok(ExcelReader { workbook })
    }

    /// Get list of sheet names
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Read all non-blank rows of a sheet, header included
    pub fn rows_by_index(&mut self, sheet_index: usize) -> Result<Vec<Vec<CellValue>>> {
        let range = self.range_at(sheet_index)?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
            .filter(|row| !row.iter().all(CellValue::is_empty))
            .collect())
    }

    /// Decode the first worksheet into a table.
    ///
    /// An empty worksheet yields a table with no columns and no rows.
    pub fn read_table(&mut self) -> Result<Table> {
        let mut rows = self.rows_by_index(0)?.into_iter();

        let columns: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(CellValue::as_string).collect(),
            None => return Ok(Table::default()),
        };
        let rows: Vec<Vec<CellValue>> = rows.collect();

        tracing::debug!(columns = columns.len(), rows = rows.len(), "decoded worksheet");
        Ok(Table::new(columns, rows))
    }

    fn range_at(&mut self, sheet_index: usize) -> Result<Range<Data>> {
        let sheet_count = self.workbook.sheet_names().len();
        self.workbook
            .worksheet_range_at(sheet_index)
            .ok_or_else(|| {
                ConvertError::ReadError(format!(
                    "Sheet index {} out of bounds. Available: {} sheets",
                    sheet_index, sheet_count
                ))
            })?
            .map_err(ConvertError::from)
    }
}

/// Decode the first worksheet of an XLSX payload
pub fn read_table(data: &[u8]) -> Result<Table> {
    ExcelReader::from_bytes(data)?.read_table()
}

// Map a spreadsheet cell onto the shared value type
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                dt.as_duration()
                    .map(CellValue::Duration)
                    .unwrap_or(CellValue::Float(dt.as_f64()))
            } else {
                dt.as_datetime()
                    .map(CellValue::DateTime)
                    .unwrap_or(CellValue::Float(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
        #[allow(unreachable_patterns)]
        other => CellValue::String(other.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
