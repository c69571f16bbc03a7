//! Excel (XLSX) encoding into an in-memory buffer

use crate::error::{ConvertError, Result};
use crate::types::{CellValue, Table};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

/// Name of the single sheet every converted workbook carries
pub const SHEET_NAME: &str = "Sheet1";

/// Excel writer that builds one worksheet in memory
///
/// # Examples
///
/// ```
/// use tabconvert::types::CellValue;
/// use tabconvert::writer::ExcelWriter;
///
/// let mut writer = ExcelWriter::new().unwrap();
/// writer.write_header(["Name", "Age"]).unwrap();
/// writer.write_row_typed(&["Alice".into(), CellValue::Int(30)]).unwrap();
/// let bytes = writer.finish().unwrap();
/// assert!(!bytes.is_empty());
/// ```
pub struct ExcelWriter {
    workbook: Workbook,
    current_sheet: Worksheet,
    current_row: u32,
}

impl ExcelWriter {
    /// Create a writer with an empty "Sheet1"
    pub fn new() -> Result<Self> {
        let mut current_sheet = Worksheet::new();
        current_sheet.set_name(SHEET_NAME)?;

        Ok(ExcelWriter {
            workbook: Workbook::new(),
            current_sheet,
            current_row: 0,
        })
    }

    /// Write header row in bold
    pub fn write_header<I, S>(&mut self, headers: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let format = Format::new().set_bold();
        for (col, header) in headers.into_iter().enumerate() {
            self.current_sheet.write_string_with_format(
                self.current_row,
                column_index(col)?,
                header.as_ref(),
                &format,
            )?;
        }
        self.current_row += 1;
        Ok(())
    }

    /// Write a row keeping numbers and booleans as native cells
    pub fn write_row_typed(&mut self, cells: &[CellValue]) -> Result<()> {
        for (col, cell) in cells.iter().enumerate() {
            self.write_cell(self.current_row, column_index(col)?, cell)?;
        }
        self.current_row += 1;
        Ok(())
    }

    /// Write a row as text, leaving empty values blank
    pub fn write_row_text(&mut self, cells: &[CellValue]) -> Result<()> {
        for (col, cell) in cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            self.current_sheet
                .write_string(self.current_row, column_index(col)?, cell.as_string())?;
        }
        self.current_row += 1;
        Ok(())
    }

    fn write_cell(&mut self, row: u32, col: u16, value: &CellValue) -> Result<()> {
        let sheet = &mut self.current_sheet;
        match value {
            CellValue::Empty => {}
            CellValue::String(s) => {
                sheet.write_string(row, col, s)?;
            }
            CellValue::Int(i) => {
                sheet.write_number(row, col, *i as f64)?;
            }
            CellValue::Float(f) => {
                sheet.write_number(row, col, *f)?;
            }
            CellValue::Bool(b) => {
                sheet.write_boolean(row, col, *b)?;
            }
            CellValue::DateTime(_) | CellValue::Duration(_) => {
                sheet.write_string(row, col, value.as_string())?;
            }
        }
        Ok(())
    }

    /// Finish the workbook and return the XLSX bytes
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.workbook.push_worksheet(self.current_sheet);
        Ok(self.workbook.save_to_buffer()?)
    }
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| ConvertError::WriteError(format!("Column {} exceeds the sheet width", col)))
}

/// Encode a table into "Sheet1": header at A1, rows below, all text cells
pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    let mut writer = ExcelWriter::new()?;
    if !table.columns.is_empty() {
        writer.write_header(&table.columns)?;
    }
    for row in 0..table.row_count() {
        let cells: Vec<CellValue> = (0..table.columns.len())
            .map(|col| table.cell(row, col).clone())
            .collect();
        writer.write_row_text(&cells)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ExcelReader;

    #[test]
    fn test_write_table_layout() -> Result<()> {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![CellValue::Int(1), "x".into()],
                vec![CellValue::Bool(true), CellValue::Empty],
            ],
        );
        let bytes = write_table(&table)?;

        let mut reader = ExcelReader::from_bytes(&bytes)?;
        assert_eq!(reader.sheet_names(), vec![SHEET_NAME]);
        let rows = reader.rows_by_index(0)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![CellValue::from("a"), CellValue::from("b")]);
        assert_eq!(rows[1][0], CellValue::from("1"));
        assert_eq!(rows[2][0], CellValue::from("true"));
        assert_eq!(rows[2][1], CellValue::Empty);
        Ok(())
    }

    #[test]
    fn test_typed_rows_keep_native_cells() -> Result<()> {
        let mut writer = ExcelWriter::new()?;
        writer.write_header(["ID", "Ok"])?;
        writer.write_row_typed(&[CellValue::Int(7), CellValue::Bool(false)])?;
        let bytes = writer.finish()?;

        let rows = ExcelReader::from_bytes(&bytes)?.rows_by_index(0)?;
        assert_eq!(rows[1], vec![CellValue::Float(7.0), CellValue::Bool(false)]);
        Ok(())
    }

    #[test]
    fn test_column_limit() {
        assert!(column_index(70_000).is_err());
        assert_eq!(column_index(3).unwrap(), 3);
    }
}
