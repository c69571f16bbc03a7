//! Request and result envelopes passed through the dispatcher

use crate::error::{ConvertError, Result};
use crate::format::{output_file_name, Format};
use crate::types::Table;
use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;

/// One uploaded file plus the requested conversion
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    /// Original file name as sent by the client
    pub file_name: String,
    /// Entire upload, buffered in memory
    pub content: Bytes,
    /// `"<source>-to-<target>"` identifier, matched case-insensitively
    pub target_format: String,
    /// Per-format knobs; accepted but not read by any converter yet
    pub options: HashMap<String, String>,
}

impl ConversionRequest {
    pub fn new(
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
        target_format: impl Into<String>,
    ) -> Self {
        ConversionRequest {
            file_name: file_name.into(),
            content: content.into(),
            target_format: target_format.into(),
            options: HashMap::new(),
        }
    }

    pub fn with_options(mut self, options: HashMap<String, String>) -> Self {
        self.options = options;
        self
    }

    /// Fail unless a non-empty file was uploaded
    pub fn ensure_file_present(&self) -> Result<()> {
        if self.content.is_empty() {
            return Err(ConvertError::InvalidInput("No file uploaded".to_string()));
        }
        Ok(())
    }

    /// Normalised target format: trimmed and lower-cased
    pub fn normalized_target(&self) -> Result<String> {
        let target = self.target_format.trim().to_ascii_lowercase();
        if target.is_empty() {
            return Err(ConvertError::InvalidInput(
                "Target format is required".to_string(),
            ));
        }
        Ok(target)
    }
}

/// Row count and column names of a finished conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetadata {
    pub record_count: usize,
    pub columns: Vec<String>,
}

impl ConversionMetadata {
    pub fn from_table(table: &Table) -> Self {
        ConversionMetadata {
            record_count: table.row_count(),
            columns: table.columns.clone(),
        }
    }
}

/// Successful conversion payload
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub content: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
    pub metadata: ConversionMetadata,
}

impl ConvertedFile {
    pub fn new(content: Vec<u8>, source_name: &str, target: Format, table: &Table) -> Self {
        ConvertedFile {
            content,
            file_name: output_file_name(source_name, Some(target)),
            content_type: target.content_type(),
            metadata: ConversionMetadata::from_table(table),
        }
    }
}

/// Either the converted file or the reason it could not be produced
pub type ConversionResult = Result<ConvertedFile>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    #[test]
    fn test_request_validation() {
        let req = ConversionRequest::new("a.csv", Vec::new(), "csv-to-json");
        assert!(req.ensure_file_present().unwrap_err().is_invalid_input());

        let req = ConversionRequest::new("a.csv", b"a\n1\n".to_vec(), "  CSV-to-JSON ");
        assert!(req.ensure_file_present().is_ok());
        assert_eq!(req.normalized_target().unwrap(), "csv-to-json");

        let req = ConversionRequest::new("a.csv", b"a\n".to_vec(), "   ");
        assert!(req.normalized_target().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let table = Table::new(vec!["a".into()], vec![vec![CellValue::Int(1)]]);
        let json = serde_json::to_value(ConversionMetadata::from_table(&table)).unwrap();
        assert_eq!(json, serde_json::json!({"recordCount": 1, "columns": ["a"]}));
    }
}
