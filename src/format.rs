//! Format identifiers and the `"<source>-to-<target>"` pair syntax

use crate::error::{ConvertError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Tabular file formats the service understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Csv,
    Json,
    Excel,
    Parquet,
}

impl Format {
    /// All formats in registration order
    pub const ALL: [Format; 4] = [Format::Csv, Format::Json, Format::Excel, Format::Parquet];

    /// Identifier used in format pairs ("csv", "json", "excel", "parquet")
    pub fn name(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Excel => "excel",
            Format::Parquet => "parquet",
        }
    }

    /// Canonical file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Excel => "xlsx",
            Format::Parquet => "parquet",
        }
    }

    /// MIME type of encoded output
    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Csv => "text/csv",
            Format::Json => "application/json",
            Format::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Format::Parquet => "application/octet-stream",
        }
    }

    /// Guess a format from a file name's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            "xlsx" => Some(Format::Excel),
            "parquet" | "pq" => Some(Format::Parquet),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "excel" | "xlsx" => Ok(Format::Excel),
            "parquet" => Ok(Format::Parquet),
            other => Err(ConvertError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A `"<source>-to-<target>"` conversion identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormatPair {
    pub source: Format,
    pub target: Format,
}

impl FormatPair {
    pub fn new(source: Format, target: Format) -> Self {
        FormatPair { source, target }
    }

    /// Identifier string, e.g. `csv-to-json`
    pub fn id(&self) -> String {
        format!("{}-to-{}", self.source.name(), self.target.name())
    }
}

impl fmt::Display for FormatPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-to-{}", self.source, self.target)
    }
}

/// Build the output file name for a conversion.
///
/// Directory components are dropped and the extension is replaced with the
/// target's canonical extension (`.bin` when the target is unknown).
pub fn output_file_name(source_name: &str, target: Option<Format>) -> String {
    let extension = target.map(|t| t.extension()).unwrap_or("bin");

    // multipart clients may send either separator
    let base = source_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let stem = match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => &base[..dot],
    };
    let stem = if stem.is_empty() { "converted" } else { stem };

    format!("{}.{}", stem, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_id() {
        let pair = FormatPair::new(Format::Excel, Format::Parquet);
        assert_eq!(pair.id(), "excel-to-parquet");
        assert_eq!(pair.to_string(), pair.id());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(" XLSX ".parse::<Format>().unwrap(), Format::Excel);
        assert_eq!("parquet".parse::<Format>().unwrap(), Format::Parquet);
        let err = "yaml".parse::<Format>().unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("data.csv", Some(Format::Json)), "data.json");
        assert_eq!(output_file_name("report.v2.xlsx", Some(Format::Csv)), "report.v2.csv");
        assert_eq!(output_file_name("noext", Some(Format::Parquet)), "noext.parquet");
        assert_eq!(output_file_name("dir/sub/in.json", Some(Format::Excel)), "in.xlsx");
        assert_eq!(output_file_name("C:\\tmp\\in.json", Some(Format::Csv)), "in.csv");
        assert_eq!(output_file_name(".hidden", Some(Format::Csv)), ".hidden.csv");
        assert_eq!(output_file_name("", Some(Format::Json)), "converted.json");
        assert_eq!(output_file_name("x.csv", None), "x.bin");
    }

    #[test]
    fn test_content_types() {
        assert_eq!(Format::Json.content_type(), "application/json");
        assert_eq!(Format::Csv.content_type(), "text/csv");
        assert_eq!(Format::Parquet.content_type(), "application/octet-stream");
        assert!(Format::Excel.content_type().contains("spreadsheetml"));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Format::from_path("a/b.XLSX"), Some(Format::Excel));
        assert_eq!(Format::from_path("b.pq"), Some(Format::Parquet));
        assert_eq!(Format::from_path("b.txt"), None);
    }
}
