//! # tabconvert
//!
//! Convert tabular files between CSV, JSON, Excel (XLSX) and Parquet.
//!
//! Every source is decoded into a [`Table`] of named columns and ordered rows,
//! then re-encoded as the requested target. The [`Dispatcher`] routes a
//! `"<source>-to-<target>"` identifier to the converter for that source, and
//! the [`server`] module exposes the same conversions over HTTP.
//!
//! ## Quick start
//!
//! ```
//! use tabconvert::{ConversionRequest, Dispatcher};
//!
//! let dispatcher = Dispatcher::new();
//! assert!(dispatcher
//!     .list_supported_formats()
//!     .contains(&"json-to-csv".to_string()));
//!
//! let request = ConversionRequest::new(
//!     "people.json",
//!     br#"[{"name":"Alice","age":30}]"#.to_vec(),
//!     "json-to-csv",
//! );
//! let file = dispatcher.convert(&request).unwrap();
//! assert_eq!(file.content, b"name,age\r\nAlice,30\r\n");
//! assert_eq!(file.file_name, "people.csv");
//! assert_eq!(file.metadata.record_count, 1);
//! ```
//!
//! ## Formats
//!
//! - **CSV**: first record is the header, every value is read as text
//! - **JSON**: a top-level array of objects, written back pretty-printed
//! - **Excel**: first worksheet only, first row is the header
//! - **Parquet**: flat schemas; output columns are nullable UTF-8

pub mod config;
pub mod conversion;
pub mod converter;
pub mod csv_reader;
pub mod csv_writer;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod json;
pub mod logger;
pub mod parquet;
pub mod reader;
pub mod server;
pub mod types;
pub mod writer;

pub use conversion::{ConversionMetadata, ConversionRequest, ConversionResult, ConvertedFile};
pub use converter::{Converter, DecodeOptions};
pub use csv_reader::CsvReader;
pub use csv_writer::CsvWriter;
pub use dispatcher::Dispatcher;
pub use error::{ConvertError, ErrorKind, Result};
pub use format::{Format, FormatPair};
pub use self::parquet::{ParquetReader, RowGroupPolicy};
pub use reader::ExcelReader;
pub use types::{CellValue, Record, Table};
pub use writer::ExcelWriter;
