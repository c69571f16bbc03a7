//! Parquet codec
//!
//! Decoding keeps each column's native Arrow type where the shared value
//! model has one (integers, floats, booleans, strings, dates, timestamps) and
//! falls back to Arrow's display formatting for everything else. Encoding
//! writes every column as a nullable UTF-8 column in a single row group.
//!
//! # Example
//!
//! ```no_run
//! use tabconvert::parquet::{ParquetReader, RowGroupPolicy};
//!
//! let bytes = std::fs::read("data.parquet")?;
//! let reader = ParquetReader::from_bytes(bytes.into())?;
//! println!("{:?} ({} rows)", reader.column_names(), reader.row_count());
//!
//! let table = reader.read_table(RowGroupPolicy::All)?;
//! let out = tabconvert::parquet::write_table(&table)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod reader;
pub mod writer;

pub use reader::{read_table, ParquetReader};
pub use writer::write_table;

/// Which row groups of a Parquet file are decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RowGroupPolicy {
    /// Every row group, in file order
    #[default]
    All,
    /// Only the first row group; later groups are ignored
    First,
}
