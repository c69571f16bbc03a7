//! Error types for conversion

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Broad category of a conversion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing file, blank or unsupported target format
    InvalidInput,
    /// Source payload could not be decoded
    DecodeFailure,
    /// Decoded data could not be written in the target format
    EncodeFailure,
}

/// Errors raised while decoding or encoding tabular data
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Read error: {0}")]
    ReadError(String),

    #[error("Write error: {0}")]
    WriteError(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Classify the error for the caller
    ///
    /// Library errors raised while writing (`rust_xlsxwriter`) or while
    /// building Arrow batches count as encode failures; everything else the
    /// codecs raise is a decode failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::InvalidInput(_) | ConvertError::UnsupportedFormat(_) => {
                ErrorKind::InvalidInput
            }
            ConvertError::WriteError(_) | ConvertError::ExcelWrite(_) | ConvertError::Arrow(_) => {
                ErrorKind::EncodeFailure
            }
            ConvertError::ReadError(_)
            | ConvertError::Csv(_)
            | ConvertError::Json(_)
            | ConvertError::ExcelRead(_)
            | ConvertError::Parquet(_)
            | ConvertError::Io(_) => ErrorKind::DecodeFailure,
        }
    }

    /// True for errors raised before any converter ran
    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}
