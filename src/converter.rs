//! Per-source-format converters
//!
//! A [`Converter`] owns one source decoder and the encoders for every target
//! it supports. Its capability set is fixed when it is built.

use crate::conversion::{ConversionRequest, ConversionResult, ConvertedFile};
use crate::error::{ConvertError, Result};
use crate::format::{Format, FormatPair};
use crate::parquet::RowGroupPolicy;
use crate::types::Table;
use crate::{csv_reader, csv_writer, json, parquet, reader, writer};

/// Knobs that change how a source payload is decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub parquet_row_groups: RowGroupPolicy,
}

type DecodeFn = fn(&ConversionRequest, &DecodeOptions) -> Result<Table>;
type EncodeFn = fn(&Table) -> Result<Vec<u8>>;

/// Decoder for one source format plus its target encoders
pub struct Converter {
    source: Format,
    decode: DecodeFn,
    targets: Vec<(Format, EncodeFn)>,
}

impl Converter {
    /// Converter for `source` into every other format
    pub fn for_format(source: Format) -> Self {
        let targets = Format::ALL
            .into_iter()
            .filter(|target| *target != source)
            .map(|target| (target, encoder(target)))
            .collect();

        Converter {
            source,
            decode: decoder(source),
            targets,
        }
    }

    pub fn csv() -> Self {
        Self::for_format(Format::Csv)
    }

    pub fn json() -> Self {
        Self::for_format(Format::Json)
    }

    pub fn excel() -> Self {
        Self::for_format(Format::Excel)
    }

    pub fn parquet() -> Self {
        Self::for_format(Format::Parquet)
    }

    /// Restrict this converter to the given targets
    pub fn with_targets(mut self, targets: &[Format]) -> Self {
        self.targets.retain(|(format, _)| targets.contains(format));
        self
    }

    pub fn source(&self) -> Format {
        self.source
    }

    /// Format pairs this converter handles
    pub fn pairs(&self) -> impl Iterator<Item = FormatPair> + '_ {
        self.targets
            .iter()
            .map(move |(target, _)| FormatPair::new(self.source, *target))
    }

    /// `"<source>-to-<target>"` identifiers this converter handles
    pub fn capabilities(&self) -> Vec<String> {
        self.pairs().map(|pair| pair.id()).collect()
    }

    pub fn supports(&self, id: &str) -> bool {
        self.pairs().any(|pair| pair.id() == id)
    }

    /// Decode the upload and re-encode it as `target`.
    ///
    /// Nothing is returned on failure except the error; partial output is
    /// discarded.
    pub fn convert(
        &self,
        request: &ConversionRequest,
        target: Format,
        options: &DecodeOptions,
    ) -> ConversionResult {
        request.ensure_file_present()?;

        let encode = self
            .targets
            .iter()
            .find(|(format, _)| *format == target)
            .map(|(_, encode)| *encode)
            .ok_or_else(|| {
                ConvertError::UnsupportedFormat(FormatPair::new(self.source, target).id())
            })?;

        let table = (self.decode)(request, options)?;
        let content = encode(&table)?;

        tracing::debug!(
            source = %self.source,
            target = %target,
            rows = table.row_count(),
            bytes = content.len(),
            "converted"
        );
        Ok(ConvertedFile::new(content, &request.file_name, target, &table))
    }
}

fn decoder(format: Format) -> DecodeFn {
    match format {
        Format::Csv => decode_csv,
        Format::Json => decode_json,
        Format::Excel => decode_excel,
        Format::Parquet => decode_parquet,
    }
}

fn decode_csv(request: &ConversionRequest, _: &DecodeOptions) -> Result<Table> {
    csv_reader::CsvReader::from_bytes(&request.content).read_table()
}

fn decode_json(request: &ConversionRequest, _: &DecodeOptions) -> Result<Table> {
    json::read_table(&request.content)
}

fn decode_excel(request: &ConversionRequest, _: &DecodeOptions) -> Result<Table> {
    reader::read_table(&request.content)
}

fn decode_parquet(request: &ConversionRequest, options: &DecodeOptions) -> Result<Table> {
    parquet::read_table(request.content.clone(), options.parquet_row_groups)
}

fn encoder(format: Format) -> EncodeFn {
    match format {
        Format::Csv => csv_writer::write_table,
        Format::Json => json::write_table,
        Format::Excel => writer::write_table,
        Format::Parquet => parquet::write_table,
    }
}
