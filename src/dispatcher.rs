//! Routes conversion requests to the converter for their format pair

use crate::conversion::{ConversionRequest, ConversionResult};
use crate::converter::{Converter, DecodeOptions};
use crate::error::ConvertError;
use crate::format::Format;
use std::collections::{BTreeSet, HashMap};

/// Registry of converters with a route table resolved at construction
///
/// # Example
///
/// ```
/// use tabconvert::{ConversionRequest, Dispatcher};
///
/// let dispatcher = Dispatcher::new();
/// let request = ConversionRequest::new("data.csv", b"a,b\n1,x\n".to_vec(), "csv-to-json");
/// let file = dispatcher.convert(&request).unwrap();
/// assert_eq!(file.file_name, "data.json");
/// ```
pub struct Dispatcher {
    converters: Vec<Converter>,
    routes: HashMap<String, (usize, Format)>,
    options: DecodeOptions,
}

impl Dispatcher {
    /// Dispatcher with the CSV, JSON, Excel and Parquet converters
    pub fn new() -> Self {
        Self::with_converters(vec![
            Converter::csv(),
            Converter::json(),
            Converter::excel(),
            Converter::parquet(),
        ])
    }

    /// Dispatcher over a custom registry.
    ///
    /// When two converters claim the same pair, the one registered first
    /// handles it.
    pub fn with_converters(converters: Vec<Converter>) -> Self {
        let mut routes = HashMap::new();
        for (idx, converter) in converters.iter().enumerate() {
            for pair in converter.pairs() {
                routes.entry(pair.id()).or_insert((idx, pair.target));
            }
        }

        Dispatcher {
            converters,
            routes,
            options: DecodeOptions::default(),
        }
    }

    /// Set decode options applied to every request
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Sorted, deduplicated union of every converter's capabilities
    pub fn list_supported_formats(&self) -> Vec<String> {
        self.converters
            .iter()
            .flat_map(Converter::capabilities)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Validate the request and hand it to the matching converter.
    ///
    /// Missing content and a blank or unknown target format are reported as
    /// invalid input without running any converter; otherwise the
    /// converter's result is returned unchanged.
    pub fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        request.ensure_file_present()?;
        let target_format = request.normalized_target()?;

        let (idx, target) = *self
            .routes
            .get(&target_format)
            .ok_or_else(|| ConvertError::UnsupportedFormat(target_format.clone()))?;

        let _span = tracing::info_span!(
            "convert",
            format = %target_format,
            file = %request.file_name,
            size = request.content.len()
        )
        .entered();

        self.converters[idx].convert(request, target, &self.options)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_formats_sorted_and_unique() {
        let formats = Dispatcher::new().list_supported_formats();
        assert_eq!(formats.len(), 12);

        let mut sorted = formats.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(formats, sorted);
        assert!(formats.contains(&"excel-to-parquet".to_string()));
    }

    #[test]
    fn test_duplicates_collapse() {
        let dispatcher = Dispatcher::with_converters(vec![
            Converter::csv().with_targets(&[Format::Json]),
            Converter::csv(),
        ]);
        assert_eq!(
            dispatcher.list_supported_formats(),
            vec!["csv-to-excel", "csv-to-json", "csv-to-parquet"]
        );
    }

    #[test]
    fn test_empty_registry() {
        let dispatcher = Dispatcher::with_converters(Vec::new());
        assert!(dispatcher.list_supported_formats().is_empty());

        let request = ConversionRequest::new("a.csv", b"a\n".to_vec(), "csv-to-json");
        assert!(dispatcher.convert(&request).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_unsupported_format() {
        let request = ConversionRequest::new("a.csv", b"a\n1\n".to_vec(), "csv-to-yaml");
        let err = Dispatcher::new().convert(&request).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(ref id) if id == "csv-to-yaml"));
    }

    #[test]
    fn test_case_insensitive_target() {
        let request = ConversionRequest::new("a.csv", b"a\n1\n".to_vec(), " CSV-To-Json ");
        let file = Dispatcher::new().convert(&request).unwrap();
        assert_eq!(file.content_type, "application/json");
    }

    #[test]
    fn test_missing_file_rejected_first() {
        // the unsupported format would fail too; the empty upload wins
        let request = ConversionRequest::new("a.csv", Vec::new(), "csv-to-yaml");
        let err = Dispatcher::new().convert(&request).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidInput(_)));
    }
}
