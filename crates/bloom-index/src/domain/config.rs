//! Indexing configuration and validation
//!
//! # Example
//!
//! ```
//! use bloom_index::domain::IndexConfigBuilder;
//!
//! let config = IndexConfigBuilder::new()
//!     .false_positive_rate(0.0001)
//!     .delimiter(',')
//!     .fields([1, 2])
//!     .skip_lines(1)
//!     .build()
//!     .expect("Valid config");
//! assert!(config.fields.retains(2));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Default false positive rate (0.001%)
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.00001;

/// Default number of header rows to skip
pub const DEFAULT_SKIP_LINES: usize = 1;

/// Default field delimiter
pub const DEFAULT_DELIMITER: char = ';';

/// Set of 1-indexed columns to index; empty means all columns
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnFilter(BTreeSet<usize>);

impl ColumnFilter {
    /// Index every column
    pub fn all() -> Self {
        Self::default()
    }

    /// Index only the listed columns
    pub fn only(columns: impl IntoIterator<Item = usize>) -> Self {
        Self(columns.into_iter().collect())
    }

    /// Parse `"1,2,5"` or `"all"` (case-insensitive)
    pub fn parse(arg: &str) -> Result<Self, IndexError> {
        let arg = arg.trim();
        if arg.eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }

        arg.split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<usize>()
                    .ok()
                    .filter(|&column| column > 0)
                    .ok_or_else(|| IndexError::InvalidColumn(part.to_string()))
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether values of `column` should be kept
    pub fn retains(&self, column: usize) -> bool {
        self.0.is_empty() || self.0.contains(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

/// Indexing configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Target false positive rate of every column filter, in (0, 1)
    pub false_positive_rate: f64,
    /// Header rows discarded before indexing
    pub skip_lines: usize,
    /// Single ASCII field delimiter
    pub delimiter: char,
    /// Columns to index
    pub fields: ColumnFilter,
    /// Expand domain names into all their parent suffixes
    pub expand_domains_recursively: bool,
    /// Log every value as it is inserted
    pub verbose: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            false_positive_rate: DEFAULT_FALSE_POSITIVE_RATE,
            skip_lines: DEFAULT_SKIP_LINES,
            delimiter: DEFAULT_DELIMITER,
            fields: ColumnFilter::all(),
            expand_domains_recursively: false,
            verbose: false,
        }
    }
}

impl IndexConfig {
    /// Validate before any row is read
    pub fn validate(&self) -> Result<(), IndexError> {
        let rate = self.false_positive_rate;
        if !(rate > 0.0 && rate < 1.0) {
            return Err(IndexError::InvalidFalsePositiveRate { rate });
        }

        self.delimiter_byte()?;

        if let Some(column) = self.fields.iter().find(|&column| column == 0) {
            return Err(IndexError::InvalidColumn(column.to_string()));
        }

        Ok(())
    }

    /// Delimiter as the single byte a CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, IndexError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| IndexError::InvalidDelimiter(self.delimiter.to_string()))
    }

    /// Parse a delimiter argument, which must be exactly one character
    pub fn parse_delimiter(arg: &str) -> Result<char, IndexError> {
        let mut chars = arg.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(IndexError::InvalidDelimiter(arg.to_string())),
        }
    }
}

/// Builder for IndexConfig with validation
#[derive(Default)]
pub struct IndexConfigBuilder {
    false_positive_rate: Option<f64>,
    skip_lines: Option<usize>,
    delimiter: Option<char>,
    fields: Option<ColumnFilter>,
    expand_domains_recursively: Option<bool>,
    verbose: Option<bool>,
}

impl IndexConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn false_positive_rate(mut self, rate: f64) -> Self {
        self.false_positive_rate = Some(rate);
        self
    }

    pub fn skip_lines(mut self, lines: usize) -> Self {
        self.skip_lines = Some(lines);
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Restrict indexing to the given 1-indexed columns
    pub fn fields(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.fields = Some(ColumnFilter::only(columns));
        self
    }

    pub fn column_filter(mut self, filter: ColumnFilter) -> Self {
        self.fields = Some(filter);
        self
    }

    pub fn expand_domains_recursively(mut self, enabled: bool) -> Self {
        self.expand_domains_recursively = Some(enabled);
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = Some(enabled);
        self
    }

    /// Build the IndexConfig, validating all parameters
    pub fn build(self) -> Result<IndexConfig, IndexError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation
    pub fn build_unchecked(self) -> IndexConfig {
        let defaults = IndexConfig::default();

        IndexConfig {
            false_positive_rate: self
                .false_positive_rate
                .unwrap_or(defaults.false_positive_rate),
            skip_lines: self.skip_lines.unwrap_or(defaults.skip_lines),
            delimiter: self.delimiter.unwrap_or(defaults.delimiter),
            fields: self.fields.unwrap_or(defaults.fields),
            expand_domains_recursively: self
                .expand_domains_recursively
                .unwrap_or(defaults.expand_domains_recursively),
            verbose: self.verbose.unwrap_or(defaults.verbose),
        }
    }
}
