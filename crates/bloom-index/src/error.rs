//! Error types for the indexing subsystem

use thiserror::Error;

/// Errors that can occur while building or loading column indexes
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Invalid false positive rate: {rate} (must be between 0 and 1, exclusive)")]
    InvalidFalsePositiveRate { rate: f64 },

    #[error("Invalid delimiter: {0:?} (must be a single ASCII character)")]
    InvalidDelimiter(String),

    #[error("Invalid column: {0:?} (columns are 1-indexed integers or 'all')")]
    InvalidColumn(String),

    #[error("Cannot open input {path}: {source}")]
    MissingInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed index artifact {artifact}: {source}")]
    Format {
        artifact: String,
        #[source]
        source: FormatError,
    },

    #[error("Row source error: {0}")]
    Source(#[from] SourceError),

    #[error("Index sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Broad classification of an [`IndexError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConfiguration,
    MissingInput,
    Format,
    Io,
}

impl IndexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFalsePositiveRate { .. }
            | Self::InvalidDelimiter(_)
            | Self::InvalidColumn(_) => ErrorKind::InvalidConfiguration,
            Self::MissingInput { .. } | Self::Sink(SinkError::NotFound(_)) => {
                ErrorKind::MissingInput
            }
            Self::Format { .. } => ErrorKind::Format,
            Self::Source(_) | Self::Sink(_) => ErrorKind::Io,
        }
    }
}

/// Errors raised while decoding a persisted filter
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("Truncated artifact: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Oversized artifact: expected {expected} bytes, got {actual}")]
    Oversized { expected: usize, actual: usize },

    #[error("Bit count must be non-zero")]
    ZeroBitCount,

    #[error("Hash function count must be non-zero")]
    ZeroHashCount,

    #[error("Bit count {0} cannot be addressed on this platform")]
    BitCountTooLarge(u64),

    #[error("Stored false positive rate {0} is outside (0, 1)")]
    InvalidFalsePositiveRate(f64),

    #[error("Header decode error: {0}")]
    Header(String),
}

/// Errors from row sources
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: u64, message: String },
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            other => Self::Parse {
                line,
                message: format!("{other:?}"),
            },
        }
    }
}

/// Errors from index sinks
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Index not found: {0}")]
    NotFound(String),

    #[error("I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
