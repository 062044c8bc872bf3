//! CSV Row Source Adapter
//!
//! Reads delimited rows with the `csv` crate. Fields may be quoted with `|`;
//! rows may have different lengths. Header handling is left to the service
//! (`skip_lines`), so every physical record is yielded.
//!
//! Records are read as bytes. A field that is not valid UTF-8 becomes blank
//! (and is therefore never indexed) instead of failing the whole run.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::{IndexConfig, Row};
use crate::error::{IndexError, SourceError};
use crate::ports::RowSource;

/// Quote character for fields containing the delimiter
pub const QUOTE_CHAR: u8 = b'|';

/// Row source backed by a CSV reader
pub struct CsvRowSource<R: Read> {
    source_id: String,
    reader: csv::Reader<R>,
}

impl CsvRowSource<File> {
    /// Open `path` using the delimiter from `config`
    ///
    /// Fails with `MissingInput` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, config: &IndexConfig) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let delimiter = config.delimiter_byte()?;
        let file = File::open(path).map_err(|source| IndexError::MissingInput {
            path: path.display().to_string(),
            source,
        })?;

        debug!(path = %path.display(), delimiter = %config.delimiter, "Opened CSV input");
        Ok(Self::from_reader(path.display().to_string(), file, delimiter))
    }
}

impl<R: Read> CsvRowSource<R> {
    /// Wrap any reader; `source_id` names the artifacts
    pub fn from_reader(source_id: impl Into<String>, reader: R, delimiter: u8) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(QUOTE_CHAR)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Self {
            source_id: source_id.into(),
            reader,
        }
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    type Rows = CsvRows<R>;

    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn into_rows(self) -> CsvRows<R> {
        CsvRows {
            records: self.reader.into_byte_records(),
        }
    }
}

/// Lazy iterator over CSV records as rows
pub struct CsvRows<R> {
    records: csv::ByteRecordsIntoIter<R>,
}

fn decode_record(record: &csv::ByteRecord) -> Row {
    let line = record.position().map(|pos| pos.line()).unwrap_or(0);
    record
        .iter()
        .enumerate()
        .map(|(index, field)| match std::str::from_utf8(field) {
            Ok(text) => text.to_string(),
            Err(e) => {
                warn!(line, column = index + 1, "Skipping field that is not UTF-8: {}", e);
                String::new()
            }
        })
        .collect()
}

impl<R: Read> Iterator for CsvRows<R> {
    type Item = Result<Row, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|r| decode_record(&r))
                .map_err(SourceError::from),
        )
    }
}
