//! Outbound Ports (Driven Ports)
//!
//! Dependencies the indexing service needs from its surroundings: somewhere
//! to read rows from and somewhere to persist artifacts.

use crate::domain::Row;
use crate::error::{SinkError, SourceError};

/// Source of delimited rows (Driven Port)
///
/// Delimiter handling and quoting belong to the implementation; the service
/// only sees already-split rows. `IndexConfig::delimiter` is validated by the
/// service but only applied by sources built from the config, such as
/// `CsvRowSource::open`; a source built with its own delimiter keeps it.
pub trait RowSource {
    /// Lazy row iterator
    type Rows: Iterator<Item = Result<Row, SourceError>>;

    /// Identifier artifacts are named after, usually the input path
    fn source_id(&self) -> &str;

    /// Consume the source into its rows
    fn into_rows(self) -> Self::Rows;
}

/// Persistent store for encoded filters (Driven Port)
///
/// Writes for different names may run concurrently.
pub trait IndexSink: Send + Sync {
    /// Persist `bytes` under `name`, replacing any previous artifact
    fn write_index(&self, name: &str, bytes: &[u8]) -> Result<(), SinkError>;

    /// Load the artifact stored under `name`
    fn read_index(&self, name: &str) -> Result<Vec<u8>, SinkError>;

    /// Remove the artifact stored under `name`
    fn remove_index(&self, name: &str) -> Result<(), SinkError>;
}
