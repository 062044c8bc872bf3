//! Adapters Layer (Driven Adapters)
//!
//! Implementations of the driven ports.
//!
//! ## Adapters
//!
//! - `CsvRowSource` - Reads delimited rows from a file or reader
//! - `FileIndexSink` - Persists artifacts as files
//! - `InMemoryRows` / `MemoryIndexSink` - In-process source and sink

pub mod csv_source;
pub mod file_sink;
pub mod memory;

pub use csv_source::{CsvRowSource, CsvRows};
pub use file_sink::FileIndexSink;
pub use memory::{InMemoryRows, MemoryIndexSink};
