//! # Bloom Index
//!
//! Per-column Bloom filter indexes for large delimited (CSV) datasets.
//! "Does value V ever appear in column C" can then be answered from a small
//! artifact with a known false positive bound, without the original data.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `BloomFilter`: Core probabilistic data structure
//!   - `codec`: Binary artifact format (`encode` / `decode`)
//!   - `column_extractor`: Rows to per-column value sequences
//!   - `domain_name`: Domain recognition and suffix expansion
//!   - `IndexConfig` / `IndexConfigBuilder`: Validated configuration
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `IndexingApi`: Driving port (inbound API)
//!   - `RowSource`, `IndexSink`: Driven ports
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `IndexingService`: Implements `IndexingApi`
//!
//! - **Adapters Layer** (`adapters/`): External connections
//!   - `CsvRowSource`: CSV files and readers
//!   - `FileIndexSink`: `.bfindex` files on disk
//!   - `InMemoryRows`, `MemoryIndexSink`: In-process
//!
//! ## Invariants
//!
//! - No false negatives: if inserted, `contains()` MUST return true
//! - A filter's `m` and `k` never change after construction
//! - Blank values are never inserted nor counted
//! - A failed run leaves no artifact for any of its columns, not even an
//!   earlier run's
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bloom_index::{CsvRowSource, FileIndexSink, IndexConfigBuilder, IndexingApi, IndexingService};
//!
//! let config = IndexConfigBuilder::new()
//!     .delimiter(',')
//!     .fields([1, 2])
//!     .build()?;
//!
//! let service = IndexingService::new(Arc::new(FileIndexSink::new()));
//! let report = service.build_indexes(CsvRowSource::open("export.csv", &config)?, &config)?;
//! for entry in report.iter() {
//!     println!("{} : {} entries", entry.artifact, entry.distinct_values);
//! }
//!
//! let hits = service.query("export.csv", 1, &["apple"])?;
//! # Ok::<(), bloom_index::IndexError>(())
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{CsvRowSource, FileIndexSink, InMemoryRows, MemoryIndexSink};
pub use domain::{
    artifact_name, decode, encode, expand, extract_columns, is_domain, BloomFilter, ColumnFilter,
    ColumnValues, IndexConfig, IndexConfigBuilder, Row,
};
pub use error::{ErrorKind, FormatError, IndexError, SinkError, SourceError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{IndexEntry, IndexReport, IndexSink, IndexingApi, RowSource};
pub use service::IndexingService;
