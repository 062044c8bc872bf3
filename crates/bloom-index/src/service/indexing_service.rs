//! Indexing Service
//!
//! Orchestrates extraction, filter construction and persistence:
//!
//! 1. Validate the configuration (nothing is read on failure)
//! 2. Extract every requested column in one sequential pass
//! 3. Build and encode one filter per column (parallel)
//! 4. Write every artifact through the sink (parallel)
//! 5. On any write failure, remove the artifact of every column of the run

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{
    artifact_name, decode, distinct_non_empty, encode, extract_columns, BloomFilter, IndexConfig,
};
use crate::error::{IndexError, SinkError};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{IndexEntry, IndexReport, IndexSink, IndexingApi, RowSource};

/// Below this many columns, build sequentially
pub const PARALLEL_THRESHOLD: usize = 4;

/// One encoded column, ready to be written
struct BuiltColumn {
    column: usize,
    artifact: String,
    distinct_values: usize,
    bytes: Vec<u8>,
}

/// Indexing Service implementation
///
/// Implements the `IndexingApi` port using an injected sink.
pub struct IndexingService<S: IndexSink> {
    /// Artifact store (driven port)
    sink: Arc<S>,
    /// Metrics recorder
    metrics: Arc<dyn MetricsRecorder>,
}

impl<S: IndexSink> IndexingService<S> {
    /// Create a new service writing to `sink`
    pub fn new(sink: Arc<S>) -> Self {
        Self {
            sink,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Record metrics through `metrics`
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Size, populate and encode the filter for one column
    fn build_column(
        &self,
        source_id: &str,
        column: usize,
        values: &[String],
        config: &IndexConfig,
    ) -> BuiltColumn {
        let start = Instant::now();
        let distinct = distinct_non_empty(values);

        let mut filter = BloomFilter::new(distinct.len(), config.false_positive_rate);
        debug!(
            column,
            capacity = distinct.len(),
            bits = filter.bit_count(),
            hashes = filter.hash_count(),
            "Creating bloom filter, error_rate={} ({:.4}%)",
            config.false_positive_rate,
            config.false_positive_rate * 100.0
        );

        for value in &distinct {
            if config.verbose {
                debug!(column, "Adding {:?}", value);
            }
            filter.insert(value.as_bytes());
        }

        let bytes = encode(&filter);
        self.metrics.record_filter_built(distinct.len(), start.elapsed());
        self.metrics.record_encoded(bytes.len());

        BuiltColumn {
            column,
            artifact: artifact_name(source_id, column),
            distinct_values: distinct.len(),
            bytes,
        }
    }

    /// Write every built column; on any failure remove all of them
    fn write_all(&self, built: &[BuiltColumn]) -> Result<(), IndexError> {
        let write = |column: &BuiltColumn| self.sink.write_index(&column.artifact, &column.bytes);
        let results: Vec<Result<(), SinkError>> = if built.len() < PARALLEL_THRESHOLD {
            built.iter().map(write).collect()
        } else {
            built.par_iter().map(write).collect()
        };

        if results.iter().all(Result::is_ok) {
            for _ in &results {
                self.metrics.record_artifact_written();
            }
            return Ok(());
        }

        // Failed names are removed too, so no column keeps an earlier run's artifact
        for (column, result) in built.iter().zip(&results) {
            if let Err(e) = result {
                warn!(artifact = %column.artifact, "Failed to write index: {}", e);
            }
            debug!(artifact = %column.artifact, "Rolling back index");
            if let Err(e) = self.sink.remove_index(&column.artifact) {
                warn!(artifact = %column.artifact, "Failed to roll back index: {}", e);
            }
        }

        // Surface the error of the first failing column in column order
        match results.into_iter().find_map(Result::err) {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl<S: IndexSink> IndexingApi for IndexingService<S> {
    fn build_indexes<R: RowSource>(
        &self,
        source: R,
        config: &IndexConfig,
    ) -> Result<IndexReport, IndexError> {
        config.validate()?;

        let source_id = source.source_id().to_string();
        info!(source = %source_id, "Indexing columns");

        let columns = extract_columns(
            source.into_rows(),
            config.skip_lines,
            &config.fields,
            config.expand_domains_recursively,
        )?;

        for requested in config.fields.iter() {
            if columns.get(requested).is_none() {
                warn!(column = requested, "Requested column not present in any row");
            }
        }

        let columns: Vec<(usize, &[String])> = columns.iter().collect();
        let build = |(column, values): &(usize, &[String])| {
            self.build_column(&source_id, *column, values, config)
        };
        let built: Vec<BuiltColumn> = if columns.len() < PARALLEL_THRESHOLD {
            columns.iter().map(build).collect()
        } else {
            columns.par_iter().map(build).collect()
        };

        self.write_all(&built)?;

        let entries: Vec<IndexEntry> = built
            .into_iter()
            .map(|b| {
                info!("{} : {} entries", b.artifact, b.distinct_values);
                IndexEntry {
                    column: b.column,
                    artifact: b.artifact,
                    distinct_values: b.distinct_values,
                }
            })
            .collect();

        Ok(IndexReport::new(entries))
    }

    fn open_index(&self, source_id: &str, column: usize) -> Result<BloomFilter, IndexError> {
        let artifact = artifact_name(source_id, column);
        let bytes = self.sink.read_index(&artifact)?;
        decode(&bytes).map_err(|source| IndexError::Format { artifact, source })
    }

    fn query(
        &self,
        source_id: &str,
        column: usize,
        values: &[&str],
    ) -> Result<Vec<bool>, IndexError> {
        let filter = self.open_index(source_id, column)?;

        Ok(values
            .iter()
            .map(|value| {
                let start = Instant::now();
                let found = filter.contains(value.as_bytes());
                self.metrics.record_lookup(start.elapsed(), found);
                found
            })
            .collect())
    }
}
