//! Metrics hooks for indexing operations
//!
//! Counters for filters built, values inserted, artifact bytes and lookups.
//!
//! ## Usage
//!
//! ```ignore
//! use bloom_index::metrics::Metrics;
//!
//! let metrics = Arc::new(Metrics::new());
//! let service = IndexingService::new(sink).with_metrics(metrics.clone());
//! service.build_indexes(source, &config)?;
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for indexing operations
///
/// Thread-safe counters, updated from parallel column builds.
#[derive(Default)]
pub struct Metrics {
    /// Total filters built
    pub filters_built: AtomicU64,
    /// Total values inserted across all filters
    pub values_inserted: AtomicU64,
    /// Total bytes of encoded artifacts
    pub bytes_encoded: AtomicU64,
    /// Total artifacts persisted
    pub artifacts_written: AtomicU64,
    /// Total lookups performed
    pub lookups_performed: AtomicU64,
    /// Total positive lookups (matches)
    pub lookups_positive: AtomicU64,
    /// Cumulative filter build time in nanoseconds
    pub build_time_ns: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one column filter built and populated
    ///
    /// # Arguments
    /// * `values` - Distinct values inserted
    /// * `duration` - Time taken to size, populate and encode the filter
    pub fn record_filter_built(&self, values: usize, duration: Duration) {
        self.filters_built.fetch_add(1, Ordering::Relaxed);
        self.values_inserted.fetch_add(values as u64, Ordering::Relaxed);
        self.build_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record an encoded artifact of `bytes` length
    pub fn record_encoded(&self, bytes: usize) {
        self.bytes_encoded.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_artifact_written(&self) {
        self.artifacts_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Record lookup operation
    ///
    /// # Arguments
    /// * `duration` - Time taken for lookup
    /// * `found` - Whether the element was found (possibly false positive)
    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_built: self.filters_built.load(Ordering::Relaxed),
            values_inserted: self.values_inserted.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            artifacts_written: self.artifacts_written.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            avg_build_ns: self.avg_build_time_ns(),
            avg_lookup_ns: self.avg_lookup_time_ns(),
        }
    }

    /// Average time to build one column filter, in nanoseconds
    pub fn avg_build_time_ns(&self) -> u64 {
        let total = self.build_time_ns.load(Ordering::Relaxed);
        let count = self.filters_built.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Calculate average lookup time in nanoseconds
    pub fn avg_lookup_time_ns(&self) -> u64 {
        let total = self.lookup_time_ns.load(Ordering::Relaxed);
        let count = self.lookups_performed.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Ratio of positive lookups to total lookups
    ///
    /// Includes both true positives and false positives.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups_performed.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.filters_built.store(0, Ordering::Relaxed);
        self.values_inserted.store(0, Ordering::Relaxed);
        self.bytes_encoded.store(0, Ordering::Relaxed);
        self.artifacts_written.store(0, Ordering::Relaxed);
        self.lookups_performed.store(0, Ordering::Relaxed);
        self.lookups_positive.store(0, Ordering::Relaxed);
        self.build_time_ns.store(0, Ordering::Relaxed);
        self.lookup_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default)]
pub struct MetricsSnapshot {
    pub filters_built: u64,
    pub values_inserted: u64,
    pub bytes_encoded: u64,
    pub artifacts_written: u64,
    pub lookups_performed: u64,
    pub lookups_positive: u64,
    pub avg_build_ns: u64,
    pub avg_lookup_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward indexing metrics to an external system.
pub trait MetricsRecorder: Send + Sync {
    fn record_filter_built(&self, values: usize, duration: Duration);

    fn record_encoded(&self, bytes: usize);

    fn record_artifact_written(&self);

    fn record_lookup(&self, duration: Duration, found: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_built(&self, _: usize, _: Duration) {}
    fn record_encoded(&self, _: usize) {}
    fn record_artifact_written(&self) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_filter_built(&self, values: usize, duration: Duration) {
        Metrics::record_filter_built(self, values, duration);
    }

    fn record_encoded(&self, bytes: usize) {
        Metrics::record_encoded(self, bytes);
    }

    fn record_artifact_written(&self) {
        Metrics::record_artifact_written(self);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        Metrics::record_lookup(self, duration, found);
    }
}
