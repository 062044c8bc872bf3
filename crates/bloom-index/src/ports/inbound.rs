//! Inbound Ports (Driving Ports)
//!
//! The API the command line (or any embedder) uses to build and query
//! column indexes.

use crate::domain::{BloomFilter, IndexConfig};
use crate::error::IndexError;
use crate::ports::RowSource;

/// Outcome for one indexed column
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// 1-indexed column number
    pub column: usize,
    /// Name the artifact was written under
    pub artifact: String,
    /// Distinct non-empty values inserted (the filter capacity)
    pub distinct_values: usize,
}

/// Per-column statistics of one indexing run, in column order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexReport {
    entries: Vec<IndexEntry>,
}

impl IndexReport {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    /// Distinct value count recorded for an artifact
    pub fn get(&self, artifact: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.artifact == artifact)
            .map(|e| e.distinct_values)
    }

    pub fn column(&self, column: usize) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.column == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for IndexReport {
    type Item = IndexEntry;
    type IntoIter = std::vec::IntoIter<IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Primary indexing API (Driving Port)
pub trait IndexingApi {
    /// Build one filter artifact per column of `source`
    ///
    /// Either every requested column's artifact is written or, on error,
    /// none of them remain (earlier artifacts of those columns included).
    fn build_indexes<R: RowSource>(
        &self,
        source: R,
        config: &IndexConfig,
    ) -> Result<IndexReport, IndexError>;

    /// Load the filter previously built for `column` of `source_id`
    fn open_index(&self, source_id: &str, column: usize) -> Result<BloomFilter, IndexError>;

    /// Test values against the filter of one column
    ///
    /// `true` means "possibly present", `false` means "definitely absent".
    fn query(
        &self,
        source_id: &str,
        column: usize,
        values: &[&str],
    ) -> Result<Vec<bool>, IndexError>;
}
