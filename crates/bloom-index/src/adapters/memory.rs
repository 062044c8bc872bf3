//! In-memory row source and index sink
//!
//! Used by tests and by embedders that keep artifacts in process.

use std::collections::{HashMap, HashSet};
use std::io::Error;

use parking_lot::RwLock;

use crate::domain::Row;
use crate::error::{SinkError, SourceError};
use crate::ports::{IndexSink, RowSource};

/// Row source over already-split rows
#[derive(Clone, Debug)]
pub struct InMemoryRows {
    source_id: String,
    rows: Vec<Row>,
}

impl InMemoryRows {
    pub fn new(source_id: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            source_id: source_id.into(),
            rows,
        }
    }

    pub fn from_strs(source_id: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|field| field.to_string()).collect())
            .collect();
        Self::new(source_id, rows)
    }
}

type RowResult = Result<Row, SourceError>;

impl RowSource for InMemoryRows {
    type Rows = std::iter::Map<std::vec::IntoIter<Row>, fn(Row) -> RowResult>;

    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn into_rows(self) -> Self::Rows {
        self.rows.into_iter().map(Ok as fn(Row) -> RowResult)
    }
}

/// Index sink keeping artifacts in a map
#[derive(Debug, Default)]
pub struct MemoryIndexSink {
    artifacts: RwLock<HashMap<String, Vec<u8>>>,
    failing: RwLock<HashSet<String>>,
}

impl MemoryIndexSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future write to `name` fail
    pub fn fail_writes_to(&self, name: impl Into<String>) {
        self.failing.write().insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.artifacts.read().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.artifacts.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }
}

impl IndexSink for MemoryIndexSink {
    fn write_index(&self, name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        if self.failing.read().contains(name) {
            return Err(SinkError::Io {
                name: name.to_string(),
                source: Error::other("injected write failure"),
            });
        }
        self.artifacts
            .write()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read_index(&self, name: &str) -> Result<Vec<u8>, SinkError> {
        self.artifacts
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SinkError::NotFound(name.to_string()))
    }

    fn remove_index(&self, name: &str) -> Result<(), SinkError> {
        self.artifacts.write().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_rows() {
        let source = InMemoryRows::from_strs("mem", &[&["a", "b"], &["c"]]);
        assert_eq!(source.source_id(), "mem");

        let rows: Vec<Row> = source.into_rows().map(Result::unwrap).collect();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_memory_sink_round_trip() {
        let sink = MemoryIndexSink::new();
        sink.write_index("x", &[1, 2]).unwrap();

        assert!(sink.contains("x"));
        assert_eq!(sink.read_index("x").unwrap(), vec![1, 2]);
        sink.remove_index("x").unwrap();
        assert!(sink.is_empty());
        assert!(matches!(sink.read_index("x"), Err(SinkError::NotFound(_))));
    }

    #[test]
    fn test_injected_failure() {
        let sink = MemoryIndexSink::new();
        sink.fail_writes_to("bad");

        assert!(matches!(
            sink.write_index("bad", &[0]),
            Err(SinkError::Io { .. })
        ));
        assert!(sink.write_index("good", &[0]).is_ok());
        assert_eq!(sink.names(), vec!["good".to_string()]);
    }
}
