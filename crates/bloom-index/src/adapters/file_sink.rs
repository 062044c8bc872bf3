//! Filesystem Index Sink
//!
//! Artifact names are paths. By default each artifact is written where its
//! name points (next to the input file); `with_output_dir` redirects every
//! artifact into one directory, keeping only the file name.
//!
//! Writes go to `<path>.tmp` first and are renamed into place, so a reader
//! never observes a half-written artifact.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SinkError;
use crate::ports::IndexSink;

/// Index sink writing one file per artifact
#[derive(Clone, Debug, Default)]
pub struct FileIndexSink {
    output_dir: Option<PathBuf>,
}

impl FileIndexSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place every artifact in `dir` instead of next to its source
    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(dir.into()),
        }
    }

    /// Filesystem path an artifact name maps to
    pub fn path_for(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        match (&self.output_dir, path.file_name()) {
            (Some(dir), Some(file_name)) => dir.join(file_name),
            _ => path.to_path_buf(),
        }
    }

    fn io_error(name: &str, source: std::io::Error) -> SinkError {
        if source.kind() == ErrorKind::NotFound {
            SinkError::NotFound(name.to_string())
        } else {
            SinkError::Io {
                name: name.to_string(),
                source,
            }
        }
    }
}

impl IndexSink for FileIndexSink {
    fn write_index(&self, name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        let path = self.path_for(name);
        let mut tmp: OsString = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let io_err = |source| SinkError::Io {
            name: name.to_string(),
            source,
        };
        fs::write(&tmp, bytes).map_err(io_err)?;
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(source));
        }

        debug!(path = %path.display(), bytes = bytes.len(), "Wrote index");
        Ok(())
    }

    fn read_index(&self, name: &str) -> Result<Vec<u8>, SinkError> {
        fs::read(self.path_for(name)).map_err(|e| Self::io_error(name, e))
    }

    fn remove_index(&self, name: &str) -> Result<(), SinkError> {
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(name, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let name = dir.path().join("data.csv.1.bfindex");
        let name = name.to_str().unwrap();
        let sink = FileIndexSink::new();

        sink.write_index(name, &[1, 2, 3]).unwrap();
        assert_eq!(sink.read_index(name).unwrap(), vec![1, 2, 3]);
        assert!(!Path::new(&format!("{}.tmp", name)).exists());

        sink.remove_index(name).unwrap();
        assert!(matches!(sink.read_index(name), Err(SinkError::NotFound(_))));
        sink.remove_index(name).expect("removing twice is fine");
    }

    #[test]
    fn test_overwrite_replaces_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileIndexSink::with_output_dir(dir.path());

        sink.write_index("a.csv.2.bfindex", &[9; 4]).unwrap();
        sink.write_index("a.csv.2.bfindex", &[7; 2]).unwrap();
        assert_eq!(sink.read_index("a.csv.2.bfindex").unwrap(), vec![7, 7]);
    }

    #[test]
    fn test_output_dir_keeps_file_name() {
        let sink = FileIndexSink::with_output_dir("/var/indexes");
        assert_eq!(
            sink.path_for("/data/export.csv.3.bfindex"),
            PathBuf::from("/var/indexes/export.csv.3.bfindex")
        );
        assert_eq!(
            FileIndexSink::new().path_for("export.csv.3.bfindex"),
            PathBuf::from("export.csv.3.bfindex")
        );
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let sink = FileIndexSink::with_output_dir("/non/existent/dir");
        let err = sink.write_index("x.csv.1.bfindex", &[0]).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }
}
