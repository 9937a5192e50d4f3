use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Core(#[from] simforge_core::Error),
    #[error("write failed: {0}")]
    Write(WriteFailure),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// I/O failure at the writer boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub kind: io::ErrorKind,
    pub message: String,
    /// Absolute path of the file that was being written.
    pub path: PathBuf,
}

impl WriteFailure {
    pub fn new(kind: io::ErrorKind, message: impl Into<String>, path: &Path) -> Self {
        Self {
            kind,
            message: message.into(),
            path: absolute_path(path),
        }
    }

    pub fn from_io(err: &io::Error, path: &Path) -> Self {
        Self::new(err.kind(), err.to_string(), path)
    }
}

impl fmt::Display for WriteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}) at {}",
            self.message,
            self.kind,
            self.path.display()
        )
    }
}

impl From<WriteFailure> for GenerationError {
    fn from(value: WriteFailure) -> Self {
        GenerationError::Write(value)
    }
}

/// Best-effort absolute form of `path`; falls back to the input.
pub(crate) fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
