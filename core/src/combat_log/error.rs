//! Error types for the log file adapter

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Step of file access that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStage {
    Open,
    Map,
    Read,
    Seek,
}

impl fmt::Display for ReadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Map => "memory map",
            Self::Read => "read",
            Self::Seek => "seek in",
        })
    }
}

/// I/O failure on the combat log. Line content never produces an error.
#[derive(Debug, Error)]
#[error("failed to {stage} combat log {}", path.display())]
pub struct ReaderError {
    pub stage: ReadStage,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl ReaderError {
    pub(crate) fn new(stage: ReadStage, path: &Path, source: io::Error) -> Self {
        Self {
            stage,
            path: path.to_path_buf(),
            source,
        }
    }
}
