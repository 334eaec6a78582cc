use std::io;
use std::path::{Path, PathBuf};

use crate::core::operations::FileOpError;

/// Result type for dataset partitioning
pub type PartitionResult<T> = Result<T, PartitionError>;

/// Errors raised while splitting a dataset
#[derive(Debug)]
pub enum PartitionError {
    /// Source or destination root is unusable
    InvalidInput { path: PathBuf, reason: String },
    /// Split ratios are negative, not finite, or do not add up
    InvalidRatios(String),
    /// Listing, creating, or copying failed
    IoFailure {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
}

impl PartitionError {
    pub fn invalid_input(path: &Path, reason: impl Into<String>) -> Self {
        PartitionError::InvalidInput {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        PartitionError::IoFailure {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::fmt::Display for PartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionError::InvalidInput { path, reason } => {
                write!(f, "Invalid input {:?}: {}", path, reason)
            }
            PartitionError::InvalidRatios(msg) => write!(f, "Invalid split ratios: {}", msg),
            PartitionError::IoFailure { op, path, source } => {
                write!(f, "Failed to {} {:?}: {}", op, path, source)
            }
        }
    }
}

impl std::error::Error for PartitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PartitionError::IoFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FileOpError> for PartitionError {
    fn from(error: FileOpError) -> Self {
        let op = error.operation();
        let path = error.path().to_path_buf();
        match error {
            FileOpError::CreateDirFailed { source, .. }
            | FileOpError::CopyFailed { source, .. }
            | FileOpError::MetadataFailed { source, .. } => {
                PartitionError::IoFailure { op, path, source }
            }
            FileOpError::InvalidFileName(path) => {
                PartitionError::invalid_input(&path, "path has no file name")
            }
        }
    }
}
