use std::io;
use std::path::PathBuf;

use crate::core::operations::FileOpError;

/// Errors raised while sorting images into bins
#[derive(Debug)]
pub enum SortError {
    ScoreCount { expected: usize, actual: usize },
    NonFiniteScore(usize),
    UnknownCategory(String),
    Decode { path: PathBuf, source: image::ImageError },
    Encode { path: PathBuf, source: image::ImageError },
    ReadBin { path: PathBuf, source: io::Error },
    FileOp(FileOpError),
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortError::ScoreCount { expected, actual } => {
                write!(f, "Expected {} classifier scores, got {}", expected, actual)
            }
            SortError::NonFiniteScore(index) => {
                write!(f, "Classifier score at index {} is not a finite number", index)
            }
            SortError::UnknownCategory(key) => write!(f, "Unknown bin: {}", key),
            SortError::Decode { path, source } => {
                write!(f, "Failed to read image {:?}: {}", path, source)
            }
            SortError::Encode { path, source } => {
                write!(f, "Failed to write image {:?}: {}", path, source)
            }
            SortError::ReadBin { path, source } => {
                write!(f, "Failed to read bin directory {:?}: {}", path, source)
            }
            SortError::FileOp(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SortError::Decode { source, .. } | SortError::Encode { source, .. } => Some(source),
            SortError::ReadBin { source, .. } => Some(source),
            SortError::FileOp(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FileOpError> for SortError {
    fn from(error: FileOpError) -> Self {
        SortError::FileOp(error)
    }
}
