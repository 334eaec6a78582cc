use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Result type for file operations
pub type FileOpResult<T> = Result<T, FileOpError>;

/// Error types for file operations
#[derive(Debug)]
pub enum FileOpError {
    CreateDirFailed { path: PathBuf, source: io::Error },
    CopyFailed { src: PathBuf, dest: PathBuf, source: io::Error },
    MetadataFailed { path: PathBuf, source: io::Error },
    InvalidFileName(PathBuf),
}

impl FileOpError {
    /// Short name of the operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            FileOpError::CreateDirFailed { .. } => "create directory",
            FileOpError::CopyFailed { .. } => "copy file",
            FileOpError::MetadataFailed { .. } => "read metadata",
            FileOpError::InvalidFileName(_) => "resolve file name",
        }
    }

    /// The path the failed operation was writing to or reading from
    pub fn path(&self) -> &Path {
        match self {
            FileOpError::CreateDirFailed { path, .. } => path,
            FileOpError::CopyFailed { dest, .. } => dest,
            FileOpError::MetadataFailed { path, .. } => path,
            FileOpError::InvalidFileName(path) => path,
        }
    }
}

impl std::fmt::Display for FileOpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOpError::CreateDirFailed { path, source } => {
                write!(f, "Failed to create directory {:?}: {}", path, source)
            }
            FileOpError::CopyFailed { src, dest, source } => {
                write!(f, "Failed to copy from {:?} to {:?}: {}", src, dest, source)
            }
            FileOpError::MetadataFailed { path, source } => {
                write!(f, "Failed to read metadata of {:?}: {}", path, source)
            }
            FileOpError::InvalidFileName(path) => {
                write!(f, "Path has no file name: {:?}", path)
            }
        }
    }
}

impl std::error::Error for FileOpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileOpError::CreateDirFailed { source, .. }
            | FileOpError::CopyFailed { source, .. }
            | FileOpError::MetadataFailed { source, .. } => Some(source),
            FileOpError::InvalidFileName(_) => None,
        }
    }
}

/// Create a directory and all of its parents. Existing directories are fine.
pub fn ensure_dir(path: &Path) -> FileOpResult<()> {
    fs::create_dir_all(path).map_err(|source| {
        error!("Failed to create directory {:?}: {}", path, source);
        FileOpError::CreateDirFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Copy a file into `dest_dir`, keeping its file name.
///
/// Content, permissions, and access/modification times are carried over.
/// A same-named file already in `dest_dir` is overwritten. The source is
/// never touched.
///
/// # Returns
/// * `Ok(PathBuf)` with the path of the new copy
/// * `Err(FileOpError)` if reading the source or writing the copy failed
pub fn copy_file_with_metadata(src: &Path, dest_dir: &Path) -> FileOpResult<PathBuf> {
    let file_name = src
        .file_name()
        .ok_or_else(|| FileOpError::InvalidFileName(src.to_path_buf()))?;
    let dest = dest_dir.join(file_name);

    debug!("Copying {:?} to {:?}", src, dest);

    let metadata = fs::metadata(src).map_err(|source| FileOpError::MetadataFailed {
        path: src.to_path_buf(),
        source,
    })?;

    let copy_failed = |source: io::Error| {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, source);
        FileOpError::CopyFailed {
            src: src.to_path_buf(),
            dest: dest.clone(),
            source,
        }
    };

    let mut reader = File::open(src).map_err(copy_failed)?;
    let mut writer = File::create(&dest).map_err(copy_failed)?;
    io::copy(&mut reader, &mut writer).map_err(copy_failed)?;

    // Times go on through the open handle, before permissions may turn
    // the copy read-only
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    writer.set_times(times).map_err(copy_failed)?;
    drop(writer);

    fs::set_permissions(&dest, metadata.permissions()).map_err(copy_failed)?;

    Ok(dest)
}
