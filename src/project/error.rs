//! Error types for workspace loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a workspace from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The workspace root is missing or is a file.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// IO error reading a single requested file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
