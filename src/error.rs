//! Error types for analysis and file patching.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while analysing classes or rewriting doc blocks.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The patched file could not be written back.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target file contains no declaration for the expected class, so
    /// there is no safe place to splice a doc block.
    #[error("class declaration for `{class}` not found in {}", path.display())]
    ClassDeclarationNotFound { class: String, path: PathBuf },
}

pub type Result<T> = std::result::Result<T, SyncError>;
