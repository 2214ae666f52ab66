//! Error types for the formcopy-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the formcopy library.
#[derive(Error, Debug)]
pub enum FormCopyError {
    /// A source or destination PDF could not be opened or parsed.
    #[error("failed to open document {path}: {reason}")]
    DocumentOpen { path: PathBuf, reason: String },

    /// The configuration file is missing or malformed.
    #[error("failed to read configuration {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// The allow-list file is missing or malformed.
    #[error("failed to read field list {path}: {reason}")]
    AllowListRead { path: PathBuf, reason: String },

    /// A checkpoint file could not be read back.
    #[error("failed to read checkpoint {path}: {reason}")]
    CheckpointRead { path: PathBuf, reason: String },

    /// A checkpoint file could not be written.
    #[error("failed to write checkpoint {path}: {reason}")]
    CheckpointWrite { path: PathBuf, reason: String },

    /// No `.pdf` file exists in a directory that must hold one.
    #[error("no PDF file found in directory: {}", .0.display())]
    NoMatchingDirectoryFile(PathBuf),

    /// The filled document could not be persisted.
    #[error("failed to write output {path}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },

    /// A field-name pattern failed to compile.
    #[error("invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormCopyError {
    /// Whether the pipeline substitutes an empty default and keeps going.
    ///
    /// Allow-list and checkpoint failures are auxiliary; everything else ends
    /// the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FormCopyError::AllowListRead { .. }
                | FormCopyError::CheckpointRead { .. }
                | FormCopyError::CheckpointWrite { .. }
        )
    }
}

/// Result type for the formcopy library.
pub type Result<T> = std::result::Result<T, FormCopyError>;
