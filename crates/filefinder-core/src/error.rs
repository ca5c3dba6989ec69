//! Error types for filefinder

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using FileFinderError
pub type Result<T> = std::result::Result<T, FileFinderError>;

/// Error type alias for convenience
pub type Error = FileFinderError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Coarse classification an outer layer maps to a response class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied a malformed id or query (400-class)
    InvalidArgument,
    /// Requested entity does not exist (404-class)
    NotFound,
    /// Storage, I/O or schema failure (500-class)
    Storage,
}

/// Main error type for filefinder
#[derive(Debug, Error)]
pub enum FileFinderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Legacy file {path:?} unreadable: {reason}")]
    LegacyRead { path: PathBuf, reason: String },
}

impl FileFinderError {
    /// Build an invalid-argument error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::GlobPattern(_) => ErrorKind::InvalidArgument,
            Self::DocumentNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Storage,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidArgument => exit_codes::INVALID_INPUT,
            ErrorKind::NotFound => exit_codes::NOT_FOUND,
            ErrorKind::Storage => exit_codes::GENERAL_ERROR,
        }
    }
}
