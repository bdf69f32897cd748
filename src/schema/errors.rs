//! Errors raised while loading schema snapshots and compiled units from disk
//!
//! These never occur during report generation: the explain pipeline only
//! borrows an already-loaded snapshot.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for loading operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid schema object {id}: {reason}")]
    InvalidObject { id: String, reason: String },

    #[error("Invalid compiled unit: {0}")]
    InvalidUnit(String),
}

impl LoadError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => "PLANLENS_LOAD_IO",
            LoadError::Parse(_) => "PLANLENS_LOAD_PARSE",
            LoadError::InvalidObject { .. } => "PLANLENS_LOAD_INVALID_OBJECT",
            LoadError::InvalidUnit(_) => "PLANLENS_LOAD_INVALID_UNIT",
        }
    }
}
