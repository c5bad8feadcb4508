//! Error types for the indexing pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or querying a document index.
///
/// None of these are retried internally; every failure propagates to the
/// caller, and a failure during a build aborts the whole build so a partial
/// index is never left marked as valid.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The source document does not exist or cannot be parsed.
    #[error("document unreadable at {path}: {reason}")]
    DocumentUnreadable {
        /// Path of the offending document.
        path: PathBuf,
        /// What went wrong while reading or parsing.
        reason: String,
    },

    /// The embedding backend is unreachable or returned malformed output.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(#[source] anyhow::Error),

    /// The persisted index cannot be written or read.
    #[error("persistence failure at {path}: {reason}")]
    PersistenceFailure {
        /// Persist location involved in the failure.
        path: PathBuf,
        /// What went wrong in the storage layer.
        reason: String,
    },

    /// A chunking or search parameter is out of its allowed range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An embedding vector does not match the index dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the index was created with.
        expected: usize,
        /// Dimension actually provided.
        actual: usize,
    },
}

impl IndexError {
    /// Builds a [`IndexError::PersistenceFailure`] from any displayable cause.
    pub fn persistence(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Self::PersistenceFailure {
            path: path.into(),
            reason: cause.to_string(),
        }
    }

    /// Builds a [`IndexError::DocumentUnreadable`] from any displayable cause.
    pub fn document(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Self::DocumentUnreadable {
            path: path.into(),
            reason: cause.to_string(),
        }
    }
}

/// Result type alias for indexing operations.
pub type Result<T> = std::result::Result<T, IndexError>;
