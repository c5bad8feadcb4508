//! Progress reporting for index builds.

use std::path::PathBuf;

/// Progress update emitted during an index build.
#[derive(Debug, Clone)]
pub struct BuildProgress {
    /// Chunks embedded so far.
    pub embedded: usize,
    /// Total chunks discovered (0 while still loading).
    pub total: usize,
    /// Source document being processed.
    pub document: PathBuf,
    /// Current stage of the build.
    pub stage: BuildStage,
}

impl BuildProgress {
    pub(crate) fn new(
        embedded: usize,
        total: usize,
        document: impl Into<PathBuf>,
        stage: BuildStage,
    ) -> Self {
        Self {
            embedded,
            total,
            document: document.into(),
            stage,
        }
    }
}

/// Stages of an index build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStage {
    /// Reading and parsing the source document.
    Loading,
    /// Splitting text units into chunks.
    Chunking,
    /// Embedding chunks.
    Embedding,
    /// Writing the completed index to its persist location.
    Persisting,
    /// Build finished and the index is queryable.
    Done,
    /// A previously completed build was reused without re-embedding.
    Reused,
}
