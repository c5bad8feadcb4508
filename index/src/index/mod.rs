//! Vector index implementations.
//!
//! This module provides the [`VectorIndex`] trait and the exact-scoring
//! [`CosineIndex`] implementation.

mod cosine;

pub use cosine::CosineIndex;

use crate::error::Result;
use crate::types::{Chunk, IndexEntry, SearchResult};

/// Trait for vector index implementations.
///
/// A vector index stores chunks with their embedding vectors and answers
/// nearest-neighbor queries. Indexes built by the pipeline are read-only
/// after construction; concurrent searches need no external locking.
pub trait VectorIndex: Send + Sync {
    /// Inserts a chunk with its embedding vector.
    ///
    /// # Errors
    /// Returns [`crate::IndexError::DimensionMismatch`] if the vector length
    /// differs from the index dimension.
    fn insert(&self, chunk: Chunk, embedding: Vec<f32>) -> Result<()>;

    /// Returns the `top_k` chunks most similar to the query vector.
    ///
    /// Results are ordered by descending similarity; equal scores are broken
    /// by ascending `source_order`. Scores below `threshold` are dropped. An
    /// empty index yields an empty result, not an error.
    fn search(&self, query: &[f32], top_k: usize, threshold: f32) -> Result<Vec<SearchResult>>;

    /// Returns the embedding dimension.
    fn dimension(&self) -> usize;

    /// Returns the number of indexed chunks.
    fn len(&self) -> usize;

    /// Returns `true` if the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of all entries, in `source_order`.
    fn entries(&self) -> Vec<IndexEntry>;

    /// Replaces the index content with previously persisted entries.
    fn load(&self, entries: Vec<IndexEntry>) -> Result<()>;
}
