//! Exact cosine-similarity index with parallel scoring.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use rayon::prelude::*;

use crate::error::{IndexError, Result};
use crate::types::{Chunk, IndexEntry, SearchResult};

use super::VectorIndex;

/// Computes cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (lhs, rhs) in a.iter().zip(b) {
        dot += lhs * rhs;
        norm_a += lhs * lhs;
        norm_b += rhs * rhs;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Exact cosine-similarity index.
///
/// Every query scores all stored vectors with a parallel iterator, which is
/// deterministic and fast enough for per-document corpora (thousands of
/// chunks). Exactness matters here: ordering and the `source_order` tie-break
/// are part of the search contract, which an approximate-neighbor structure
/// could not guarantee.
///
/// # Example
///
/// ```rust
/// use tendex_index::index::{CosineIndex, VectorIndex};
/// use tendex_index::Chunk;
///
/// let index = CosineIndex::new(4);
/// index
///     .insert(Chunk::new("d#chunk_0", "hello", "d", 0), vec![1.0, 0.0, 0.0, 0.0])
///     .unwrap();
/// let hits = index.search(&[1.0, 0.0, 0.0, 0.0], 1, 0.0).unwrap();
/// assert_eq!(hits[0].chunk.text, "hello");
/// ```
pub struct CosineIndex {
    dimension: usize,
    entries: RwLock<Vec<IndexEntry>>,
}

impl std::fmt::Debug for CosineIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosineIndex")
            .field("dimension", &self.dimension)
            .field("len", &self.entries.read().len())
            .finish()
    }
}

impl CosineIndex {
    /// Creates an empty index for vectors of the given dimension.
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: RwLock::new(Vec::new()),
        }
    }

    fn check_dimension(&self, len: usize) -> Result<()> {
        if len == self.dimension {
            Ok(())
        } else {
            Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: len,
            })
        }
    }
}

impl VectorIndex for CosineIndex {
    fn insert(&self, chunk: Chunk, embedding: Vec<f32>) -> Result<()> {
        self.check_dimension(embedding.len())?;
        self.entries.write().push(IndexEntry::new(chunk, embedding));
        Ok(())
    }

    fn search(&self, query: &[f32], top_k: usize, threshold: f32) -> Result<Vec<SearchResult>> {
        self.check_dimension(query.len())?;

        let entries = self.entries.read();
        if entries.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<SearchResult> = entries
            .par_iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&entry.embedding, query),
            })
            .filter(|result| result.score >= threshold)
            .collect();

        scored.par_sort_unstable_by_key(|result| {
            (Reverse(OrderedFloat(result.score)), result.chunk.source_order)
        });
        scored.truncate(top_k.min(scored.len()));
        Ok(scored)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn entries(&self) -> Vec<IndexEntry> {
        let mut snapshot = self.entries.read().clone();
        snapshot.sort_by_key(|entry| entry.chunk.source_order);
        snapshot
    }

    fn load(&self, entries: Vec<IndexEntry>) -> Result<()> {
        for entry in &entries {
            self.check_dimension(entry.embedding.len())?;
        }
        *self.entries.write() = entries;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chunk(order: usize, text: &str) -> Chunk {
        Chunk::new(format!("doc1#chunk_{order}"), text, "doc1", order)
    }

    #[test]
    fn insert_and_search() {
        let index = CosineIndex::new(4);
        index
            .insert(make_chunk(0, "hello"), vec![1.0, 0.0, 0.0, 0.0])
            .unwrap();
        index
            .insert(make_chunk(1, "world"), vec![0.0, 1.0, 0.0, 0.0])
            .unwrap();

        let results = index.search(&[1.0, 0.0, 0.0, 0.0], 1, 0.0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.text, "hello");
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn results_sorted_by_score_then_source_order() {
        let index = CosineIndex::new(2);
        // Two entries with identical vectors (tied score), inserted out of order.
        index
            .insert(make_chunk(3, "later"), vec![1.0, 0.0])
            .unwrap();
        index
            .insert(make_chunk(1, "earlier"), vec![1.0, 0.0])
            .unwrap();
        index
            .insert(make_chunk(2, "distant"), vec![0.0, 1.0])
            .unwrap();

        let results = index.search(&[1.0, 0.0], 3, 0.0).unwrap();
        assert_eq!(results[0].chunk.text, "earlier");
        assert_eq!(results[1].chunk.text, "later");
        assert_eq!(results[2].chunk.text, "distant");
    }

    #[test]
    fn k_larger_than_index_returns_all() {
        let index = CosineIndex::new(2);
        index.insert(make_chunk(0, "only"), vec![1.0, 0.0]).unwrap();

        let results = index.search(&[1.0, 0.0], 10, 0.0).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn empty_index_returns_empty() {
        let index = CosineIndex::new(2);
        assert!(index.search(&[1.0, 0.0], 5, 0.0).unwrap().is_empty());
    }

    #[test]
    fn threshold_filters_low_scores() {
        let index = CosineIndex::new(2);
        index.insert(make_chunk(0, "near"), vec![1.0, 0.0]).unwrap();
        index.insert(make_chunk(1, "far"), vec![0.0, 1.0]).unwrap();

        let results = index.search(&[1.0, 0.0], 10, 0.5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.text, "near");
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let index = CosineIndex::new(4);
        let result = index.insert(make_chunk(0, "bad"), vec![1.0, 0.0]);
        assert!(matches!(result, Err(IndexError::DimensionMismatch { .. })));

        let result = index.search(&[1.0, 0.0], 1, 0.0);
        assert!(matches!(result, Err(IndexError::DimensionMismatch { .. })));
    }

    #[test]
    fn zero_norm_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn entries_snapshot_in_source_order() {
        let index = CosineIndex::new(2);
        index.insert(make_chunk(1, "b"), vec![1.0, 0.0]).unwrap();
        index.insert(make_chunk(0, "a"), vec![0.0, 1.0]).unwrap();

        let entries = index.entries();
        assert_eq!(entries[0].chunk.text, "a");
        assert_eq!(entries[1].chunk.text, "b");
    }

    #[test]
    fn load_replaces_content() {
        let index = CosineIndex::new(2);
        index.insert(make_chunk(0, "old"), vec![1.0, 0.0]).unwrap();

        index
            .load(vec![IndexEntry::new(make_chunk(0, "new"), vec![0.0, 1.0])])
            .unwrap();
        assert_eq!(index.len(), 1);
        let results = index.search(&[0.0, 1.0], 1, 0.0).unwrap();
        assert_eq!(results[0].chunk.text, "new");
    }
}
