//! Embedding-backed chunk store.

use std::sync::Arc;

use tendex_core::EmbeddingModel;

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::index::{CosineIndex, VectorIndex};
use crate::types::{Chunk, SearchResult};

/// Pairs an embedding model with a vector index.
///
/// The store is the low-level surface: callers hand it pre-built chunks and
/// queries, and it takes care of embedding both through the *same* model, which
/// is the consistency precondition for meaningful similarity scores.
pub struct IndexStore<M: EmbeddingModel> {
    embedder: Arc<M>,
    index: Arc<CosineIndex>,
    config: IndexConfig,
}

impl<M: EmbeddingModel> Clone for IndexStore<M> {
    fn clone(&self) -> Self {
        Self {
            embedder: Arc::clone(&self.embedder),
            index: Arc::clone(&self.index),
            config: self.config.clone(),
        }
    }
}

impl<M: EmbeddingModel> std::fmt::Debug for IndexStore<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore")
            .field("index", &self.index)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<M> IndexStore<M>
where
    M: EmbeddingModel + Send + Sync + 'static,
{
    /// Creates a store with default configuration.
    #[must_use]
    pub fn new(embedder: M) -> Self {
        Self::with_config(embedder, IndexConfig::default())
    }

    /// Creates a store with custom configuration.
    #[must_use]
    pub fn with_config(embedder: M, config: IndexConfig) -> Self {
        let dimension = embedder.dim();
        Self {
            embedder: Arc::new(embedder),
            index: Arc::new(CosineIndex::new(dimension)),
            config,
        }
    }

    /// Embeds a chunk and adds it to the index.
    ///
    /// One logical embedding call per chunk; any failure propagates so the
    /// caller can abort the whole build rather than index a gap.
    pub async fn embed_and_insert(&self, chunk: Chunk) -> Result<()> {
        let embedding = self
            .embedder
            .embed(&chunk.text)
            .await
            .map_err(IndexError::EmbeddingUnavailable)?;
        self.index.insert(chunk, embedding)
    }

    /// Searches with the configured default result count.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.search_with_k(query, self.config.default_top_k).await
    }

    /// Searches for the `top_k` chunks most similar to `query`.
    ///
    /// Results come back most-similar first, ties broken by ascending
    /// `source_order`; at most `min(top_k, stored chunks)` results. An empty
    /// index yields an empty result.
    ///
    /// # Errors
    /// [`IndexError::InvalidParameter`] for an empty query or `top_k == 0`;
    /// [`IndexError::EmbeddingUnavailable`] if the query cannot be embedded.
    pub async fn search_with_k(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(IndexError::InvalidParameter(
                "query text must not be empty".into(),
            ));
        }
        if top_k == 0 {
            return Err(IndexError::InvalidParameter(
                "top_k must be at least 1".into(),
            ));
        }

        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(IndexError::EmbeddingUnavailable)?;
        self.index
            .search(&embedding, top_k, self.config.similarity_threshold)
    }

    /// Returns the number of indexed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the underlying vector index.
    pub fn index(&self) -> &CosineIndex {
        &self.index
    }

    /// Returns the embedding model.
    pub fn embedder(&self) -> &M {
        &self.embedder
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }
}
