//! Configuration for index building and search.

use std::path::PathBuf;

use crate::error::{IndexError, Result};

/// Configuration for a [`crate::DocumentIndex`].
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Persist location for the built index.
    pub index_path: PathBuf,
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
    /// Minimum similarity score for search results.
    ///
    /// Cosine similarity ranges over `[-1, 1]`; the default of
    /// `f32::NEG_INFINITY` keeps every scored result.
    pub similarity_threshold: f32,
    /// Default number of results returned by search.
    pub default_top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("./index.redb"),
            chunk_size: 1200,
            chunk_overlap: 100,
            similarity_threshold: f32::NEG_INFINITY,
            default_top_k: 3,
        }
    }
}

impl IndexConfig {
    /// Creates a builder for custom configuration.
    #[must_use]
    pub fn builder() -> IndexConfigBuilder {
        IndexConfigBuilder::default()
    }

    /// Checks parameter ranges.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidParameter`] if `chunk_size` is zero,
    /// `chunk_overlap >= chunk_size`, or `default_top_k` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(IndexError::InvalidParameter(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(IndexError::InvalidParameter(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.default_top_k == 0 {
            return Err(IndexError::InvalidParameter(
                "default_top_k must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`IndexConfig`].
#[derive(Debug, Default)]
pub struct IndexConfigBuilder {
    config: IndexConfig,
}

impl IndexConfigBuilder {
    /// Sets the persist location.
    #[must_use]
    pub fn index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.index_path = path.into();
        self
    }

    /// Sets the chunk size in characters.
    #[must_use]
    pub const fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Sets the overlap between consecutive chunks.
    #[must_use]
    pub const fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Sets the minimum similarity score for search results.
    #[must_use]
    pub const fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Sets the default number of search results.
    #[must_use]
    pub const fn default_top_k(mut self, k: usize) -> Self {
        self.config.default_top_k = k;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidParameter`] for out-of-range parameters.
    pub fn build(self) -> Result<IndexConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
