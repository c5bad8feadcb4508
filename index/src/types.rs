//! Core types for the indexing pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key/value metadata attached to documents and chunks.
pub type Metadata = BTreeMap<String, String>;

/// One text unit of a source document, ready for cleaning and chunking.
///
/// A loader produces one `Document` per text unit (a page for PDF input, the
/// whole file for plain text); the document itself is not retained once its
/// chunks are embedded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier for the unit.
    pub id: String,
    /// Raw text content.
    pub text: String,
    /// Arbitrary metadata carried into every chunk (e.g. page number).
    pub metadata: Metadata,
}

impl Document {
    /// Creates a document with empty metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Creates a document with metadata.
    #[must_use]
    pub fn with_metadata(
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata,
        }
    }
}

/// A bounded, possibly overlapping span of source text.
///
/// Chunks are immutable once produced; `source_order` is the position of the
/// chunk across the *whole* source document and serves as the deterministic
/// tie-break key during search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier (format: `{doc_id}#chunk_{n}`).
    pub id: String,
    /// Text content of the chunk.
    pub text: String,
    /// Parent document ID.
    pub source_id: String,
    /// Position of this chunk in the original document.
    pub source_order: usize,
    /// Inherited and chunk-specific metadata.
    pub metadata: Metadata,
}

impl Chunk {
    /// Creates a new chunk with empty metadata.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        source_id: impl Into<String>,
        source_order: usize,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source_id: source_id.into(),
            source_order,
            metadata: Metadata::new(),
        }
    }

    /// Creates a new chunk with metadata.
    #[must_use]
    pub fn with_metadata(
        id: impl Into<String>,
        text: impl Into<String>,
        source_id: impl Into<String>,
        source_order: usize,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source_id: source_id.into(),
            source_order,
            metadata,
        }
    }
}

/// A search hit: a chunk with its similarity score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matching chunk.
    pub chunk: Chunk,
    /// Cosine similarity score (1.0 = identical direction).
    pub score: f32,
}

/// A persisted (chunk, embedding vector) pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexEntry {
    /// The chunk.
    pub chunk: Chunk,
    /// The embedding vector.
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    /// Creates a new index entry.
    #[must_use]
    pub const fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self { chunk, embedding }
    }
}
